//! Records for the `EPIC_*` vendor extensions carried over from the Unreal
//! exporter: HDRI backdrops, animation hotspots, lightmaps, and level
//! variant sets. Each lives in its own table under the root `extensions`
//! object.

use serde::Serialize;

use crate::{
    builder::table::Index,
    json::{
        animation::Animation,
        material::{Material, TextureInfo, Texture},
        mesh::Mesh,
        scene::Node,
    },
};

/// A skybox-like backdrop projected from a cubemap.
#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Backdrop {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh: Option<Index<Mesh>>,
    /// Cubemap face textures in +X, -X, +Y, -Y, +Z, -Z order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cubemap: Option<[Index<Texture>; 6]>,
    pub intensity: f32,
    pub size: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f32>,
    pub projection_center: [f32; 3],
    pub lighting_distance_factor: f32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub use_camera_projection: bool,
}

/// A clickable region that toggles an animation.
#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<Index<Animation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Index<Texture>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovered_image: Option<Index<Texture>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toggled_image: Option<Index<Texture>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toggled_hovered_image: Option<Index<Texture>>,
}

/// A baked lightmap texture plus the transform that maps mesh UVs into it.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LightMap {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture: Option<TextureInfo>,
    pub light_map_scale: [f32; 4],
    pub light_map_add: [f32; 4],
    pub coordinate_scale_bias: [f32; 4],
}

impl Default for LightMap {
    fn default() -> Self {
        Self {
            name: None,
            texture: None,
            light_map_scale: [1.0, 1.0, 1.0, 1.0],
            light_map_add: [0.0, 0.0, 0.0, 0.0],
            coordinate_scale_bias: [1.0, 1.0, 0.0, 0.0],
        }
    }
}

/// Per-node overrides applied when a variant is active.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantNode {
    pub node: Index<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh: Option<Index<Mesh>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<Index<Material>>,
}

#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub active: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<VariantNode>,
}

#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub variants: Vec<Variant>,
}

/// A named group of variant sets, mirroring a level variant sets asset.
#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub variant_sets: Vec<VariantSet>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn lightmap_defaults_match_identity_mapping() {
        let lightmap = LightMap::default();

        assert_eq!(
            concat!(
                r#"{"lightMapScale":[1.0,1.0,1.0,1.0],"lightMapAdd":[0.0,0.0,0.0,0.0],"#,
                r#""coordinateScaleBias":[1.0,1.0,0.0,0.0]}"#
            ),
            serde_json::to_string(&lightmap).unwrap()
        );
    }
}
