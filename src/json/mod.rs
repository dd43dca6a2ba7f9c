//! Serde models for the glTF 2.0 JSON document.
//!
//! These types only describe the wire format; tables, indices, and binary
//! payloads are managed by [`crate::builder::Document`]. Only serialization
//! is implemented: reading glTF back is out of scope.

use std::collections::BTreeSet;

use serde::{Serialize, Serializer};

use crate::builder::table::{Index, IndexedTable};

pub mod animation;
pub mod buffer;
pub mod epic;
pub mod material;
pub mod mesh;
pub mod scene;

pub use animation::Animation;
pub use buffer::{Accessor, AccessorType, Buffer, BufferTarget, BufferView, ComponentType};
pub use epic::{Backdrop, Hotspot, LightMap, Variation};
pub use material::{Image, Material, MimeType, Sampler, Texture};
pub use mesh::Mesh;
pub use scene::{Camera, Light, Node, Scene, Skin};

/// Every extension this library can emit, KHR and vendor alike.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Extension {
    KhrLightsPunctual,
    KhrMaterialsClearcoat,
    KhrMaterialsUnlit,
    KhrMeshQuantization,
    KhrTextureTransform,
    EpicAnimationHotspots,
    EpicAnimationPlayback,
    EpicBlendModes,
    EpicCameraControls,
    EpicHdriBackdrops,
    EpicLevelVariantSets,
    EpicLightmapTextures,
    EpicSkySpheres,
    EpicTextureHdrEncoding,
}

impl Extension {
    pub fn name(self) -> &'static str {
        match self {
            Extension::KhrLightsPunctual => "KHR_lights_punctual",
            Extension::KhrMaterialsClearcoat => "KHR_materials_clearcoat",
            Extension::KhrMaterialsUnlit => "KHR_materials_unlit",
            Extension::KhrMeshQuantization => "KHR_mesh_quantization",
            Extension::KhrTextureTransform => "KHR_texture_transform",
            Extension::EpicAnimationHotspots => "EPIC_animation_hotspots",
            Extension::EpicAnimationPlayback => "EPIC_animation_playback",
            Extension::EpicBlendModes => "EPIC_blend_modes",
            Extension::EpicCameraControls => "EPIC_camera_controls",
            Extension::EpicHdriBackdrops => "EPIC_hdri_backdrops",
            Extension::EpicLevelVariantSets => "EPIC_level_variant_sets",
            Extension::EpicLightmapTextures => "EPIC_lightmap_textures",
            Extension::EpicSkySpheres => "EPIC_sky_spheres",
            Extension::EpicTextureHdrEncoding => "EPIC_texture_hdr_encoding",
        }
    }

    /// Vendor extensions, as opposed to ratified KHR ones.
    pub fn is_custom(self) -> bool {
        self.name().starts_with("EPIC_")
    }
}

impl Serialize for Extension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

impl Default for Asset {
    fn default() -> Self {
        Self {
            version: "2.0".to_string(),
            generator: Some(format!(
                "{} {}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            )),
            copyright: None,
        }
    }
}

#[derive(Default, Serialize)]
pub struct LightsPunctual {
    pub lights: IndexedTable<scene::Light>,
}

impl LightsPunctual {
    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }
}

#[derive(Default, Serialize)]
pub struct HdriBackdrops {
    pub backdrops: IndexedTable<epic::Backdrop>,
}

impl HdriBackdrops {
    pub fn is_empty(&self) -> bool {
        self.backdrops.is_empty()
    }
}

#[derive(Default, Serialize)]
pub struct AnimationHotspots {
    pub hotspots: IndexedTable<epic::Hotspot>,
}

impl AnimationHotspots {
    pub fn is_empty(&self) -> bool {
        self.hotspots.is_empty()
    }
}

#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelVariantSets {
    pub level_variant_sets: IndexedTable<epic::Variation>,
}

impl LevelVariantSets {
    pub fn is_empty(&self) -> bool {
        self.level_variant_sets.is_empty()
    }
}

#[derive(Default, Serialize)]
pub struct LightmapTextures {
    pub lightmaps: IndexedTable<epic::LightMap>,
}

impl LightmapTextures {
    pub fn is_empty(&self) -> bool {
        self.lightmaps.is_empty()
    }
}

/// Extension tables stored under the root `extensions` object.
#[derive(Default, Serialize)]
pub struct RootExtensions {
    #[serde(
        rename = "KHR_lights_punctual",
        skip_serializing_if = "LightsPunctual::is_empty"
    )]
    pub khr_lights_punctual: LightsPunctual,
    #[serde(
        rename = "EPIC_hdri_backdrops",
        skip_serializing_if = "HdriBackdrops::is_empty"
    )]
    pub epic_hdri_backdrops: HdriBackdrops,
    #[serde(
        rename = "EPIC_animation_hotspots",
        skip_serializing_if = "AnimationHotspots::is_empty"
    )]
    pub epic_animation_hotspots: AnimationHotspots,
    #[serde(
        rename = "EPIC_level_variant_sets",
        skip_serializing_if = "LevelVariantSets::is_empty"
    )]
    pub epic_level_variant_sets: LevelVariantSets,
    #[serde(
        rename = "EPIC_lightmap_textures",
        skip_serializing_if = "LightmapTextures::is_empty"
    )]
    pub epic_lightmap_textures: LightmapTextures,
}

impl RootExtensions {
    pub fn is_empty(&self) -> bool {
        self.khr_lights_punctual.is_empty()
            && self.epic_hdri_backdrops.is_empty()
            && self.epic_animation_hotspots.is_empty()
            && self.epic_level_variant_sets.is_empty()
            && self.epic_lightmap_textures.is_empty()
    }
}

/// The root glTF object: one append-only table per top-level array.
///
/// Field order here is the order properties appear in the output.
#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Root {
    pub asset: Asset,
    #[serde(rename = "scene", skip_serializing_if = "Option::is_none")]
    pub default_scene: Option<Index<Scene>>,
    #[serde(skip_serializing_if = "IndexedTable::is_empty")]
    pub accessors: IndexedTable<Accessor>,
    #[serde(skip_serializing_if = "IndexedTable::is_empty")]
    pub animations: IndexedTable<Animation>,
    #[serde(skip_serializing_if = "IndexedTable::is_empty")]
    pub buffers: IndexedTable<Buffer>,
    #[serde(skip_serializing_if = "IndexedTable::is_empty")]
    pub buffer_views: IndexedTable<BufferView>,
    #[serde(skip_serializing_if = "IndexedTable::is_empty")]
    pub cameras: IndexedTable<Camera>,
    #[serde(skip_serializing_if = "IndexedTable::is_empty")]
    pub images: IndexedTable<Image>,
    #[serde(skip_serializing_if = "IndexedTable::is_empty")]
    pub materials: IndexedTable<Material>,
    #[serde(skip_serializing_if = "IndexedTable::is_empty")]
    pub meshes: IndexedTable<Mesh>,
    #[serde(skip_serializing_if = "IndexedTable::is_empty")]
    pub nodes: IndexedTable<Node>,
    #[serde(skip_serializing_if = "IndexedTable::is_empty")]
    pub samplers: IndexedTable<Sampler>,
    #[serde(skip_serializing_if = "IndexedTable::is_empty")]
    pub scenes: IndexedTable<Scene>,
    #[serde(skip_serializing_if = "IndexedTable::is_empty")]
    pub skins: IndexedTable<Skin>,
    #[serde(skip_serializing_if = "IndexedTable::is_empty")]
    pub textures: IndexedTable<Texture>,
    #[serde(skip_serializing_if = "RootExtensions::is_empty")]
    pub extensions: RootExtensions,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub extensions_used: BTreeSet<Extension>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub extensions_required: BTreeSet<Extension>,
}

impl Root {
    /// Condensed JSON bytes, as embedded in GLB containers.
    pub fn to_condensed_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Human-readable JSON bytes, as written to loose `.gltf` files.
    pub fn to_pretty_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_root_has_only_asset() {
        let root = Root {
            asset: Asset {
                generator: None,
                ..Default::default()
            },
            ..Default::default()
        };

        assert_eq!(
            r#"{"asset":{"version":"2.0"}}"#,
            serde_json::to_string(&root).unwrap()
        );
    }

    #[test]
    fn extension_names_are_spec_strings() {
        assert_eq!("KHR_lights_punctual", Extension::KhrLightsPunctual.name());
        assert!(!Extension::KhrLightsPunctual.is_custom());
        assert!(Extension::EpicHdriBackdrops.is_custom());
    }

    #[test]
    fn used_extensions_serialize_sorted() {
        let root = Root {
            asset: Asset {
                generator: None,
                ..Default::default()
            },
            extensions_used: [Extension::KhrMaterialsUnlit, Extension::KhrLightsPunctual]
                .into_iter()
                .collect(),
            ..Default::default()
        };

        assert_eq!(
            concat!(
                r#"{"asset":{"version":"2.0"},"#,
                r#""extensionsUsed":["KHR_lights_punctual","KHR_materials_unlit"]}"#
            ),
            serde_json::to_string(&root).unwrap()
        );
    }
}
