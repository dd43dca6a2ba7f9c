use glam::{Mat4, Quat, Vec3};
use serde::Serialize;

use crate::{
    builder::table::Index,
    json::{buffer::Accessor, mesh::Mesh},
};

#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<Index<Node>>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LightType {
    Directional,
    Point,
    Spot,
}

#[derive(Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotCone {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_cone_angle: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outer_cone_angle: Option<f32>,
}

/// A punctual light, stored under the `KHR_lights_punctual` root extension.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Light {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub light_type: LightType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot: Option<SpotCone>,
}

impl Light {
    pub fn new(light_type: LightType) -> Self {
        Self {
            name: None,
            light_type,
            color: None,
            intensity: None,
            range: None,
            spot: None,
        }
    }
}

#[derive(Clone, Copy, Serialize)]
pub struct NodeLight {
    pub light: Index<Light>,
}

#[derive(Default, Serialize)]
pub struct NodeExtensions {
    #[serde(
        rename = "KHR_lights_punctual",
        skip_serializing_if = "Option::is_none"
    )]
    pub khr_lights_punctual: Option<NodeLight>,
}

impl NodeExtensions {
    pub fn is_empty(&self) -> bool {
        self.khr_lights_punctual.is_none()
    }
}

#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Index<Node>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<Index<Camera>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh: Option<Index<Mesh>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skin: Option<Index<Skin>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f32; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "NodeExtensions::is_empty")]
    pub extensions: NodeExtensions,
}

impl Node {
    /// Sets translation/rotation/scale by decomposing `matrix`.
    ///
    /// Identity components are left unset so they are omitted from the
    /// output.
    pub fn set_transform(&mut self, matrix: Mat4) {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        self.set_trs(translation, rotation, scale);
    }

    pub fn set_trs(&mut self, translation: Vec3, rotation: Quat, scale: Vec3) {
        self.translation = (translation != Vec3::ZERO).then(|| translation.to_array());
        self.rotation = (rotation != Quat::IDENTITY).then(|| rotation.to_array());
        self.scale = (scale != Vec3::ONE).then(|| scale.to_array());
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraType {
    Perspective,
    Orthographic,
}

#[derive(Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Perspective {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f32>,
    /// Vertical field of view in radians.
    pub yfov: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zfar: Option<f32>,
    pub znear: f32,
}

#[derive(Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Orthographic {
    pub xmag: f32,
    pub ymag: f32,
    pub zfar: f32,
    pub znear: f32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub camera_type: CameraType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perspective: Option<Perspective>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orthographic: Option<Orthographic>,
}

#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Skin {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inverse_bind_matrices: Option<Index<Accessor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skeleton: Option<Index<Node>>,
    pub joints: Vec<Index<Node>>,
}
