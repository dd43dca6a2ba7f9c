use serde::Serialize;
use serde_repr::Serialize_repr;

use crate::{
    builder::table::Index,
    json::buffer::BufferView,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum MimeType {
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/jpeg")]
    Jpeg,
}

impl MimeType {
    pub fn as_str(self) -> &'static str {
        match self {
            MimeType::Png => "image/png",
            MimeType::Jpeg => "image/jpeg",
        }
    }

    /// The file extension used for sidecar image files, period included.
    pub fn file_extension(self) -> &'static str {
        match self {
            MimeType::Png => ".png",
            MimeType::Jpeg => ".jpg",
        }
    }
}

/// An image payload, either embedded in the buffer (GLB), referenced by a
/// sidecar file URI, or inlined as a base64 data URI.
#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<MimeType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffer_view: Option<Index<BufferView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize_repr)]
#[repr(u32)]
pub enum MagFilter {
    Nearest = 9728,
    Linear = 9729,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize_repr)]
#[repr(u32)]
pub enum MinFilter {
    Nearest = 9728,
    Linear = 9729,
    NearestMipmapNearest = 9984,
    LinearMipmapNearest = 9985,
    NearestMipmapLinear = 9986,
    LinearMipmapLinear = 9987,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize_repr)]
#[repr(u32)]
pub enum WrapMode {
    ClampToEdge = 33071,
    MirroredRepeat = 33648,
    Repeat = 10497,
}

#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sampler {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mag_filter: Option<MagFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_filter: Option<MinFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap_s: Option<WrapMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap_t: Option<WrapMode>,
}

#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Texture {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampler: Option<Index<Sampler>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Index<Image>>,
}

/// Reference from a material to a texture, with the texture coordinate set
/// it samples.
#[derive(Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureInfo {
    pub index: Index<Texture>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tex_coord: Option<u32>,
}

impl TextureInfo {
    pub fn new(index: Index<Texture>) -> Self {
        Self {
            index,
            tex_coord: None,
        }
    }
}

#[derive(Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalTextureInfo {
    pub index: Index<Texture>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tex_coord: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
}

#[derive(Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OcclusionTextureInfo {
    pub index: Index<Texture>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tex_coord: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<f32>,
}

#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PbrMetallicRoughness {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_color_factor: Option<[f32; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_color_texture: Option<TextureInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metallic_factor: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roughness_factor: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metallic_roughness_texture: Option<TextureInfo>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlphaMode {
    Opaque,
    Mask,
    Blend,
}

#[derive(Default, Serialize)]
pub struct Unlit {}

#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Clearcoat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clearcoat_factor: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clearcoat_texture: Option<TextureInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clearcoat_roughness_factor: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clearcoat_roughness_texture: Option<TextureInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clearcoat_normal_texture: Option<NormalTextureInfo>,
}

#[derive(Default, Serialize)]
pub struct MaterialExtensions {
    #[serde(
        rename = "KHR_materials_unlit",
        skip_serializing_if = "Option::is_none"
    )]
    pub khr_materials_unlit: Option<Unlit>,
    #[serde(
        rename = "KHR_materials_clearcoat",
        skip_serializing_if = "Option::is_none"
    )]
    pub khr_materials_clearcoat: Option<Clearcoat>,
}

impl MaterialExtensions {
    pub fn is_empty(&self) -> bool {
        self.khr_materials_unlit.is_none() && self.khr_materials_clearcoat.is_none()
    }
}

#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pbr_metallic_roughness: Option<PbrMetallicRoughness>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normal_texture: Option<NormalTextureInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occlusion_texture: Option<OcclusionTextureInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emissive_texture: Option<TextureInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emissive_factor: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha_mode: Option<AlphaMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha_cutoff: Option<f32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub double_sided: bool,
    #[serde(skip_serializing_if = "MaterialExtensions::is_empty")]
    pub extensions: MaterialExtensions,
}
