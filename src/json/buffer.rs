use serde::Serialize;
use serde_repr::Serialize_repr;

use crate::builder::table::Index;

/// A glTF buffer. This library keeps a single buffer (index 0) that backs
/// every buffer view; its `uri` stays unset in GLB output and is resolved
/// by the container writer for loose output.
#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Buffer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    pub byte_length: u64,
}

/// Usage hint for a buffer view.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize_repr)]
#[repr(u32)]
pub enum BufferTarget {
    ArrayBuffer = 34962,
    ElementArrayBuffer = 34963,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub buffer: Index<Buffer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_offset: Option<u64>,
    pub byte_length: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_stride: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<BufferTarget>,
}

/// glTF component types, with their exact wire values.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize_repr)]
#[repr(u32)]
pub enum ComponentType {
    I8 = 5120,
    U8 = 5121,
    I16 = 5122,
    U16 = 5123,
    U32 = 5125,
    F32 = 5126,
}

impl ComponentType {
    /// Size of one component in bytes, which is also the minimum alignment
    /// for accessor data.
    pub fn size(self) -> usize {
        match self {
            ComponentType::I8 | ComponentType::U8 => 1,
            ComponentType::I16 | ComponentType::U16 => 2,
            ComponentType::U32 | ComponentType::F32 => 4,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum AccessorType {
    #[serde(rename = "SCALAR")]
    Scalar,
    #[serde(rename = "VEC2")]
    Vec2,
    #[serde(rename = "VEC3")]
    Vec3,
    #[serde(rename = "VEC4")]
    Vec4,
    #[serde(rename = "MAT2")]
    Mat2,
    #[serde(rename = "MAT3")]
    Mat3,
    #[serde(rename = "MAT4")]
    Mat4,
}

impl AccessorType {
    /// Number of components per element.
    pub fn component_count(self) -> usize {
        match self {
            AccessorType::Scalar => 1,
            AccessorType::Vec2 => 2,
            AccessorType::Vec3 => 3,
            AccessorType::Vec4 => 4,
            AccessorType::Mat2 => 4,
            AccessorType::Mat3 => 9,
            AccessorType::Mat4 => 16,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffer_view: Option<Index<BufferView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_offset: Option<u64>,
    pub component_type: ComponentType,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub normalized: bool,
    pub count: u64,
    #[serde(rename = "type")]
    pub element_type: AccessorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Vec<f32>>,
}

impl Accessor {
    /// A minimal accessor over a whole buffer view.
    pub fn new(
        buffer_view: Index<BufferView>,
        component_type: ComponentType,
        element_type: AccessorType,
        count: u64,
    ) -> Self {
        Self {
            name: None,
            buffer_view: Some(buffer_view),
            byte_offset: None,
            component_type,
            normalized: false,
            count,
            element_type,
            min: None,
            max: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn accessor_omits_unset_fields() {
        let accessor = Accessor::new(
            Index::new(3),
            ComponentType::F32,
            AccessorType::Vec3,
            8,
        );

        assert_eq!(
            r#"{"bufferView":3,"componentType":5126,"count":8,"type":"VEC3"}"#,
            serde_json::to_string(&accessor).unwrap()
        );
    }

    #[test]
    fn buffer_view_serializes_wire_values() {
        let view = BufferView {
            name: None,
            buffer: Index::new(0),
            byte_offset: Some(16),
            byte_length: 24,
            byte_stride: None,
            target: Some(BufferTarget::ElementArrayBuffer),
        };

        assert_eq!(
            r#"{"buffer":0,"byteOffset":16,"byteLength":24,"target":34963}"#,
            serde_json::to_string(&view).unwrap()
        );
    }
}
