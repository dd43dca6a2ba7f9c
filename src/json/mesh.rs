use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_repr::Serialize_repr;

use crate::{
    builder::table::Index,
    json::{buffer::Accessor, material::Material},
};

/// Vertex attribute names as they appear in primitive attribute maps.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Semantic {
    Positions,
    Normals,
    Tangents,
    Colors(u32),
    TexCoords(u32),
    Joints(u32),
    Weights(u32),
}

impl Semantic {
    pub fn to_attribute_name(self) -> String {
        match self {
            Semantic::Positions => "POSITION".to_string(),
            Semantic::Normals => "NORMAL".to_string(),
            Semantic::Tangents => "TANGENT".to_string(),
            Semantic::Colors(set) => format!("COLOR_{set}"),
            Semantic::TexCoords(set) => format!("TEXCOORD_{set}"),
            Semantic::Joints(set) => format!("JOINTS_{set}"),
            Semantic::Weights(set) => format!("WEIGHTS_{set}"),
        }
    }
}

impl Serialize for Semantic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_attribute_name())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize_repr)]
#[repr(u32)]
pub enum PrimitiveMode {
    Points = 0,
    Lines = 1,
    LineLoop = 2,
    LineStrip = 3,
    Triangles = 4,
    TriangleStrip = 5,
    TriangleFan = 6,
}

pub type Attributes = BTreeMap<Semantic, Index<Accessor>>;

#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Primitive {
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indices: Option<Index<Accessor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<Index<Material>>,
    /// Defaults to triangles when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<PrimitiveMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<Attributes>>,
}

#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mesh {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f32>>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn attribute_names_match_wire_format() {
        assert_eq!("POSITION", Semantic::Positions.to_attribute_name());
        assert_eq!("TEXCOORD_1", Semantic::TexCoords(1).to_attribute_name());
        assert_eq!("JOINTS_0", Semantic::Joints(0).to_attribute_name());
    }

    #[test]
    fn primitive_serializes_attribute_map() {
        let mut primitive = Primitive::default();
        primitive
            .attributes
            .insert(Semantic::Positions, Index::new(0));
        primitive
            .attributes
            .insert(Semantic::TexCoords(0), Index::new(1));
        primitive.indices = Some(Index::new(2));

        assert_eq!(
            r#"{"attributes":{"POSITION":0,"TEXCOORD_0":1},"indices":2}"#,
            serde_json::to_string(&primitive).unwrap()
        );
    }
}
