//! Assembly of glTF 2.0 documents and serialization to GLB or loose
//! `.gltf` layouts.
//!
//! The crate is the engine-agnostic back half of a scene exporter: callers
//! traverse their own scene representation and feed typed records into a
//! [`Document`], which hands back stable indices for cross-referencing.
//! Binary payloads are appended to a single shared buffer and deduplicated
//! by content, expensive conversions can be deferred through a
//! priority-ordered [`TaskQueue`], and a finished document is consumed by
//! [`ContainerWriter`] to produce the output files.
//!
//! ```
//! use gltfbuild::{json, ContainerWriter, Document, OutputFormat};
//!
//! let mut doc = Document::new(OutputFormat::Glb);
//! let positions = [
//!     glam::Vec3::new(0.0, 0.0, 0.0),
//!     glam::Vec3::new(1.0, 0.0, 0.0),
//!     glam::Vec3::new(0.0, 1.0, 0.0),
//! ];
//! let position = doc.add_position_accessor(&positions, None);
//! let indices = doc.add_index_accessor(&[0, 1, 2], None);
//!
//! let mut primitive = json::mesh::Primitive::default();
//! primitive.attributes.insert(json::mesh::Semantic::Positions, position);
//! primitive.indices = Some(indices);
//! let mesh = doc.add_mesh(json::Mesh {
//!     primitives: vec![primitive],
//!     ..Default::default()
//! });
//!
//! let node = doc.add_child_node(None, json::Node { mesh: Some(mesh), ..Default::default() });
//! let scene = doc.add_scene(json::Scene { nodes: vec![node], ..Default::default() });
//! doc.set_default_scene(scene);
//!
//! let glb = ContainerWriter::new(doc).into_glb_bytes().unwrap();
//! assert_eq!(b"glTF", &glb[0..4]);
//! ```

pub use crate::{
    builder::{
        BinaryHashKey, BufferAccumulator, Convert, ConverterCache, Document, ImageFile, Index,
        IndexedTable, Message, MessageLog, OutputFormat, Severity, TaskPriority, TaskQueue,
    },
    container::ContainerWriter,
    error::ExportError,
};

pub mod builder;
pub mod container;
pub mod json;

mod error;
