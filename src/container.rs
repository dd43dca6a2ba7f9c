//! Serialization of a finished [`Document`] into the GLB binary container
//! or a loose `.gltf` file layout.
//!
//! GLB framing per the glTF 2.0 binary spec: a 12-byte header (magic,
//! version, total length), then a JSON chunk and a BIN chunk, each led by a
//! length/type pair and padded to a multiple of 4 bytes. JSON chunks pad
//! with ASCII spaces, BIN chunks with zeros.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use byteorder::{WriteBytesExt, LE};

use crate::{
    builder::{
        document::{Document, OutputFormat},
        messages::MessageLog,
    },
    error::ExportError,
};

/// "glTF" in ASCII.
pub const GLB_MAGIC: u32 = 0x4654_6C67;
pub const GLB_VERSION: u32 = 2;

const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

const HEADER_SIZE: u32 = 12;
const CHUNK_HEADER_SIZE: u32 = 8;

/// Chunk length including trailing padding.
pub fn padded_chunk_size(size: usize) -> usize {
    (size + 3) & !3
}

/// Number of fill bytes a chunk of `size` data bytes needs.
pub fn trailing_chunk_size(size: usize) -> usize {
    (4 - (size & 3)) & 3
}

/// Consumes a document and writes it out in the layout the document was
/// built for.
pub struct ContainerWriter {
    document: Document,
}

impl ContainerWriter {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Writes the document to `path`, dispatching on its output format.
    ///
    /// Returns the accumulated message log; sidecar image files that fail
    /// to write are downgraded to error messages, only the primary files
    /// fail hard.
    pub fn write_to_path(self, path: impl AsRef<Path>) -> Result<MessageLog, ExportError> {
        let path = path.as_ref();
        match self.document.output() {
            OutputFormat::Glb => {
                let mut file = BufWriter::new(File::create(path)?);
                self.write_glb(&mut file)
            }
            OutputFormat::Gltf => self.write_gltf_files(path),
            OutputFormat::GltfEmbedded => self.write_gltf_embedded(path),
        }
    }

    /// Writes a GLB container to `writer`.
    ///
    /// The BIN chunk is always emitted, even when the buffer is empty, so
    /// the layout is predictable for consumers.
    pub fn write_glb<W: Write>(mut self, writer: &mut W) -> Result<MessageLog, ExportError> {
        let json = self.document.root.to_condensed_bytes()?;
        write_glb_container(writer, &json, self.document.buffer_data())?;
        Ok(std::mem::take(&mut self.document.messages))
    }

    /// The complete GLB container as a byte vector.
    pub fn into_glb_bytes(self) -> Result<Vec<u8>, ExportError> {
        let mut bytes = Vec::new();
        self.write_glb(&mut bytes)?;
        Ok(bytes)
    }

    /// Writes `<stem>.gltf`, `<stem>.bin` (when there is buffer data), and
    /// one file per deduplicated image, all in the directory of `path`.
    fn write_gltf_files(mut self, path: &Path) -> Result<MessageLog, ExportError> {
        let directory = path.parent().unwrap_or_else(|| Path::new(""));
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "scene".to_string());

        if !self.document.buffer_data().is_empty() {
            let bin_name = format!("{stem}.bin");
            std::fs::write(directory.join(&bin_name), self.document.buffer_data())?;
            self.document.set_buffer_uri(bin_name);
        }

        let mut failures = Vec::new();
        for image in self.document.sidecar_images() {
            let image_path = directory.join(&image.uri);
            if let Err(error) = std::fs::write(&image_path, &image.bytes) {
                failures.push(format!(
                    "failed to save image to {}: {error}",
                    image_path.display()
                ));
            }
        }
        for failure in failures {
            self.document.messages.error(failure);
        }

        let json = self.document.root.to_pretty_bytes()?;
        std::fs::write(path.with_extension("gltf"), json)?;

        Ok(std::mem::take(&mut self.document.messages))
    }

    /// Writes a single `.gltf` with the buffer inlined as a data URI.
    /// Images were already inlined when they were added.
    fn write_gltf_embedded(mut self, path: &Path) -> Result<MessageLog, ExportError> {
        if !self.document.buffer_data().is_empty() {
            let uri = format!(
                "data:application/octet-stream;base64,{}",
                base64::encode(self.document.buffer_data())
            );
            self.document.set_buffer_uri(uri);
        }

        let json = self.document.root.to_pretty_bytes()?;
        std::fs::write(path.with_extension("gltf"), json)?;

        Ok(std::mem::take(&mut self.document.messages))
    }
}

fn write_glb_container<W: Write>(writer: &mut W, json: &[u8], bin: &[u8]) -> std::io::Result<()> {
    let total_length = HEADER_SIZE
        + CHUNK_HEADER_SIZE
        + padded_chunk_size(json.len()) as u32
        + CHUNK_HEADER_SIZE
        + padded_chunk_size(bin.len()) as u32;

    writer.write_u32::<LE>(GLB_MAGIC)?;
    writer.write_u32::<LE>(GLB_VERSION)?;
    writer.write_u32::<LE>(total_length)?;

    write_chunk(writer, CHUNK_JSON, json, 0x20)?;
    write_chunk(writer, CHUNK_BIN, bin, 0x00)?;

    Ok(())
}

fn write_chunk<W: Write>(
    writer: &mut W,
    chunk_type: u32,
    data: &[u8],
    fill: u8,
) -> std::io::Result<()> {
    writer.write_u32::<LE>(padded_chunk_size(data.len()) as u32)?;
    writer.write_u32::<LE>(chunk_type)?;
    writer.write_all(data)?;

    for _ in 0..trailing_chunk_size(data.len()) {
        writer.write_u8(fill)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::json::{self, material::MimeType};

    #[test]
    fn padding_law() {
        assert_eq!(0, padded_chunk_size(0));
        assert_eq!(4, padded_chunk_size(1));
        assert_eq!(4, padded_chunk_size(4));
        assert_eq!(8, padded_chunk_size(5));

        for n in 0..64 {
            let padded = padded_chunk_size(n);
            assert_eq!(0, padded % 4);
            assert!(padded >= n);
            assert!(padded - n < 4);
            assert_eq!(padded - n, trailing_chunk_size(n));
        }
    }

    #[test]
    fn minimal_container_is_32_bytes() {
        let mut bytes = Vec::new();
        write_glb_container(&mut bytes, b"{}", &[]).unwrap();

        assert_eq!(32, bytes.len());
        // Header: magic, version, total length.
        assert_eq!(b"glTF", &bytes[0..4]);
        assert_eq!(2, u32::from_le_bytes(bytes[4..8].try_into().unwrap()));
        assert_eq!(32, u32::from_le_bytes(bytes[8..12].try_into().unwrap()));
        // JSON chunk: padded length 4, type "JSON", "{}" plus two spaces.
        assert_eq!(4, u32::from_le_bytes(bytes[12..16].try_into().unwrap()));
        assert_eq!(b"JSON", &bytes[16..20]);
        assert_eq!(b"{}  ", &bytes[20..24]);
        // Empty BIN chunk is still emitted.
        assert_eq!(0, u32::from_le_bytes(bytes[24..28].try_into().unwrap()));
        assert_eq!(b"BIN\0", &bytes[28..32]);
    }

    #[test]
    fn bin_chunk_pads_with_zeros() {
        let mut bytes = Vec::new();
        write_glb_container(&mut bytes, b"{}", &[0xaa; 5]).unwrap();

        let bin_data = &bytes[32..];
        assert_eq!(&[0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0, 0, 0], bin_data);
        assert_eq!(8, u32::from_le_bytes(bytes[24..28].try_into().unwrap()));
    }

    #[test]
    fn glb_round_trips_through_a_reader() {
        let mut doc = Document::new(OutputFormat::Glb);
        let scene = doc.add_scene(json::Scene::default());
        doc.set_default_scene(scene);
        doc.add_index_accessor(&[0, 1, 2], None);
        doc.add_image(&[1, 2, 3, 4, 5], MimeType::Png, "checker");

        let expected_json = doc.root.to_condensed_bytes().unwrap();
        let expected_bin = doc.buffer_data().to_vec();

        let bytes = ContainerWriter::new(doc).into_glb_bytes().unwrap();
        let glb = gltf::Glb::from_slice(&bytes).unwrap();

        assert_eq!(b"glTF", &glb.header.magic);
        assert_eq!(2, glb.header.version);
        assert_eq!(bytes.len() as u32, glb.header.length);

        // The chunk length field covers the fill, so readers hand chunks
        // back padded: JSON with spaces, BIN with zeros.
        let json = glb.json.as_ref();
        assert_eq!(padded_chunk_size(expected_json.len()), json.len());
        assert_eq!(expected_json, json[..expected_json.len()]);
        assert!(json[expected_json.len()..].iter().all(|&b| b == 0x20));

        let bin = glb.bin.unwrap();
        assert_eq!(padded_chunk_size(expected_bin.len()), bin.len());
        assert_eq!(expected_bin, bin[..expected_bin.len()]);
        assert!(bin[expected_bin.len()..].iter().all(|&b| b == 0));
    }

    #[test]
    fn exported_document_parses_as_gltf() {
        let mut doc = Document::new(OutputFormat::Glb);
        let positions = [
            glam::Vec3::new(0.0, 0.0, 0.0),
            glam::Vec3::new(1.0, 0.0, 0.0),
            glam::Vec3::new(0.0, 1.0, 0.0),
        ];
        let position = doc.add_position_accessor(&positions, None);
        let indices = doc.add_index_accessor(&[0, 1, 2], None);

        let mut primitive = json::mesh::Primitive::default();
        primitive
            .attributes
            .insert(json::mesh::Semantic::Positions, position);
        primitive.indices = Some(indices);
        let mesh = doc.add_mesh(json::Mesh {
            name: Some("triangle".to_string()),
            primitives: vec![primitive],
            ..Default::default()
        });

        let node = doc.add_child_node(
            None,
            json::Node {
                mesh: Some(mesh),
                ..Default::default()
            },
        );
        let scene = doc.add_scene(json::Scene {
            nodes: vec![node],
            ..Default::default()
        });
        doc.set_default_scene(scene);

        let bytes = ContainerWriter::new(doc).into_glb_bytes().unwrap();
        let gltf = gltf::Gltf::from_slice(&bytes).unwrap();

        assert_eq!(1, gltf.meshes().count());
        let mesh = gltf.meshes().next().unwrap();
        assert_eq!(Some("triangle"), mesh.name());
        let primitive = mesh.primitives().next().unwrap();
        assert_eq!(3, primitive.indices().unwrap().count());
        assert_eq!(
            3,
            primitive
                .get(&gltf::Semantic::Positions)
                .unwrap()
                .count()
        );
    }

    #[test]
    fn loose_output_writes_sibling_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.gltf");

        let mut doc = Document::new(OutputFormat::Gltf);
        doc.add_index_accessor(&[0, 1, 2], None);
        doc.add_image(&[7, 7, 7], MimeType::Png, "grid");

        let expected_bin = doc.buffer_data().to_vec();
        let messages = ContainerWriter::new(doc).write_to_path(&path).unwrap();
        assert!(!messages.has_errors());

        assert_eq!(expected_bin, std::fs::read(dir.path().join("scene.bin")).unwrap());
        assert_eq!(vec![7, 7, 7], std::fs::read(dir.path().join("grid.png")).unwrap());

        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!("scene.bin", json["buffers"][0]["uri"]);
        assert_eq!("grid.png", json["images"][0]["uri"]);
    }

    #[test]
    fn embedded_output_inlines_the_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.gltf");

        let mut doc = Document::new(OutputFormat::GltfEmbedded);
        doc.add_buffer_view(&[1, 2, 3, 4], None, 4);

        ContainerWriter::new(doc).write_to_path(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        let uri = json["buffers"][0]["uri"].as_str().unwrap();
        assert!(uri.starts_with("data:application/octet-stream;base64,"));
        assert_eq!(
            base64::encode([1u8, 2, 3, 4]),
            uri.trim_start_matches("data:application/octet-stream;base64,")
        );
        // No sibling .bin file in embedded mode.
        assert!(!dir.path().join("scene.bin").exists());
    }
}
