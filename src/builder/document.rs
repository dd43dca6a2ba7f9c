use std::collections::{HashMap, HashSet};

use glam::{Vec2, Vec3, Vec4};

use crate::{
    builder::{
        buffer::{BinaryHashKey, BufferAccumulator},
        messages::MessageLog,
        table::Index,
    },
    json::{
        self,
        buffer::{Accessor, AccessorType, BufferTarget, BufferView, ComponentType},
        epic::{Backdrop, Hotspot, LightMap, Variation},
        material::MimeType,
        scene::Light,
        Extension,
    },
};

/// How the finished document will be laid out on disk. Decided up front
/// because it changes how image payloads are stored.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum OutputFormat {
    /// A single padded binary container.
    #[default]
    Glb,
    /// A `.gltf` JSON file with a sibling `.bin` and one file per image.
    Gltf,
    /// A single `.gltf` with binary payloads inlined as base64 data URIs.
    GltfEmbedded,
}

/// An image destined for its own file next to the `.gltf`.
pub struct ImageFile {
    pub uri: String,
    pub bytes: Vec<u8>,
}

/// The root aggregate of an export: every entity table, the shared binary
/// buffer, content-dedup state, and the diagnostic log.
///
/// A document is created once per export, mutated monotonically while the
/// scene is traversed and queued tasks complete, then consumed exactly once
/// by [`crate::container::ContainerWriter`].
pub struct Document {
    pub root: json::Root,
    pub messages: MessageLog,
    output: OutputFormat,
    buffer: BufferAccumulator,
    buffer_index: Index<json::Buffer>,
    image_indices: HashMap<BinaryHashKey, Index<json::Image>, ahash::RandomState>,
    image_uris: HashSet<String, ahash::RandomState>,
    image_files: Vec<ImageFile>,
}

impl Document {
    pub fn new(output: OutputFormat) -> Self {
        let mut root = json::Root::default();
        // The single buffer backing every buffer view.
        let buffer_index = root.buffers.add(json::Buffer::default());

        Self {
            root,
            messages: MessageLog::default(),
            output,
            buffer: BufferAccumulator::default(),
            buffer_index,
            image_indices: HashMap::default(),
            image_uris: HashSet::default(),
            image_files: Vec::new(),
        }
    }

    pub fn output(&self) -> OutputFormat {
        self.output
    }

    /// The accumulated binary payload, exactly as a BIN chunk will carry it
    /// (without trailing container padding).
    pub fn buffer_data(&self) -> &[u8] {
        self.buffer.bytes()
    }

    /// Images to be written as sidecar files in loose output.
    pub fn sidecar_images(&self) -> &[ImageFile] {
        &self.image_files
    }

    /// Points the shared buffer at its external or inlined location. Used
    /// by the container writer for loose output.
    pub(crate) fn set_buffer_uri(&mut self, uri: String) {
        self.root.buffers.get_mut(self.buffer_index).uri = Some(uri);
    }

    pub fn set_default_scene(&mut self, scene: Index<json::Scene>) {
        self.root.default_scene = Some(scene);
    }

    /// Records that a named extension is in use. Idempotent.
    pub fn add_extension(&mut self, extension: Extension, required: bool) {
        self.root.extensions_used.insert(extension);
        if required {
            self.root.extensions_required.insert(extension);
        }
    }

    pub fn add_scene(&mut self, scene: json::Scene) -> Index<json::Scene> {
        self.root.scenes.add(scene)
    }

    pub fn add_node(&mut self, node: json::Node) -> Index<json::Node> {
        self.root.nodes.add(node)
    }

    /// Adds a node and links it under `parent`, if any. The child index is
    /// allocated before any of the child's own references are resolved,
    /// which is what allows cyclic and forward references.
    pub fn add_child_node(
        &mut self,
        parent: Option<Index<json::Node>>,
        node: json::Node,
    ) -> Index<json::Node> {
        let child = self.root.nodes.add(node);
        if let Some(parent) = parent {
            self.root.nodes.get_mut(parent).children.push(child);
        }
        child
    }

    pub fn add_mesh(&mut self, mesh: json::Mesh) -> Index<json::Mesh> {
        self.root.meshes.add(mesh)
    }

    pub fn add_material(&mut self, material: json::Material) -> Index<json::Material> {
        self.root.materials.add(material)
    }

    pub fn add_accessor(&mut self, accessor: Accessor) -> Index<Accessor> {
        self.root.accessors.add(accessor)
    }

    pub fn add_camera(&mut self, camera: json::Camera) -> Index<json::Camera> {
        self.root.cameras.add(camera)
    }

    pub fn add_skin(&mut self, skin: json::Skin) -> Index<json::Skin> {
        self.root.skins.add(skin)
    }

    pub fn add_animation(&mut self, animation: json::Animation) -> Index<json::Animation> {
        self.root.animations.add(animation)
    }

    pub fn add_sampler(&mut self, sampler: json::Sampler) -> Index<json::Sampler> {
        self.root.samplers.add(sampler)
    }

    pub fn add_texture(&mut self, texture: json::Texture) -> Index<json::Texture> {
        self.root.textures.add(texture)
    }

    pub fn add_light(&mut self, light: Light) -> Index<Light> {
        self.add_extension(Extension::KhrLightsPunctual, false);
        self.root.extensions.khr_lights_punctual.lights.add(light)
    }

    pub fn add_backdrop(&mut self, backdrop: Backdrop) -> Index<Backdrop> {
        self.add_extension(Extension::EpicHdriBackdrops, false);
        self.root
            .extensions
            .epic_hdri_backdrops
            .backdrops
            .add(backdrop)
    }

    pub fn add_hotspot(&mut self, hotspot: Hotspot) -> Index<Hotspot> {
        self.add_extension(Extension::EpicAnimationHotspots, false);
        self.root
            .extensions
            .epic_animation_hotspots
            .hotspots
            .add(hotspot)
    }

    pub fn add_light_map(&mut self, light_map: LightMap) -> Index<LightMap> {
        self.add_extension(Extension::EpicLightmapTextures, false);
        self.root
            .extensions
            .epic_lightmap_textures
            .lightmaps
            .add(light_map)
    }

    pub fn add_variation(&mut self, variation: Variation) -> Index<Variation> {
        self.add_extension(Extension::EpicLevelVariantSets, false);
        self.root
            .extensions
            .epic_level_variant_sets
            .level_variant_sets
            .add(variation)
    }

    /// Appends `data` to the shared buffer, padded so the data starts at a
    /// multiple of `alignment`, and records a buffer view over it.
    ///
    /// glTF requires accessor data to start at a multiple of the component
    /// size; 4 covers every component type.
    pub fn add_buffer_view(
        &mut self,
        data: &[u8],
        target: Option<BufferTarget>,
        alignment: usize,
    ) -> Index<BufferView> {
        let byte_offset = self.buffer.pad_to(alignment);
        self.buffer.append(data);
        self.finish_buffer_view(byte_offset, data.len() as u64, None, target)
    }

    /// Like [`add_buffer_view`](Self::add_buffer_view) for interleaved
    /// vertex data with an explicit stride.
    pub fn add_buffer_view_with_stride(
        &mut self,
        data: &[u8],
        byte_stride: u32,
        target: Option<BufferTarget>,
        alignment: usize,
    ) -> Index<BufferView> {
        let byte_offset = self.buffer.pad_to(alignment);
        self.buffer.append(data);
        self.finish_buffer_view(byte_offset, data.len() as u64, Some(byte_stride), target)
    }

    fn finish_buffer_view(
        &mut self,
        byte_offset: u64,
        byte_length: u64,
        byte_stride: Option<u32>,
        target: Option<BufferTarget>,
    ) -> Index<BufferView> {
        self.root.buffers.get_mut(self.buffer_index).byte_length = self.buffer.len();

        self.root.buffer_views.add(BufferView {
            name: None,
            buffer: self.buffer_index,
            byte_offset: (byte_offset != 0).then(|| byte_offset),
            byte_length,
            byte_stride,
            target,
        })
    }

    /// Packs triangle indices, narrowing to 16-bit storage when every index
    /// fits.
    pub fn add_index_accessor(&mut self, indices: &[u32], name: Option<String>) -> Index<Accessor> {
        let narrow = indices.iter().all(|&index| index <= u16::MAX as u32);

        let byte_offset = self.buffer.pad_to(4);
        let (component_type, byte_length) = if narrow {
            let halves: Vec<u16> = indices.iter().map(|&index| index as u16).collect();
            self.buffer.append_u16s(&halves);
            (ComponentType::U16, indices.len() as u64 * 2)
        } else {
            self.buffer.append_u32s(indices);
            (ComponentType::U32, indices.len() as u64 * 4)
        };

        let view = self.finish_buffer_view(
            byte_offset,
            byte_length,
            None,
            Some(BufferTarget::ElementArrayBuffer),
        );

        self.root.accessors.add(Accessor {
            name,
            ..Accessor::new(view, component_type, AccessorType::Scalar, indices.len() as u64)
        })
    }

    /// Packs positions with the min/max bounds the format requires for
    /// `POSITION` accessors.
    pub fn add_position_accessor(
        &mut self,
        positions: &[Vec3],
        name: Option<String>,
    ) -> Index<Accessor> {
        let index = self.add_vec3_accessor(positions, name);

        if let (Some(&first), accessor) = (positions.first(), self.root.accessors.get_mut(index)) {
            let min = positions.iter().fold(first, |acc, &p| acc.min(p));
            let max = positions.iter().fold(first, |acc, &p| acc.max(p));
            accessor.min = Some(min.to_array().to_vec());
            accessor.max = Some(max.to_array().to_vec());
        }

        index
    }

    pub fn add_vec2_accessor(&mut self, values: &[Vec2], name: Option<String>) -> Index<Accessor> {
        let flat: Vec<f32> = values.iter().flat_map(|v| v.to_array()).collect();
        self.add_f32_accessor(&flat, AccessorType::Vec2, name)
    }

    pub fn add_vec3_accessor(&mut self, values: &[Vec3], name: Option<String>) -> Index<Accessor> {
        let flat: Vec<f32> = values.iter().flat_map(|v| v.to_array()).collect();
        self.add_f32_accessor(&flat, AccessorType::Vec3, name)
    }

    pub fn add_vec4_accessor(&mut self, values: &[Vec4], name: Option<String>) -> Index<Accessor> {
        let flat: Vec<f32> = values.iter().flat_map(|v| v.to_array()).collect();
        self.add_f32_accessor(&flat, AccessorType::Vec4, name)
    }

    fn add_f32_accessor(
        &mut self,
        flat: &[f32],
        element_type: AccessorType,
        name: Option<String>,
    ) -> Index<Accessor> {
        let count = (flat.len() / element_type.component_count()) as u64;

        let byte_offset = self.buffer.pad_to(4);
        self.buffer.append_f32s(flat);
        let view = self.finish_buffer_view(
            byte_offset,
            flat.len() as u64 * 4,
            None,
            Some(BufferTarget::ArrayBuffer),
        );

        self.root.accessors.add(Accessor {
            name,
            ..Accessor::new(view, ComponentType::F32, element_type, count)
        })
    }

    /// Registers a compressed image payload, deduplicated by content: the
    /// same bytes added twice return the same index and store one entry.
    ///
    /// Where the payload ends up depends on the output format: a buffer
    /// view for GLB, a sidecar file URI for loose output, a base64 data URI
    /// for embedded output.
    pub fn add_image(
        &mut self,
        compressed: &[u8],
        mime_type: MimeType,
        name: &str,
    ) -> Index<json::Image> {
        let key = BinaryHashKey::new(compressed);
        if let Some(&index) = self.image_indices.get(&key) {
            return index;
        }

        let image = match self.output {
            OutputFormat::Glb => json::Image {
                name: (!name.is_empty()).then(|| name.to_string()),
                mime_type: Some(mime_type),
                buffer_view: Some(self.add_buffer_view(compressed, None, 4)),
                uri: None,
            },
            OutputFormat::Gltf => {
                let uri = self.allocate_image_uri(name, mime_type);
                self.image_files.push(ImageFile {
                    uri: uri.clone(),
                    bytes: compressed.to_vec(),
                });
                json::Image {
                    name: None,
                    mime_type: None,
                    buffer_view: None,
                    uri: Some(uri),
                }
            }
            OutputFormat::GltfEmbedded => json::Image {
                name: (!name.is_empty()).then(|| name.to_string()),
                mime_type: None,
                buffer_view: None,
                uri: Some(format!(
                    "data:{};base64,{}",
                    mime_type.as_str(),
                    base64::encode(compressed)
                )),
            },
        };

        let index = self.root.images.add(image);
        self.image_indices.insert(key, index);
        index
    }

    /// First writer gets `name.png`; later distinct payloads with the same
    /// base name get `name_1.png`, `name_2.png`, and so on.
    fn allocate_image_uri(&mut self, name: &str, mime_type: MimeType) -> String {
        let base = if name.is_empty() { "image" } else { name };
        let extension = mime_type.file_extension();

        let mut uri = format!("{base}{extension}");
        let mut suffix = 1;
        while self.image_uris.contains(&uri) {
            uri = format!("{base}_{suffix}{extension}");
            suffix += 1;
        }

        self.image_uris.insert(uri.clone());
        uri
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn buffer_views_are_aligned_and_tracked() {
        let mut doc = Document::default();
        doc.add_buffer_view(&[1, 2, 3], None, 4);
        let second = doc.add_buffer_view(&[4, 5], Some(BufferTarget::ArrayBuffer), 4);

        let view = doc.root.buffer_views.get(second);
        assert_eq!(Some(4), view.byte_offset);
        assert_eq!(2, view.byte_length);
        assert_eq!(Some(BufferTarget::ArrayBuffer), view.target);

        // 3 data bytes, 1 pad byte, 2 data bytes.
        assert_eq!(6, doc.buffer_data().len());
        assert_eq!(6, doc.root.buffers.get(doc.buffer_index).byte_length);
    }

    #[test]
    fn identical_images_collapse_to_one_index() {
        let mut doc = Document::new(OutputFormat::Glb);
        let first = doc.add_image(&[1, 2, 3], MimeType::Png, "wood");
        let again = doc.add_image(&[1, 2, 3], MimeType::Png, "wood_copy");
        let other = doc.add_image(&[9, 9, 9], MimeType::Png, "steel");

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(2, doc.root.images.len());
    }

    #[test]
    fn sidecar_image_uris_avoid_collisions() {
        let mut doc = Document::new(OutputFormat::Gltf);
        doc.add_image(&[1], MimeType::Png, "wall");
        doc.add_image(&[2], MimeType::Png, "wall");
        doc.add_image(&[3], MimeType::Jpeg, "wall");

        let uris: Vec<&str> = doc.sidecar_images().iter().map(|f| f.uri.as_str()).collect();
        assert_eq!(vec!["wall.png", "wall_1.png", "wall.jpg"], uris);
    }

    #[test]
    fn embedded_images_use_data_uris() {
        let mut doc = Document::new(OutputFormat::GltfEmbedded);
        let index = doc.add_image(&[0xde, 0xad], MimeType::Jpeg, "noise");

        assert_eq!(
            Some("data:image/jpeg;base64,3q0=".to_string()),
            doc.root.images.get(index).uri
        );
    }

    #[test]
    fn index_accessor_narrows_to_u16() {
        let mut doc = Document::default();
        let narrow = doc.add_index_accessor(&[0, 1, 2], None);
        let wide = doc.add_index_accessor(&[0, 70_000, 2], None);

        assert_eq!(
            ComponentType::U16,
            doc.root.accessors.get(narrow).component_type
        );
        assert_eq!(
            ComponentType::U32,
            doc.root.accessors.get(wide).component_type
        );
        assert_eq!(
            Some(BufferTarget::ElementArrayBuffer),
            doc.root
                .buffer_views
                .get(doc.root.accessors.get(narrow).buffer_view.unwrap())
                .target
        );
    }

    #[test]
    fn position_accessor_records_bounds() {
        let mut doc = Document::default();
        let positions = [
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(-1.0, 4.0, 0.0),
            Vec3::new(0.0, 0.0, 3.0),
        ];
        let index = doc.add_position_accessor(&positions, Some("verts".to_string()));

        let accessor = doc.root.accessors.get(index);
        assert_eq!(3, accessor.count);
        assert_eq!(AccessorType::Vec3, accessor.element_type);
        assert_eq!(Some(vec![-1.0, -2.0, 0.0]), accessor.min);
        assert_eq!(Some(vec![1.0, 4.0, 3.0]), accessor.max);
    }

    #[test]
    fn adding_a_light_marks_the_extension_used() {
        let mut doc = Document::default();
        doc.add_light(Light::new(crate::json::scene::LightType::Point));
        doc.add_light(Light::new(crate::json::scene::LightType::Spot));

        assert_eq!(1, doc.root.extensions_used.len());
        assert!(doc
            .root
            .extensions_used
            .contains(&Extension::KhrLightsPunctual));
        assert!(doc.root.extensions_required.is_empty());
    }

    #[test]
    fn required_extensions_appear_in_both_lists() {
        let mut doc = Document::default();
        doc.add_extension(Extension::KhrMeshQuantization, true);
        doc.add_extension(Extension::KhrMeshQuantization, true);

        assert_eq!(1, doc.root.extensions_used.len());
        assert_eq!(1, doc.root.extensions_required.len());
    }

    #[test]
    fn child_nodes_link_to_their_parent() {
        let mut doc = Document::default();
        let parent = doc.add_child_node(None, json::Node::default());
        let child = doc.add_child_node(Some(parent), json::Node::default());

        assert_eq!(vec![child], doc.root.nodes.get(parent).children);
    }
}
