use std::hash::{Hash, Hasher};

use byteorder::{WriteBytesExt, LE};

/// The single growing byte region backing all accessors and GLB-embedded
/// images.
///
/// The accumulator itself enforces no alignment; callers pad via
/// [`pad_to`](BufferAccumulator::pad_to) before appending so that returned
/// offsets stay exact. All multi-byte appends are little-endian as glTF
/// requires.
#[derive(Default)]
pub struct BufferAccumulator {
    bytes: Vec<u8>,
}

impl BufferAccumulator {
    /// Copies `data` to the end of the buffer and returns the offset at
    /// which it begins.
    pub fn append(&mut self, data: &[u8]) -> u64 {
        let offset = self.bytes.len() as u64;
        self.bytes.extend_from_slice(data);
        offset
    }

    /// Appends zero fill until the buffer length is a multiple of
    /// `alignment`, returning the new end offset.
    pub fn pad_to(&mut self, alignment: usize) -> u64 {
        let fill = (alignment - self.bytes.len() % alignment) % alignment;
        self.bytes.resize(self.bytes.len() + fill, 0);
        self.bytes.len() as u64
    }

    pub fn append_f32s(&mut self, values: &[f32]) -> u64 {
        let offset = self.bytes.len() as u64;
        for &value in values {
            // Writes to a Vec cannot fail.
            self.bytes.write_f32::<LE>(value).unwrap();
        }
        offset
    }

    pub fn append_u32s(&mut self, values: &[u32]) -> u64 {
        let offset = self.bytes.len() as u64;
        for &value in values {
            self.bytes.write_u32::<LE>(value).unwrap();
        }
        offset
    }

    pub fn append_u16s(&mut self, values: &[u16]) -> u64 {
        let offset = self.bytes.len() as u64;
        for &value in values {
            self.bytes.write_u16::<LE>(value).unwrap();
        }
        offset
    }

    pub fn append_i16s(&mut self, values: &[i16]) -> u64 {
        let offset = self.bytes.len() as u64;
        for &value in values {
            self.bytes.write_i16::<LE>(value).unwrap();
        }
        offset
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

// Fixed seeds so a payload hashes the same wherever the key is built.
const HASH_SEEDS: (u64, u64, u64, u64) = (
    0x6c74_4667,
    0x2e30_3276,
    0x9e37_79b9_7f4a_7c15,
    0x2545_f491_4f6c_dd1d,
);

/// A content-identity key over a binary payload.
///
/// The 64-bit hash picks the bucket; equality always compares the full
/// payload, so two payloads are the same resource exactly when their bytes
/// are identical.
pub struct BinaryHashKey {
    hash: u64,
    bytes: Vec<u8>,
}

impl BinaryHashKey {
    pub fn new(bytes: &[u8]) -> Self {
        let state =
            ahash::RandomState::with_seeds(HASH_SEEDS.0, HASH_SEEDS.1, HASH_SEEDS.2, HASH_SEEDS.3);
        Self {
            hash: state.hash_one(bytes),
            bytes: bytes.to_vec(),
        }
    }
}

impl PartialEq for BinaryHashKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for BinaryHashKey {}

impl Hash for BinaryHashKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}
