//! Builders for synthetic PT buffers used across unit tests.

use crate::pt::record::{FILE_HEADER_LEN, MAGIC, SENTINEL};

/// Appends PT sections in file order.
///
/// `track` writes an `EZTR` header, so calling it after the clips closes the
/// clip run, and calling it again closes the previous track's records.
pub struct PtBuilder {
    bytes: Vec<u8>,
}

impl PtBuilder {
    pub fn new() -> Self {
        let mut bytes = MAGIC.to_vec();
        bytes.resize(FILE_HEADER_LEN, 0);
        Self { bytes }
    }

    pub fn clip(mut self, id: u8, filename: &str) -> Self {
        self.bytes.push(id);
        self.bytes.push(0);
        self.push_padded(filename, 64);
        self
    }

    pub fn track(mut self, name: &str) -> Self {
        self.bytes.extend_from_slice(SENTINEL);
        self.bytes.extend_from_slice(&[0, 0]);
        self.push_padded(name, 72);
        self
    }

    pub fn tempo(mut self, position: u16, kind: u8, bpm: f32) -> Self {
        self.bytes.extend_from_slice(&position.to_le_bytes());
        self.bytes.extend_from_slice(&[0, 0, kind]);
        self.bytes.extend_from_slice(&bpm.to_le_bytes());
        self.bytes.extend_from_slice(&[0, 0]);
        self
    }

    pub fn note(mut self, position: u16, kind: u8, clip_id: u8, length: u16) -> Self {
        self.bytes.extend_from_slice(&position.to_le_bytes());
        self.bytes.extend_from_slice(&[0, 0, kind, clip_id, 100, 64, 0]);
        self.bytes.extend_from_slice(&length.to_le_bytes());
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }

    fn push_padded(&mut self, text: &str, width: usize) {
        let mut field = text.as_bytes().to_vec();
        field.resize(width, 0);
        self.bytes.extend_from_slice(&field);
    }
}
