//! Fixed-width record layouts of the PT format.
//!
//! Every field is named, reserved bytes included, so each record always
//! consumes exactly `LEN` bytes. All integers are little-endian.

/// Magic bytes at the start of every PT file.
pub const MAGIC: &[u8; 4] = b"PTFF";

/// Marker opening every track header; also terminates the record run before it.
pub const SENTINEL: &[u8; 4] = b"EZTR";

/// Size of the file header; the clip section follows it.
pub const FILE_HEADER_LEN: usize = 0x18;

/// Tempo records with this kind carry a BPM value.
pub const TEMPO_KIND: u8 = 3;

/// Note records with this kind are note-on events.
pub const NOTE_KIND: u8 = 1;

/// A fixed-size record decoded from exactly `LEN` bytes.
pub trait Record: Sized {
    const LEN: usize;

    /// Decode from a slice of exactly `Self::LEN` bytes.
    fn decode(bytes: &[u8]) -> Self;
}

fn u16_at(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn f32_at(bytes: &[u8], at: usize) -> f32 {
    f32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn array_at<const N: usize>(bytes: &[u8], at: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[at..at + N]);
    out
}

/// Text stored in a fixed NUL-padded field, up to its first NUL.
pub fn nul_terminated(field: &[u8]) -> &[u8] {
    match field.iter().position(|&b| b == 0) {
        Some(end) => &field[..end],
        None => field,
    }
}

/// Clip declaration: `id, reserved, filename[64]`.
#[derive(Debug, Clone)]
pub struct ClipRecord {
    pub id: u8,
    pub reserved: u8,
    pub filename: [u8; 64],
}

impl Record for ClipRecord {
    const LEN: usize = 0x42;

    fn decode(bytes: &[u8]) -> Self {
        ClipRecord {
            id: bytes[0],
            reserved: bytes[1],
            filename: array_at(bytes, 2),
        }
    }
}

/// Header opening the tempo track and every note lane.
#[derive(Debug, Clone)]
pub struct TrackHeader {
    pub marker: [u8; 4],
    pub reserved: [u8; 2],
    pub name: [u8; 72],
}

impl Record for TrackHeader {
    const LEN: usize = 0x4e;

    fn decode(bytes: &[u8]) -> Self {
        TrackHeader {
            marker: array_at(bytes, 0),
            reserved: array_at(bytes, 4),
            name: array_at(bytes, 6),
        }
    }
}

/// Tempo track entry: `position, reserved[2], kind, bpm, unknown, padding`.
#[derive(Debug, Clone, Copy)]
pub struct TempoRecord {
    pub position: u16,
    pub reserved: [u8; 2],
    pub kind: u8,
    pub bpm: f32,
    pub unknown: u8,
    pub padding: u8,
}

impl Record for TempoRecord {
    const LEN: usize = 0x0b;

    fn decode(bytes: &[u8]) -> Self {
        TempoRecord {
            position: u16_at(bytes, 0),
            reserved: array_at(bytes, 2),
            kind: bytes[4],
            bpm: f32_at(bytes, 5),
            unknown: bytes[9],
            padding: bytes[10],
        }
    }
}

/// Lane entry: `position, reserved[2], kind, clip, volume, pan, unknown, length`.
#[derive(Debug, Clone, Copy)]
pub struct NoteRecord {
    pub position: u16,
    pub reserved: [u8; 2],
    pub kind: u8,
    pub clip_id: u8,
    pub volume: u8,
    pub pan: u8,
    pub unknown: u8,
    pub length: u16,
}

impl Record for NoteRecord {
    const LEN: usize = 0x0b;

    fn decode(bytes: &[u8]) -> Self {
        NoteRecord {
            position: u16_at(bytes, 0),
            reserved: array_at(bytes, 2),
            kind: bytes[4],
            clip_id: bytes[5],
            volume: bytes[6],
            pan: bytes[7],
            unknown: bytes[8],
            length: u16_at(bytes, 9),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tempo_record_layout() {
        let mut bytes = vec![0x80, 0x01, 0xaa, 0xbb, 3];
        bytes.extend_from_slice(&150.5f32.to_le_bytes());
        bytes.extend_from_slice(&[7, 0]);
        assert_eq!(bytes.len(), TempoRecord::LEN);

        let rec = TempoRecord::decode(&bytes);
        assert_eq!(rec.position, 0x180);
        assert_eq!(rec.reserved, [0xaa, 0xbb]);
        assert_eq!(rec.kind, TEMPO_KIND);
        assert_eq!(rec.bpm, 150.5);
        assert_eq!(rec.unknown, 7);
    }

    #[test]
    fn test_note_record_layout() {
        let bytes: [u8; 11] = [0x30, 0x00, 0, 0, 1, 0x0a, 100, 64, 0, 0x0c, 0x00];
        let rec = NoteRecord::decode(&bytes);
        assert_eq!(rec.position, 48);
        assert_eq!(rec.kind, NOTE_KIND);
        assert_eq!(rec.clip_id, 0x0a);
        assert_eq!(rec.volume, 100);
        assert_eq!(rec.pan, 64);
        assert_eq!(rec.length, 12);
    }

    #[test]
    fn test_nul_terminated() {
        assert_eq!(nul_terminated(b"abc\0def"), b"abc");
        assert_eq!(nul_terminated(b"abc"), b"abc");
        assert_eq!(nul_terminated(b"\0\0"), b"");
    }
}
