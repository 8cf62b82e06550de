use crate::error::{ConvertError, Section};

use super::record::{Record, SENTINEL};

/// Forward-only cursor over an immutable PT buffer.
///
/// Records are consumed whole or not at all: a read that would run past the
/// end of the buffer fails instead of returning a short record.
pub struct RecordReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> RecordReader<'a> {
    pub fn new(bytes: &'a [u8], offset: usize) -> Self {
        Self { bytes, offset }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }

    pub fn at_end(&self) -> bool {
        self.remaining() == 0
    }

    /// True when the next four bytes are the section marker.
    pub fn at_sentinel(&self) -> bool {
        self.remaining() >= SENTINEL.len()
            && &self.bytes[self.offset..self.offset + SENTINEL.len()] == SENTINEL
    }

    pub fn read<R: Record>(&mut self, section: Section) -> Result<R, ConvertError> {
        if self.remaining() < R::LEN {
            return Err(ConvertError::format(
                section,
                self.offset,
                format!(
                    "truncated record: need {} bytes, {} remain",
                    R::LEN,
                    self.remaining()
                ),
            ));
        }
        let record = R::decode(&self.bytes[self.offset..self.offset + R::LEN]);
        self.offset += R::LEN;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pt::record::NoteRecord;

    #[test]
    fn test_sentinel_detection() {
        let bytes = b"xxEZTRyy";
        let reader = RecordReader::new(bytes, 2);
        assert!(reader.at_sentinel());
        let reader = RecordReader::new(bytes, 3);
        assert!(!reader.at_sentinel());
        // Partial marker at the very end is not a sentinel
        let reader = RecordReader::new(b"EZT", 0);
        assert!(!reader.at_sentinel());
    }

    #[test]
    fn test_short_read_fails_without_consuming() {
        let bytes = [0u8; 10];
        let mut reader = RecordReader::new(&bytes, 0);
        let err = reader.read::<NoteRecord>(Section::Lane(0)).unwrap_err();
        assert!(err.to_string().contains("need 11 bytes, 10 remain"));
        assert_eq!(reader.offset(), 0);
    }

    #[test]
    fn test_read_advances_by_record_length() {
        let bytes = [0u8; 22];
        let mut reader = RecordReader::new(&bytes, 0);
        reader.read::<NoteRecord>(Section::Lane(0)).unwrap();
        assert_eq!(reader.offset(), 11);
        reader.read::<NoteRecord>(Section::Lane(0)).unwrap();
        assert!(reader.at_end());
    }
}
