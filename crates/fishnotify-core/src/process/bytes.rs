//! Little-endian views over raw byte slices.
//!
//! `ByteBuffer` is used wherever a fixed layout is decoded from copied bytes:
//! RIP-relative displacements inside scanned code and the fields of an
//! `EventPlay` packet.

use crate::error::{Error, Result};

/// A read-only little-endian view over a byte slice.
///
/// # Example
///
/// ```
/// use fishnotify_core::process::ByteBuffer;
///
/// let data = [0x00, 0x00, 0x78, 0x56, 0x34, 0x12];
/// let buf = ByteBuffer::new(&data);
///
/// assert_eq!(buf.read_i32_at(2).unwrap(), 0x12345678);
/// ```
pub struct ByteBuffer<'a> {
    data: &'a [u8],
}

impl<'a> ByteBuffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `len` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is out of bounds.
    pub fn slice_at(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        let end = offset
            .checked_add(len)
            .ok_or_else(|| Error::MemoryReadFailed {
                address: offset as u64,
                message: "Offset overflow".to_string(),
            })?;

        if end > self.data.len() {
            return Err(Error::MemoryReadFailed {
                address: offset as u64,
                message: format!(
                    "Slice range {}..{} exceeds buffer length {}",
                    offset,
                    end,
                    self.data.len()
                ),
            });
        }

        Ok(&self.data[offset..end])
    }

    pub fn read_u8_at(&self, offset: usize) -> Result<u8> {
        Ok(self.slice_at(offset, 1)?[0])
    }

    pub fn read_i16_at(&self, offset: usize) -> Result<i16> {
        let bytes = self.slice_at(offset, 2)?;
        Ok(i16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_i32_at(&self, offset: usize) -> Result<i32> {
        let bytes = self.slice_at(offset, 4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_u64_at(&self, offset: usize) -> Result<u64> {
        let bytes = self.slice_at(offset, 8)?;
        Ok(u64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_i32_at_negative_displacement() {
        let data = [0xF0, 0xFF, 0xFF, 0xFF];
        let buf = ByteBuffer::new(&data);

        assert_eq!(buf.read_i32_at(0).unwrap(), -16);
    }

    #[test]
    fn test_read_i16_at() {
        let data = [0x00, 0x05, 0x00];
        let buf = ByteBuffer::new(&data);

        assert_eq!(buf.read_i16_at(1).unwrap(), 5);
    }

    #[test]
    fn test_read_u64_at() {
        let data = [0xEF, 0xCD, 0xAB, 0x90, 0x78, 0x56, 0x34, 0x12];
        let buf = ByteBuffer::new(&data);

        assert_eq!(buf.read_u64_at(0).unwrap(), 0x1234567890ABCDEF);
    }

    #[test]
    fn test_read_past_end_is_error() {
        let data = [0x01, 0x02];
        let buf = ByteBuffer::new(&data);

        assert!(buf.read_i32_at(0).is_err());
        assert!(buf.read_u8_at(2).is_err());
        assert!(buf.slice_at(usize::MAX, 2).is_err());
    }
}
