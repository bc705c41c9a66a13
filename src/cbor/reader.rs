//! Bounds-checked byte cursor.

use crate::error::DecodeError;

/// Largest integer the decoder is willing to represent (2^53 - 1).
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// A read cursor over a payload owned by a single decode call.
#[derive(Debug, Clone)]
pub struct ByteCursor {
    bytes: Vec<u8>,
    offset: usize,
}

impl ByteCursor {
    /// Wrap raw bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Build a cursor from hex text, ignoring surrounding whitespace.
    pub fn from_hex(text: &str) -> Result<Self, DecodeError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DecodeError::MalformedInput(
                "Serialized transaction is empty".to_string(),
            ));
        }

        if trimmed.len() % 2 != 0 {
            return Err(DecodeError::MalformedInput(
                "Serialized transaction hex length must be even".to_string(),
            ));
        }

        let bytes = hex::decode(trimmed).map_err(|e| {
            DecodeError::MalformedInput(format!("Invalid hex payload: {}", e))
        })?;

        Ok(Self::new(bytes))
    }

    /// Current read position.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn ensure_available(&self, length: usize) -> Result<(), DecodeError> {
        if length > self.remaining() {
            return Err(DecodeError::UnexpectedEof);
        }
        Ok(())
    }

    /// Read a single byte.
    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        self.ensure_available(1)?;
        let value = self.bytes[self.offset];
        self.offset += 1;
        Ok(value)
    }

    /// Read `length` bytes. A zero length reads nothing.
    pub fn read_bytes(&mut self, length: usize) -> Result<&[u8], DecodeError> {
        if length == 0 {
            return Ok(&[]);
        }

        self.ensure_available(length)?;
        let start = self.offset;
        self.offset += length;
        Ok(&self.bytes[start..self.offset])
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Big-endian u16.
    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        self.read_array::<2>().map(u16::from_be_bytes)
    }

    /// Big-endian u32.
    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        self.read_array::<4>().map(u32::from_be_bytes)
    }

    /// Big-endian u64, refusing values above [`MAX_SAFE_INTEGER`].
    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        let value = self.read_array::<8>().map(u64::from_be_bytes)?;
        if value > MAX_SAFE_INTEGER {
            return Err(DecodeError::IntegerOverflow);
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_trims_whitespace() {
        let mut cursor = ByteCursor::from_hex("  84a0 \n").unwrap();
        assert_eq!(cursor.remaining(), 2);
        assert_eq!(cursor.read_byte().unwrap(), 0x84);
    }

    #[test]
    fn test_from_hex_rejects_bad_text() {
        for input in ["", "   ", "abc", "zz"] {
            assert!(matches!(
                ByteCursor::from_hex(input),
                Err(DecodeError::MalformedInput(_))
            ));
        }
    }

    #[test]
    fn test_read_past_end() {
        let mut cursor = ByteCursor::new(vec![0x01]);
        assert_eq!(cursor.read_byte().unwrap(), 1);
        assert_eq!(cursor.read_byte(), Err(DecodeError::UnexpectedEof));
        assert_eq!(cursor.offset(), 1);
    }

    #[test]
    fn test_read_zero_bytes_does_not_consume() {
        let mut cursor = ByteCursor::new(vec![]);
        assert!(cursor.read_bytes(0).unwrap().is_empty());
        assert_eq!(cursor.offset(), 0);
    }

    #[test]
    fn test_read_bytes_short() {
        let mut cursor = ByteCursor::new(vec![1, 2]);
        assert_eq!(cursor.read_bytes(3), Err(DecodeError::UnexpectedEof));
        assert_eq!(cursor.offset(), 0);
    }

    #[test]
    fn test_big_endian_integers() {
        let mut cursor = ByteCursor::new(vec![
            0x01, 0x02, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2a,
        ]);
        assert_eq!(cursor.read_u16().unwrap(), 0x0102);
        assert_eq!(cursor.read_u32().unwrap(), 0x100);
        assert_eq!(cursor.read_u64().unwrap(), 42);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_u64_overflow() {
        let mut cursor = ByteCursor::new(vec![0x00, 0x20, 0, 0, 0, 0, 0, 0]);
        assert_eq!(cursor.read_u64(), Err(DecodeError::IntegerOverflow));

        let mut cursor = ByteCursor::new(vec![0x00, 0x1f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
        assert_eq!(cursor.read_u64().unwrap(), MAX_SAFE_INTEGER);
    }
}
