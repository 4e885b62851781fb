//! Bounds-checked reader over a borrowed byte range.

use std::borrow::Cow;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::DecodeError;

/// Sequential little-endian reader over an immutable byte range.
///
/// A cursor never reads outside its own range. Cursors created with
/// [`ByteCursor::split_off`] borrow the same buffer and report offsets
/// relative to the start of the root buffer, so errors and traces from nested
/// frames still point at file positions.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    base: usize,
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor over the whole of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            base: 0,
            pos: 0,
        }
    }

    /// Absolute offset of the next byte to be read.
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    /// Position relative to the start of this cursor's range.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Length of this cursor's range.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Absolute offset one past the last byte of this cursor's range.
    pub fn end_offset(&self) -> usize {
        self.base + self.bytes.len()
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let slice = self
            .pos
            .checked_add(len)
            .and_then(|end| self.bytes.get(self.pos..end))
            .ok_or(DecodeError::UnexpectedEof {
                offset: self.offset(),
                needed: len,
                available: self.remaining(),
            })?;
        self.pos += len;
        Ok(slice)
    }

    /// Byte `ahead` positions past the current one, without consuming anything.
    pub fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.pos
            .checked_add(ahead)
            .and_then(|at| self.bytes.get(at))
            .copied()
    }

    pub fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    pub fn skip(&mut self, len: usize) -> Result<(), DecodeError> {
        self.take(len).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, DecodeError> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_i32_le(&mut self) -> Result<i32, DecodeError> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn read_f32_le(&mut self) -> Result<f32, DecodeError> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    /// Read a NUL-terminated string and step past the terminator.
    ///
    /// Invalid UTF-8 is replaced rather than rejected; valid text is borrowed
    /// straight from the buffer.
    pub fn read_cstr(&mut self) -> Result<Cow<'a, str>, DecodeError> {
        let start = self.offset();
        let rest = &self.bytes[self.pos..];
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(DecodeError::UnterminatedString { offset: start })?;
        let text = self.take(len)?;
        self.pos += 1;
        Ok(String::from_utf8_lossy(text))
    }

    /// Consume `byte`, or fail with a framing error if something else is there.
    pub fn expect(&mut self, byte: u8) -> Result<(), DecodeError> {
        let offset = self.offset();
        let found = self.peek().ok_or(DecodeError::UnexpectedEof {
            offset,
            needed: 1,
            available: 0,
        })?;
        if found != byte {
            return Err(DecodeError::Framing {
                offset,
                expected: byte,
                found,
            });
        }
        self.pos += 1;
        Ok(())
    }

    /// Hand out a cursor over the next `len` bytes and leave `self` untouched.
    ///
    /// The caller decides how far to advance its own cursor afterwards.
    pub fn split_off(&self, len: usize) -> Result<ByteCursor<'a>, DecodeError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or(DecodeError::UnexpectedEof {
                offset: self.offset(),
                needed: len,
                available: self.remaining(),
            })?;
        Ok(ByteCursor {
            bytes: &self.bytes[self.pos..end],
            base: self.offset(),
            pos: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_reads() {
        let bytes = [
            0x07, // u8
            0x34, 0x12, // u16
            0xfe, 0xff, 0xff, 0xff, // i32 -2
            0x00, 0x00, 0xc0, 0x3f, // f32 1.5
        ];
        let mut cursor = ByteCursor::new(&bytes);

        assert_eq!(cursor.read_u8().unwrap(), 7);
        assert_eq!(cursor.read_u16_le().unwrap(), 0x1234);
        assert_eq!(cursor.read_i32_le().unwrap(), -2);
        assert_eq!(cursor.read_f32_le().unwrap(), 1.5);
        assert!(cursor.is_at_end());
        assert_eq!(cursor.offset(), bytes.len());
    }

    #[test]
    fn test_read_past_end_does_not_move() {
        let bytes = [0x01];
        let mut cursor = ByteCursor::new(&bytes);

        let err = cursor.read_u16_le().unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnexpectedEof {
                offset: 0,
                needed: 2,
                available: 1
            }
        );
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.read_u8().unwrap(), 1);
    }

    #[test]
    fn test_cstr() {
        let bytes = b"abc\0de\0";
        let mut cursor = ByteCursor::new(bytes);

        assert_eq!(cursor.read_cstr().unwrap(), "abc");
        assert_eq!(cursor.offset(), 4);
        assert_eq!(cursor.read_cstr().unwrap(), "de");
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_cstr_without_terminator() {
        let bytes = b"xy";
        let mut cursor = ByteCursor::new(bytes);

        assert_eq!(
            cursor.read_cstr().unwrap_err(),
            DecodeError::UnterminatedString { offset: 0 }
        );
    }

    #[test]
    fn test_expect() {
        let bytes = [0xff, 0x00];
        let mut cursor = ByteCursor::new(&bytes);

        cursor.expect(0xff).unwrap();
        assert_eq!(
            cursor.expect(0xff).unwrap_err(),
            DecodeError::Framing {
                offset: 1,
                expected: 0xff,
                found: 0x00
            }
        );
        assert_eq!(cursor.offset(), 1);
    }

    #[test]
    fn test_split_off_reports_absolute_offsets() {
        let bytes = [0xaa, 0x01, 0x02, 0x03, 0xbb];
        let mut cursor = ByteCursor::new(&bytes);
        cursor.read_u8().unwrap();

        let mut inner = cursor.split_off(3).unwrap();
        assert_eq!(inner.offset(), 1);
        assert_eq!(inner.len(), 3);
        inner.skip(2).unwrap();
        assert_eq!(inner.offset(), 3);

        // the inner cursor is bounded by its own range
        assert_eq!(inner.read_u8().unwrap(), 0x03);
        assert!(inner.read_u8().is_err());

        // the outer cursor has not moved
        assert_eq!(cursor.offset(), 1);
        assert!(cursor.split_off(5).is_err());
    }
}
