//! Forward-only binary cursor over an in-memory buffer.
//!
//! [`ByteCursor`] is the single reader both the NARC parser and the PRS
//! decompressor are built on. It borrows the caller's buffer and never
//! mutates it; all multi-byte reads are little-endian.

use std::io::Cursor;

use crate::utils::{fixed_string, le_u16, le_u32, magic, u8};
use crate::{Error, Result};

/// Sequential little-endian reader over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    inner: Cursor<&'a [u8]>,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            inner: Cursor::new(buf),
        }
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        u8(&mut self.inner)
    }

    /// Read a little-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16> {
        le_u16(&mut self.inner)
    }

    /// Read a little-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32> {
        le_u32(&mut self.inner)
    }

    /// Read a fixed-length text field of `len` bytes.
    pub fn read_text(&mut self, len: usize) -> Result<String> {
        fixed_string(&mut self.inner, len)
    }

    /// Consume a four-byte tag and check it against `expected`.
    ///
    /// Returns [`Error::BadMagic`] on mismatch.
    pub fn expect_magic(&mut self, expected: &[u8; 4]) -> Result<()> {
        magic(&mut self.inner, expected)
    }

    /// Absolute offset of the next byte to be read.
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    /// Copy the absolute byte range `start..end` out of the buffer.
    ///
    /// Does not move the cursor.
    pub fn slice(&self, start: u64, end: u64) -> Result<Vec<u8>> {
        let buf = *self.inner.get_ref();
        let invalid = || Error::InvalidRange {
            start,
            end,
            len: buf.len(),
        };
        let lo = usize::try_from(start).map_err(|_| invalid())?;
        let hi = usize::try_from(end).map_err(|_| invalid())?;
        buf.get(lo..hi).map(<[u8]>::to_vec).ok_or_else(invalid)
    }

    /// Total length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    /// Whether the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the cursor has reached (or passed) the end of the buffer.
    pub fn is_eof(&self) -> bool {
        self.position() >= self.len() as u64
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        (self.len() as u64).saturating_sub(self.position()) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_advance_by_width() {
        let data = [0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12, b'h', b'i'];
        let mut c = ByteCursor::new(&data);
        assert_eq!(c.read_u8().unwrap(), 0x01);
        assert_eq!(c.position(), 1);
        assert_eq!(c.read_u16().unwrap(), 0x1234);
        assert_eq!(c.position(), 3);
        assert_eq!(c.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(c.position(), 7);
        assert_eq!(c.read_text(2).unwrap(), "hi");
        assert!(c.is_eof());
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn slice_is_absolute_and_leaves_position() {
        let data = [10u8, 11, 12, 13, 14];
        let mut c = ByteCursor::new(&data);
        c.read_u16().unwrap();
        assert_eq!(c.slice(1, 4).unwrap(), vec![11, 12, 13]);
        assert_eq!(c.slice(5, 5).unwrap(), Vec::<u8>::new());
        assert_eq!(c.position(), 2);
    }

    #[test]
    fn slice_rejects_bad_ranges() {
        let data = [0u8; 4];
        let c = ByteCursor::new(&data);
        assert!(matches!(
            c.slice(2, 6),
            Err(Error::InvalidRange {
                start: 2,
                end: 6,
                len: 4,
            })
        ));
        assert!(matches!(c.slice(3, 1), Err(Error::InvalidRange { .. })));
    }

    #[test]
    fn read_past_end_is_eof() {
        let data = [0xFFu8];
        let mut c = ByteCursor::new(&data);
        assert!(matches!(c.read_u16(), Err(Error::UnexpectedEof)));
        let mut empty = ByteCursor::new(&[]);
        assert!(empty.is_empty());
        assert!(matches!(empty.read_u8(), Err(Error::UnexpectedEof)));
    }
}
