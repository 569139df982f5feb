//! PRS decompression.
//!
//! PRS is an LZ77 variant driven by a stream of control bits interleaved with
//! raw bytes. Control bits are packed into command bytes, consumed least
//! significant bit first; a new command byte is fetched only once the
//! previous one is spent.
//!
//! ## Instructions
//! ```text
//! 1            literal: copy the next input byte
//! 0 1 a b      long copy:  offset = (b:a) >> 3 (13 bits), amount = a & 7
//!              if input remains: amount == 0 -> next byte + 10
//!                                otherwise   -> amount + 2
//!              start = out.len() - 0x2000 + offset
//! 0 0 h l o    short copy: amount = (h:l) + 2, start = out.len() - 0x100 + o
//! ```
//! Copies proceed one byte at a time and may overlap the bytes they produce.
//! A start position outside the output so far yields zero bytes rather than
//! an error. Decompression stops as soon as the input is exhausted; the
//! output size is never declared.

#![cfg(feature = "compression")]

use tracing::{debug, trace};

use crate::Result;
use crate::cursor::ByteCursor;

/// Look-back window of a long copy.
const LONG_WINDOW: i64 = 0x2000;
/// Look-back window of a short copy.
const SHORT_WINDOW: i64 = 0x100;
/// Upper bound on output bytes per input byte: a three-byte long copy emits
/// at most 265 bytes.
const MAX_EXPANSION: usize = 89;

/// Control-bit reader layered over the byte stream it shares with raw reads.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    cursor: ByteCursor<'a>,
    command: u8,
    bits_left: u8,
}

impl<'a> BitReader<'a> {
    /// Start reading `data` from its first byte.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: ByteCursor::new(data),
            command: 0,
            bits_left: 0,
        }
    }

    /// Next control bit, fetching a new command byte when the current one is
    /// spent.
    pub fn get_bit(&mut self) -> Result<bool> {
        if self.bits_left == 0 {
            self.command = self.cursor.read_u8()?;
            self.bits_left = 8;
        }
        let bit = self.command & 1;
        self.command >>= 1;
        self.bits_left -= 1;
        Ok(bit != 0)
    }

    /// Next raw byte.
    pub fn get_byte(&mut self) -> Result<u8> {
        self.cursor.read_u8()
    }

    /// Whether every input byte has been consumed.
    pub fn is_eof(&self) -> bool {
        self.cursor.is_eof()
    }

    /// Absolute input offset of the next byte.
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }
}

/// Decompress a complete PRS stream.
///
/// Returns [`crate::Error::UnexpectedEof`] if an instruction needs more input
/// than the buffer holds.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    decompress_with_capacity(data, data.len())
}

/// Decompress a PRS stream into an output pre-sized for `capacity` bytes.
///
/// The capacity is only a hint; output still grows until the input ends.
/// Hints larger than `data` could ever expand to are clamped.
pub fn decompress_with_capacity(data: &[u8], capacity: usize) -> Result<Vec<u8>> {
    let mut r = BitReader::new(data);
    let limit = data.len().saturating_mul(MAX_EXPANSION);
    let mut out = Vec::with_capacity(capacity.min(limit));

    while !r.is_eof() {
        if r.get_bit()? {
            out.push(r.get_byte()?);
            continue;
        }

        let (start, amount) = if r.get_bit()? {
            let a = r.get_byte()?;
            let b = r.get_byte()?;
            let offset = i64::from(u16::from_le_bytes([a, b]) >> 3);
            let mut amount = usize::from(a & 7);
            if !r.is_eof() {
                amount = if amount == 0 {
                    usize::from(r.get_byte()?) + 10
                } else {
                    amount + 2
                };
            }
            (out.len() as i64 - LONG_WINDOW + offset, amount)
        } else {
            let high = usize::from(r.get_bit()?);
            let low = usize::from(r.get_bit()?);
            let offset = i64::from(r.get_byte()?);
            let amount = ((high << 1) | low) + 2;
            (out.len() as i64 - SHORT_WINDOW + offset, amount)
        };

        copy_back(&mut out, start, amount);
    }

    debug!(input = data.len(), output = out.len(), "PRS decompressed");
    Ok(out)
}

/// Append `amount` bytes read from `out[start..]`, one at a time.
///
/// Bytes appended by this call can be read again by it. Positions outside
/// the output produce zeros.
fn copy_back(out: &mut Vec<u8>, mut start: i64, amount: usize) {
    if start < 0 || start >= out.len() as i64 {
        trace!(
            start,
            amount,
            len = out.len(),
            "back-reference outside output"
        );
    }
    for _ in 0..amount {
        let byte = usize::try_from(start)
            .ok()
            .and_then(|i| out.get(i).copied())
            .unwrap_or(0);
        out.push(byte);
        start += 1;
    }
}
