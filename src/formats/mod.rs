//! Parsers for Nintendo DS container formats.
//!
//! Parsers follow the same conventions:
//!
//! * **In-memory input** - each parser takes the complete container as a
//!   `&[u8]` and reads it through a [`crate::cursor::ByteCursor`].
//! * **Owned output** - file contents are copied out, so the result does not
//!   borrow the input buffer.
//! * **Compression is separate** - parsers receive already-decompressed
//!   bytes. Use [`crate::compression`] first when an archive is PRS-packed.
//!
//! ## Format overview
//!
//! | Module   | Format | Description |
//! |----------|--------|-------------|
//! | [`narc`] | NARC   | Nitro ARChive; named files under a directory hierarchy |

pub mod narc;
