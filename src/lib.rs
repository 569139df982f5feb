//! **nitrokit** - a Rust library for decoding Nintendo DS game assets.
//!
//! # Supported formats
//! | Module | Format |
//! |--------|--------|
//! | [`formats::narc`]     | NARC - Nitro ARChive with directory/name table |
//! | [`compression::prs`]  | PRS - bit-flag driven LZ77 compression (decode only) |
//!
//! Everything operates on caller-supplied in-memory buffers. Calls are
//! independent of one another and keep no state between invocations.

pub mod compression;
pub mod cursor;
pub mod error;
pub mod formats;
mod utils;

pub use error::{Error, Result};
