//! Decompression helpers (requires the `compression` feature, on by default).
//!
//! ```toml
//! [dependencies]
//! nitrokit = { version = "0.1", default-features = false }  # parsers only
//! ```
//!
//! ## Submodules
//!
//! | Module  | Algorithm | Typical use in nitrokit |
//! |---------|-----------|-------------------------|
//! | [`prs`] | PRS (LZ77 variant, bit-flag driven) | Individual assets and whole NARC archives |
//!
//! PRS streams carry no header and no declared size: decompress the whole
//! buffer with [`prs::decompress`], then hand the result to
//! [`crate::formats::narc::Narc::parse`] if it is an archive.

#[cfg(feature = "compression")]
pub mod prs;
