//! Library-wide error and result types.

use std::io;

use thiserror::Error;

/// Result alias used throughout nitrokit.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the library can produce.
///
/// Every variant is fatal: the call that produced it returns no partial
/// result. Out-of-range PRS back-references are not errors (they zero-fill).
#[derive(Debug, Error)]
pub enum Error {
    /// A magic/section tag did not match the expected value.
    #[error("bad magic: expected {expected:?}, found {found:?}")]
    BadMagic {
        /// The tag the parser required.
        expected: [u8; 4],
        /// The bytes actually present.
        found: [u8; 4],
    },
    /// The buffer ended before all expected bytes could be read.
    #[error("unexpected end of data")]
    UnexpectedEof,
    /// A byte range is inverted or extends past the end of the buffer.
    #[error("invalid byte range {start}..{end} (buffer length {len})")]
    InvalidRange {
        /// Inclusive start offset.
        start: u64,
        /// Exclusive end offset.
        end: u64,
        /// Length of the buffer the range was taken from.
        len: usize,
    },
    /// A directory table reference points past the declared directory count.
    #[error("directory index {index} out of range ({count} directories)")]
    DirectoryIndexOutOfRange {
        /// Offending index.
        index: usize,
        /// Declared directory count.
        count: usize,
    },
    /// The name table names more files than the allocation table holds.
    #[error("file index {index} out of range ({count} files)")]
    FileIndexOutOfRange {
        /// Offending index.
        index: usize,
        /// Declared file count.
        count: usize,
    },
    /// An underlying read failed for a reason other than end of data.
    #[error("I/O error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::UnexpectedEof
        } else {
            Error::Io(e)
        }
    }
}
