//! NARC (Nitro ARChive) - Nintendo DS asset archive.
//!
//! Bundles many files together with a directory/name hierarchy. Commonly
//! found on DS cartridges, sometimes wrapped in PRS compression (see
//! [`crate::compression::prs`]).
//!
//! ## Layout
//! ```text
//! [0x00] NARC header  (0x10 bytes)
//! [0x10] BTAF section (0x0C bytes) + allocation entries (FileCount × 0x08)
//! [...]  BTNF section (0x08 bytes) + directory table + name stream
//! [...]  File data
//! ```
//!
//! ## NARC Header (0x10 bytes)
//! ```text
//! [0x00] Magic "NARC"     (4 bytes)
//! [0x04] ByteOrder        (u16 LE, not validated)
//! [0x06] Version          (u16 LE, not validated)
//! [0x08] ArchiveLength    (u32 LE)
//! [0x0C] HeaderLength     (u16 LE)
//! [0x0E] SectionCount     (u16 LE, not validated)
//! ```
//!
//! ## BTAF Section (File Allocation Table)
//! ```text
//! [0x00] Magic "BTAF"     (4 bytes)
//! [0x04] SectionLength    (u32 LE)
//! [0x08] FileCount        (u32 LE)
//! [0x0C] Entries          (FileCount × { StartOffset u32, EndOffset u32 })
//! ```
//! Offsets are relative to the first byte after the BTNF section header.
//!
//! ## BTNF Section (File Name Table)
//! ```text
//! [0x00] Magic            (4 bytes, not validated)
//! [0x04] SectionLength    (u32 LE)
//! [0x08] RootNameOffset   (u32 LE)
//! ```
//! When `SectionLength < 16` or `RootNameOffset == 4` the archive carries no
//! names and every file is named `""`. Otherwise:
//! ```text
//! [0x0C] RootFirstFile    (u16 LE)
//! [0x0E] DirectoryCount   (u16 LE)
//! [0x10] Directory entries 1..DirectoryCount, each:
//!        NameOffset (u32 LE), FirstFile (u16 LE), Parent (u16 LE, low 12 bits)
//! [...]  Name stream
//! ```
//!
//! ## Name Stream
//! One run of entries per directory, in directory-index order, each run
//! closed by a `0x00` byte. An entry starts with a length byte:
//! * bit 7 set - subdirectory: `len & 0x7F` name bytes, then a `u16` whose
//!   low 12 bits index the directory being named.
//! * bit 7 clear - file: `len` name bytes naming the next file in
//!   allocation order, prefixed with the current directory's name.
//!
//! Directory names are always assigned before files inside them are named,
//! so resolution follows the byte stream rather than a tree walk.

use std::ops::Index;

use tracing::{debug, trace};

use crate::cursor::ByteCursor;
use crate::{Error, Result};

const NARC_MAGIC: &[u8; 4] = b"NARC";
const BTAF_MAGIC: &[u8; 4] = b"BTAF";

/// Root name offset marking an archive without a name table.
const NAMELESS_ROOT_OFFSET: u32 = 4;
/// Smallest BTNF section that can hold a directory table.
const MIN_NAMED_BTNF_LEN: u32 = 16;
/// Directory indices are stored in the low 12 bits of a `u16`.
const DIRECTORY_INDEX_MASK: u16 = 0x0FFF;
const SUBDIRECTORY_FLAG: u8 = 0x80;
const NAME_LENGTH_MASK: u8 = 0x7F;

/// Fixed NARC header. Only the magic is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarcHeader {
    /// Always `"NARC"` once parsed.
    pub magic: [u8; 4],
    /// Byte-order mark (normally `0xFFFE`).
    pub byte_order: u16,
    /// Format version (normally `0x0100`).
    pub version: u16,
    /// Declared archive length in bytes.
    pub archive_len: u32,
    /// Declared header length (normally `0x10`).
    pub header_len: u16,
    /// Declared number of sections that follow.
    pub section_count: u16,
}

impl NarcHeader {
    fn read(r: &mut ByteCursor<'_>) -> Result<Self> {
        r.expect_magic(NARC_MAGIC)?;
        Ok(Self {
            magic: *NARC_MAGIC,
            byte_order: r.read_u16()?,
            version: r.read_u16()?,
            archive_len: r.read_u32()?,
            header_len: r.read_u16()?,
            section_count: r.read_u16()?,
        })
    }
}

/// One BTAF entry: a file's byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FatEntry {
    /// Inclusive start offset.
    pub start_offset: u64,
    /// Exclusive end offset.
    pub end_offset: u64,
}

impl FatEntry {
    /// Shift both offsets by `base`, turning section-relative offsets into
    /// absolute buffer offsets.
    pub fn relocate(self, base: u64) -> Self {
        Self {
            start_offset: self.start_offset + base,
            end_offset: self.end_offset + base,
        }
    }
}

/// One entry of the BTNF directory table.
///
/// Directories form a tree addressed purely by index into
/// [`Narc::directories`]; index 0 is the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Index of the parent directory ([`None`] for the root).
    pub parent: Option<usize>,
    /// Directory name. Unnamed directories keep a placeholder: their parent
    /// index, zero-padded to three digits.
    pub name: String,
    /// Offset of this directory's run in the name stream.
    pub name_entry_offset: u32,
    /// Allocation index of the first file in this directory.
    pub first_file_index: u16,
}

impl DirectoryEntry {
    /// Whether this is the root directory.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// A file extracted from a NARC archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarcFile {
    /// Full name (directory name followed by the file's own segment), or
    /// `""` when the archive has no name table.
    pub name: String,
    /// File contents.
    pub data: Vec<u8>,
}

impl NarcFile {
    /// Size of this file's data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Parsed NARC archive.
#[derive(Debug, Clone)]
pub struct Narc {
    /// The fixed archive header.
    pub header: NarcHeader,
    /// Directory table; empty when the archive has no name table.
    pub directories: Vec<DirectoryEntry>,
    /// Files in allocation-table order.
    pub files: Vec<NarcFile>,
}

impl Narc {
    /// Parse a complete NARC archive held in `buf`.
    ///
    /// Fails without a partial result on a bad `NARC`/`BTAF` tag, a read past
    /// the end of `buf`, a file range outside `buf`, or a directory/file
    /// index the tables do not declare.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let mut r = ByteCursor::new(buf);

        let header = NarcHeader::read(&mut r)?;
        let fat = read_fat(&mut r)?;

        // BTNF header; its tag is accepted as-is.
        let _btnf_magic = r.read_u32()?;
        let btnf_len = r.read_u32()?;

        let base = r.position();
        let fat: Vec<FatEntry> = fat.into_iter().map(|e| e.relocate(base)).collect();
        debug!(
            files = fat.len(),
            base,
            btnf_len,
            "read NARC allocation table"
        );

        let root_name_offset = r.read_u32()?;
        let (directories, names) =
            if btnf_len >= MIN_NAMED_BTNF_LEN && root_name_offset != NAMELESS_ROOT_OFFSET {
                let (directories, count) = read_directory_table(&mut r, root_name_offset)?;
                walk_names(&mut r, directories, count, fat.len())?
            } else {
                debug!(root_name_offset, "NARC has no name table");
                (Vec::new(), vec![String::new(); fat.len()])
            };

        let files = fat
            .iter()
            .zip(names)
            .map(|(entry, name)| {
                let data = r.slice(entry.start_offset, entry.end_offset)?;
                Ok::<_, Error>(NarcFile { name, data })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            header,
            directories,
            files,
        })
    }

    /// Iterate over all files in allocation order.
    pub fn files(&self) -> impl Iterator<Item = &NarcFile> {
        self.files.iter()
    }

    /// Find a file by its full name. Returns [`None`] if not found.
    pub fn get_file_by_name(&self, name: &str) -> Option<&NarcFile> {
        self.files.iter().find(|f| f.name == name)
    }

    /// Consume the archive, returning its files.
    pub fn into_files(self) -> Vec<NarcFile> {
        self.files
    }
}

impl Index<&str> for Narc {
    type Output = NarcFile;

    /// Index by full file name.
    ///
    /// # Panics
    /// Panics if the file name does not exist in the archive.
    fn index(&self, index: &str) -> &Self::Output {
        self.get_file_by_name(index)
            .unwrap_or_else(|| panic!("no file '{index}' in NARC"))
    }
}

/// Decode a NARC archive into its files, in allocation-table order.
pub fn decode(buf: &[u8]) -> Result<Vec<NarcFile>> {
    Narc::parse(buf).map(Narc::into_files)
}

/// Whether `buf` starts with the NARC magic.
pub fn is_narc(buf: &[u8]) -> bool {
    buf.starts_with(NARC_MAGIC)
}

fn read_fat(r: &mut ByteCursor<'_>) -> Result<Vec<FatEntry>> {
    r.expect_magic(BTAF_MAGIC)?;
    let _section_len = r.read_u32()?;
    let count = r.read_u32()? as usize;

    // Cap the reservation by what the buffer could actually hold.
    let mut entries = Vec::with_capacity(count.min(r.remaining() / 8));
    for _ in 0..count {
        let start_offset = u64::from(r.read_u32()?);
        let end_offset = u64::from(r.read_u32()?);
        entries.push(FatEntry {
            start_offset,
            end_offset,
        });
    }
    Ok(entries)
}

/// Read the BTNF directory table that follows the root name offset.
///
/// Returns the entries (always at least the root) and the declared count.
fn read_directory_table(
    r: &mut ByteCursor<'_>,
    root_name_offset: u32,
) -> Result<(Vec<DirectoryEntry>, usize)> {
    let first_file_index = r.read_u16()?;
    let count = usize::from(r.read_u16()?);

    let mut directories = Vec::with_capacity(count.max(1));
    directories.push(DirectoryEntry {
        parent: None,
        name: String::new(),
        name_entry_offset: root_name_offset,
        first_file_index,
    });

    for _ in 1..count {
        let name_entry_offset = r.read_u32()?;
        let first_file_index = r.read_u16()?;
        let parent = usize::from(r.read_u16()? & DIRECTORY_INDEX_MASK);
        if parent >= count {
            return Err(Error::DirectoryIndexOutOfRange {
                index: parent,
                count,
            });
        }
        trace!(
            index = directories.len(),
            parent,
            first_file_index,
            "directory entry"
        );
        directories.push(DirectoryEntry {
            parent: Some(parent),
            name: format!("{parent:03}"),
            name_entry_offset,
            first_file_index,
        });
    }

    debug!(directories = count, "read NARC directory table");
    Ok((directories, count))
}

/// Walk the name stream, naming subdirectories and files as they appear.
///
/// Returns the renamed directory table and one name per allocation entry;
/// files the stream never reaches keep an empty name.
fn walk_names(
    r: &mut ByteCursor<'_>,
    mut directories: Vec<DirectoryEntry>,
    count: usize,
    file_count: usize,
) -> Result<(Vec<DirectoryEntry>, Vec<String>)> {
    let mut names = vec![String::new(); file_count];
    let mut directory_index = 0;
    let mut file_index = 0;

    while directory_index < count {
        let byte = r.read_u8()?;
        if byte == 0 {
            directory_index += 1;
            continue;
        }

        let segment = r.read_text(usize::from(byte & NAME_LENGTH_MASK))?;

        if byte & SUBDIRECTORY_FLAG != 0 {
            let target = usize::from(r.read_u16()? & DIRECTORY_INDEX_MASK);
            let entry = directories
                .get_mut(target)
                .ok_or(Error::DirectoryIndexOutOfRange {
                    index: target,
                    count,
                })?;
            trace!(target, name = %segment, "name directory");
            entry.name = segment;
        } else {
            let slot = names
                .get_mut(file_index)
                .ok_or(Error::FileIndexOutOfRange {
                    index: file_index,
                    count: file_count,
                })?;
            // directory_index < count == directories.len()
            *slot = format!("{}{}", directories[directory_index].name, segment);
            trace!(file_index, name = %slot, "name file");
            file_index += 1;
        }
    }

    Ok((directories, names))
}
