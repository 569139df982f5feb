//! Fixture builders shared by the integration tests.
#![allow(dead_code)]

/// Name stream entry for a file segment.
pub fn file_name(segment: &str) -> Vec<u8> {
    let mut out = vec![segment.len() as u8];
    out.extend_from_slice(segment.as_bytes());
    out
}

/// Name stream entry naming directory `index`.
pub fn dir_name(segment: &str, index: u16) -> Vec<u8> {
    let mut out = vec![0x80 | segment.len() as u8];
    out.extend_from_slice(segment.as_bytes());
    out.extend_from_slice(&(0xF000 | index).to_le_bytes());
    out
}

/// BTNF body (everything after the 8-byte section header) for a named
/// archive: root name offset, directory table, then `stream`.
///
/// `parents[i]` is the parent of directory `i + 1`.
pub fn named_table(parents: &[u16], stream: &[u8]) -> Vec<u8> {
    let count = parents.len() as u16 + 1;
    let mut body = Vec::new();
    body.extend_from_slice(&(u32::from(count) * 8).to_le_bytes());
    body.extend_from_slice(&0u16.to_le_bytes());
    body.extend_from_slice(&count.to_le_bytes());
    for &parent in parents {
        body.extend_from_slice(&0u32.to_le_bytes());
        body.extend_from_slice(&0u16.to_le_bytes());
        body.extend_from_slice(&(0xF000 | parent).to_le_bytes());
    }
    body.extend_from_slice(stream);
    body
}

/// BTNF body with the "no names" root offset of 4, padded to 16 bytes.
pub fn nameless_table() -> Vec<u8> {
    let mut body = 4u32.to_le_bytes().to_vec();
    body.resize(16, 0);
    body
}

/// Assemble a NARC: header, BTAF, a BTNF with `btnf_body`, then file data.
///
/// Allocation offsets are relative to the end of the BTNF header, so file
/// data is laid out directly after the body.
pub fn build_narc(files: &[&[u8]], btnf_body: &[u8]) -> Vec<u8> {
    build_narc_with(files, btnf_body, b"BTNF", 8 + btnf_body.len() as u32)
}

pub fn build_narc_with(
    files: &[&[u8]],
    btnf_body: &[u8],
    btnf_tag: &[u8; 4],
    btnf_len: u32,
) -> Vec<u8> {
    let btaf_len = 12 + 8 * files.len() as u32;
    let data_len: usize = files.iter().map(|f| f.len()).sum();
    let total = 16 + btaf_len as usize + 8 + btnf_body.len() + data_len;

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"NARC");
    out.extend_from_slice(&0xFFFEu16.to_le_bytes());
    out.extend_from_slice(&0x0100u16.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&0x10u16.to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());

    out.extend_from_slice(b"BTAF");
    out.extend_from_slice(&btaf_len.to_le_bytes());
    out.extend_from_slice(&(files.len() as u32).to_le_bytes());
    let mut offset = btnf_body.len() as u32;
    for file in files {
        out.extend_from_slice(&offset.to_le_bytes());
        offset += file.len() as u32;
        out.extend_from_slice(&offset.to_le_bytes());
    }

    out.extend_from_slice(btnf_tag);
    out.extend_from_slice(&btnf_len.to_le_bytes());
    out.extend_from_slice(btnf_body);
    for file in files {
        out.extend_from_slice(file);
    }
    out
}

/// Encode `payload` as a PRS stream made only of literals.
pub fn literal_stream(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + payload.len() / 8 + 1);
    for chunk in payload.chunks(8) {
        out.push((0xFFu16 >> (8 - chunk.len())) as u8);
        out.extend_from_slice(chunk);
    }
    out
}
