//! File-string packing.
//!
//! The crate's canonical framing for an ordered sequence of byte strings:
//! a 4-byte little-endian element count followed by, for each element, a
//! 4-byte little-endian length and the raw bytes. Elements may be empty
//! and no escaping is required; the format round-trips arbitrary binary
//! data. Disk nodes, chunked exports, and signable objects all serialize
//! through this one framing.

use super::{CodecError, Result};

/// Pack an ordered sequence of byte strings into a single record.
pub fn pack<B: AsRef<[u8]>>(parts: &[B]) -> Vec<u8> {
    let payload_len: usize = parts.iter().map(|p| p.as_ref().len() + 4).sum();
    let mut packed = Vec::with_capacity(4 + payload_len);
    packed.extend_from_slice(&(parts.len() as u32).to_le_bytes());
    for part in parts {
        let bytes = part.as_ref();
        packed.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        packed.extend_from_slice(bytes);
    }
    packed
}

/// Unpack a record produced by [`pack`], requiring the whole input to be
/// consumed.
pub fn unpack(data: &[u8]) -> Result<Vec<Vec<u8>>> {
    let (parts, consumed) = unpack_prefix(data)?;
    if consumed != data.len() {
        return Err(CodecError::Corruption(format!(
            "{} trailing bytes after packed record",
            data.len() - consumed
        )));
    }
    Ok(parts)
}

/// Unpack one record from the front of `data`, returning the elements and
/// the number of bytes consumed. Used when records are concatenated in a
/// larger stream.
pub fn unpack_prefix(data: &[u8]) -> Result<(Vec<Vec<u8>>, usize)> {
    let mut cursor = 0usize;
    let count = read_u32(data, &mut cursor)? as usize;
    let mut parts = Vec::with_capacity(count);
    for _ in 0..count {
        let len = read_u32(data, &mut cursor)? as usize;
        let end = cursor
            .checked_add(len)
            .filter(|end| *end <= data.len())
            .ok_or_else(|| {
                CodecError::Corruption(format!("element length {} exceeds record", len))
            })?;
        parts.push(data[cursor..end].to_vec());
        cursor = end;
    }
    Ok((parts, cursor))
}

fn read_u32(data: &[u8], cursor: &mut usize) -> Result<u32> {
    let end = *cursor + 4;
    if end > data.len() {
        return Err(CodecError::Corruption("truncated length prefix".into()));
    }
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&data[*cursor..end]);
    *cursor = end;
    Ok(u32::from_le_bytes(raw))
}

/// Sequential reader over a packed record.
///
/// Consumers that know the element layout (value, height, child keys, ...)
/// pull fields off in order instead of indexing into the unpacked vector.
pub struct PackReader {
    parts: Vec<Vec<u8>>,
    index: usize,
}

impl PackReader {
    /// Parse a packed record into a reader positioned at the first element.
    pub fn new(data: &[u8]) -> Result<Self> {
        Ok(Self {
            parts: unpack(data)?,
            index: 0,
        })
    }

    /// Number of elements not yet consumed.
    pub fn remaining(&self) -> usize {
        self.parts.len().saturating_sub(self.index)
    }

    /// Take the next element as raw bytes.
    pub fn next_part(&mut self) -> Result<Vec<u8>> {
        let part = self
            .parts
            .get(self.index)
            .cloned()
            .ok_or_else(|| CodecError::Corruption("packed record exhausted".into()))?;
        self.index += 1;
        Ok(part)
    }

    /// Take the next element as a UTF-8 string.
    pub fn next_str(&mut self) -> Result<String> {
        String::from_utf8(self.next_part()?)
            .map_err(|_| CodecError::Corruption("packed element is not UTF-8".into()))
    }
}
