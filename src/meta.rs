//! Archive meta header — the 416-byte record at the top of every archive.
//!
//! # Layout (little-endian)
//! ```text
//! offset  size  field
//! 0x000   128   name        UTF-16LE, null-padded
//! 0x080   8     header_pos
//! 0x088   4     header_size
//! 0x08c   8     data_pos
//! 0x094   4     data_size
//! 0x098   4     rsv_0       must be 0
//! 0x09c   4     rsv_1       must be 1
//! 0x0a0   256   sha_256     content hash, copied verbatim
//! ```
//! The reserved pair is validated on read and rewritten as constants on
//! write; it is not user-settable.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use crate::error::FormatError;

pub const NAME_FIELD_SIZE: usize = 128;
pub const HASH_FIELD_SIZE: usize = 256;
/// Encoded size of the meta header in bytes.
pub const META_BLOCK_SIZE: usize = NAME_FIELD_SIZE + 8 + 4 + 8 + 4 + 4 + 4 + HASH_FIELD_SIZE;

pub const RSV_0: u32 = 0;
pub const RSV_1: u32 = 1;

// ── ArchivePtrs ──────────────────────────────────────────────────────────────

/// Positions and sizes of the two top-level blocks, as absolute stream
/// offsets.  Plain value type; zeroed until the writer knows the final
/// layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArchivePtrs {
    pub header_pos:  u64,
    pub header_size: u32,
    pub data_pos:    u64,
    pub data_size:   u32,
}

// ── MetaBlock ────────────────────────────────────────────────────────────────

/// Decoded meta header: display name, block pointers, content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaBlock {
    pub name:    String,
    pub ptrs:    ArchivePtrs,
    pub sha_256: [u8; HASH_FIELD_SIZE],
}

impl MetaBlock {
    /// Placeholder block for write-backs, used before final offsets and the
    /// content hash are known.  The hash is a recognisable dummy pattern so
    /// an unpatched header is obvious in a hex dump.
    pub fn default_block() -> Self {
        let pattern = *b"default hash.   ";
        let mut sha_256 = [0u8; HASH_FIELD_SIZE];
        for chunk in sha_256.chunks_exact_mut(pattern.len()) {
            chunk.copy_from_slice(&pattern);
        }
        Self {
            name: "Default Meta Block".to_owned(),
            ptrs: ArchivePtrs::default(),
            sha_256,
        }
    }

    pub fn read<R: Read>(mut reader: R) -> Result<Self, FormatError> {
        let mut name_bytes = [0u8; NAME_FIELD_SIZE];
        reader.read_exact(&mut name_bytes)?;
        let name = decode_utf16_fixed(&name_bytes)?;

        let header_pos = reader.read_u64::<LittleEndian>()?;
        let header_size = reader.read_u32::<LittleEndian>()?;
        let data_pos = reader.read_u64::<LittleEndian>()?;
        let data_size = reader.read_u32::<LittleEndian>()?;

        let rsv_0 = reader.read_u32::<LittleEndian>()?;
        let rsv_1 = reader.read_u32::<LittleEndian>()?;
        if (rsv_0, rsv_1) != (RSV_0, RSV_1) {
            return Err(FormatError::ReservedMismatch {
                observed: (rsv_0, rsv_1),
                expected: (RSV_0, RSV_1),
            });
        }

        let mut sha_256 = [0u8; HASH_FIELD_SIZE];
        reader.read_exact(&mut sha_256)?;

        Ok(Self {
            name,
            ptrs: ArchivePtrs { header_pos, header_size, data_pos, data_size },
            sha_256,
        })
    }

    /// Writes the header and returns the number of bytes written.
    /// The reserved pair is always written as `(0, 1)`.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<usize, FormatError> {
        let name_bytes = encode_utf16_fixed(&self.name, NAME_FIELD_SIZE)?;
        writer.write_all(&name_bytes)?;
        writer.write_u64::<LittleEndian>(self.ptrs.header_pos)?;
        writer.write_u32::<LittleEndian>(self.ptrs.header_size)?;
        writer.write_u64::<LittleEndian>(self.ptrs.data_pos)?;
        writer.write_u32::<LittleEndian>(self.ptrs.data_size)?;
        writer.write_u32::<LittleEndian>(RSV_0)?;
        writer.write_u32::<LittleEndian>(RSV_1)?;
        writer.write_all(&self.sha_256)?;
        Ok(META_BLOCK_SIZE)
    }
}

// ── Fixed-width UTF-16LE text ────────────────────────────────────────────────

fn decode_utf16_fixed(bytes: &[u8]) -> Result<String, FormatError> {
    let mut units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    while units.last() == Some(&0) {
        units.pop();
    }
    Ok(String::from_utf16(&units)?)
}

fn encode_utf16_fixed(text: &str, size: usize) -> Result<Vec<u8>, FormatError> {
    let mut bytes = Vec::with_capacity(size);
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    if bytes.len() > size {
        return Err(FormatError::NameTooLong { len: bytes.len(), max: size });
    }
    bytes.resize(size, 0);
    Ok(bytes)
}
