//! Table-of-contents header and footer records.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use crate::error::FormatError;

pub const TOC_HEADER_SIZE: usize = 32;
pub const TOC_FOOTER_SIZE: usize = 12;

/// One (position, count) pair in the TOC header.  Positions are byte offsets
/// relative to the start of the TOC block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TablePtr {
    pub pos:   u32,
    pub count: u32,
}

/// TOC block header: where each table lives within the block.
///
/// The name table pointer is size-based for this version: `names.count`
/// holds the byte length of the name buffer, not an entry count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TocHeader {
    pub drives:  TablePtr,
    pub folders: TablePtr,
    pub files:   TablePtr,
    pub names:   TablePtr,
}

impl TocHeader {
    pub fn read<R: Read>(mut reader: R) -> Result<Self, FormatError> {
        let mut read_ptr = || -> Result<TablePtr, FormatError> {
            Ok(TablePtr {
                pos:   reader.read_u32::<LittleEndian>()?,
                count: reader.read_u32::<LittleEndian>()?,
            })
        };
        Ok(Self {
            drives:  read_ptr()?,
            folders: read_ptr()?,
            files:   read_ptr()?,
            names:   read_ptr()?,
        })
    }

    pub fn write<W: Write>(&self, mut writer: W) -> Result<usize, FormatError> {
        for ptr in [self.drives, self.folders, self.files, self.names] {
            writer.write_u32::<LittleEndian>(ptr.pos)?;
            writer.write_u32::<LittleEndian>(ptr.count)?;
        }
        Ok(TOC_HEADER_SIZE)
    }
}

/// Trailing TOC record.  `unk_a` and `unk_b` have unconfirmed semantics and
/// are preserved verbatim; nothing here is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocFooter {
    pub unk_a:      u32,
    pub unk_b:      u32,
    pub block_size: u32,
}

impl TocFooter {
    pub fn read<R: Read>(mut reader: R) -> Result<Self, FormatError> {
        Ok(Self {
            unk_a:      reader.read_u32::<LittleEndian>()?,
            unk_b:      reader.read_u32::<LittleEndian>()?,
            block_size: reader.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, mut writer: W) -> Result<usize, FormatError> {
        writer.write_u32::<LittleEndian>(self.unk_a)?;
        writer.write_u32::<LittleEndian>(self.unk_b)?;
        writer.write_u32::<LittleEndian>(self.block_size)?;
        Ok(TOC_FOOTER_SIZE)
    }
}
