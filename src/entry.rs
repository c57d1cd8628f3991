//! File, folder, and drive entry records.
//!
//! # FileDef layout (little-endian, 30 bytes)
//! ```text
//! name_pos(4) hash_pos(4) data_pos(8) length_in_archive(4) length_on_disk(4)
//! verification(1) storage+encryption(1) crc(4)
//! ```
//! Storage and encryption share one byte: storage in the low nibble,
//! encryption in the high nibble.  A nibble outside its enum's domain fails
//! the decode; values are never wrapped or defaulted.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use crate::definitions::{EncryptionType, StorageType, VerificationType};
use crate::error::FormatError;

pub const FILE_DEF_SIZE: usize = 30;
pub const FOLDER_DEF_SIZE: usize = 20;
pub const DRIVE_DEF_SIZE: usize = 148;

const STORAGE_MASK: u8 = 0x0F;
const ENCRYPTION_MASK: u8 = 0xF0;
const ENCRYPTION_SHIFT: u8 = 4;

/// Byte width of the drive alias and name fields.
const DRIVE_TEXT_SIZE: usize = 64;

// ── FileDef ──────────────────────────────────────────────────────────────────

/// One file's storage metadata.  `name_pos` indexes the name buffer,
/// `data_pos` is relative to the data block, `hash_pos` locates the
/// auxiliary hash for this entry.  Offset/length consistency is the
/// extraction layer's concern, not validated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileDef {
    pub name_pos:          u32,
    pub hash_pos:          u32,
    pub data_pos:          u64,
    pub length_in_archive: u32,
    pub length_on_disk:    u32,
    pub verification:      VerificationType,
    pub storage:           StorageType,
    pub encryption:        EncryptionType,
    pub crc:               u32,
}

impl FileDef {
    pub fn read<R: Read>(mut reader: R) -> Result<Self, FormatError> {
        let name_pos = reader.read_u32::<LittleEndian>()?;
        let hash_pos = reader.read_u32::<LittleEndian>()?;
        let data_pos = reader.read_u64::<LittleEndian>()?;
        let length_in_archive = reader.read_u32::<LittleEndian>()?;
        let length_on_disk = reader.read_u32::<LittleEndian>()?;
        let verification_val = reader.read_u8()?;
        let flags = reader.read_u8()?;
        let crc = reader.read_u32::<LittleEndian>()?;

        let storage = StorageType::try_from(flags & STORAGE_MASK)?;
        let encryption = EncryptionType::try_from((flags & ENCRYPTION_MASK) >> ENCRYPTION_SHIFT)?;
        let verification = VerificationType::try_from(verification_val)?;

        Ok(Self {
            name_pos,
            hash_pos,
            data_pos,
            length_in_archive,
            length_on_disk,
            verification,
            storage,
            encryption,
            crc,
        })
    }

    pub fn write<W: Write>(&self, mut writer: W) -> Result<usize, FormatError> {
        let flags = ((self.encryption as u8) << ENCRYPTION_SHIFT) | self.storage as u8;
        writer.write_u32::<LittleEndian>(self.name_pos)?;
        writer.write_u32::<LittleEndian>(self.hash_pos)?;
        writer.write_u64::<LittleEndian>(self.data_pos)?;
        writer.write_u32::<LittleEndian>(self.length_in_archive)?;
        writer.write_u32::<LittleEndian>(self.length_on_disk)?;
        writer.write_u8(self.verification as u8)?;
        writer.write_u8(flags)?;
        writer.write_u32::<LittleEndian>(self.crc)?;
        Ok(FILE_DEF_SIZE)
    }
}

// ── FolderDef ────────────────────────────────────────────────────────────────

/// Directory-structure record: a name and the half-open index ranges of the
/// sub-folders and files it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FolderDef {
    pub name_pos:     u32,
    pub first_folder: u32,
    pub last_folder:  u32,
    pub first_file:   u32,
    pub last_file:    u32,
}

impl FolderDef {
    pub fn read<R: Read>(mut reader: R) -> Result<Self, FormatError> {
        Ok(Self {
            name_pos:     reader.read_u32::<LittleEndian>()?,
            first_folder: reader.read_u32::<LittleEndian>()?,
            last_folder:  reader.read_u32::<LittleEndian>()?,
            first_file:   reader.read_u32::<LittleEndian>()?,
            last_file:    reader.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, mut writer: W) -> Result<usize, FormatError> {
        writer.write_u32::<LittleEndian>(self.name_pos)?;
        writer.write_u32::<LittleEndian>(self.first_folder)?;
        writer.write_u32::<LittleEndian>(self.last_folder)?;
        writer.write_u32::<LittleEndian>(self.first_file)?;
        writer.write_u32::<LittleEndian>(self.last_file)?;
        Ok(FOLDER_DEF_SIZE)
    }
}

// ── DriveDef ─────────────────────────────────────────────────────────────────

/// Top-level mount record.  The alias and display name are fixed 64-byte
/// null-padded text fields on disk.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DriveDef {
    pub alias:        String,
    pub name:         String,
    pub first_folder: u32,
    pub last_folder:  u32,
    pub first_file:   u32,
    pub last_file:    u32,
    pub root_folder:  u32,
}

impl DriveDef {
    pub fn read<R: Read>(mut reader: R) -> Result<Self, FormatError> {
        let alias = read_text_fixed(&mut reader)?;
        let name = read_text_fixed(&mut reader)?;
        Ok(Self {
            alias,
            name,
            first_folder: reader.read_u32::<LittleEndian>()?,
            last_folder:  reader.read_u32::<LittleEndian>()?,
            first_file:   reader.read_u32::<LittleEndian>()?,
            last_file:    reader.read_u32::<LittleEndian>()?,
            root_folder:  reader.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, mut writer: W) -> Result<usize, FormatError> {
        write_text_fixed(&mut writer, &self.alias)?;
        write_text_fixed(&mut writer, &self.name)?;
        writer.write_u32::<LittleEndian>(self.first_folder)?;
        writer.write_u32::<LittleEndian>(self.last_folder)?;
        writer.write_u32::<LittleEndian>(self.first_file)?;
        writer.write_u32::<LittleEndian>(self.last_file)?;
        writer.write_u32::<LittleEndian>(self.root_folder)?;
        Ok(DRIVE_DEF_SIZE)
    }
}

fn read_text_fixed<R: Read>(reader: &mut R) -> Result<String, FormatError> {
    let mut bytes = [0u8; DRIVE_TEXT_SIZE];
    reader.read_exact(&mut bytes)?;
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    Ok(String::from_utf8(bytes[..end].to_vec())?)
}

fn write_text_fixed<W: Write>(writer: &mut W, text: &str) -> Result<(), FormatError> {
    if text.len() > DRIVE_TEXT_SIZE {
        return Err(FormatError::NameTooLong { len: text.len(), max: DRIVE_TEXT_SIZE });
    }
    let mut bytes = [0u8; DRIVE_TEXT_SIZE];
    bytes[..text.len()].copy_from_slice(text.as_bytes());
    writer.write_all(&bytes)?;
    Ok(())
}
