//! Closed tag domains used by the v10 layouts.
//!
//! Every on-disk tag is a closed enumeration with a frozen integer
//! discriminant.  Conversion from a raw byte is always fallible: a value
//! outside the domain is a [`FormatError`] immediately, never a fallback
//! variant.  The discriminants are wire values and must not be renumbered.

use std::fmt;

use crate::error::FormatError;

// ── Version tag ──────────────────────────────────────────────────────────────

/// Archive format version as stored in the file prelude, (major, minor),
/// each a little-endian u16 on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
}

impl Version {
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// The version this crate implements.
pub const VERSION_V10: Version = Version::new(10, 0);

// ── Storage type ─────────────────────────────────────────────────────────────

/// How a file's payload is stored in the data block.
///
/// The codec only records the tag; compressing or decompressing the payload
/// belongs to the extraction layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StorageType {
    Store          = 0,
    StreamCompress = 1,
    BufferCompress = 2,
}

impl TryFrom<u8> for StorageType {
    type Error = FormatError;

    fn try_from(value: u8) -> Result<Self, FormatError> {
        match value {
            0 => Ok(StorageType::Store),
            1 => Ok(StorageType::StreamCompress),
            2 => Ok(StorageType::BufferCompress),
            v => Err(FormatError::UnknownStorageType(v)),
        }
    }
}

// ── Encryption type ──────────────────────────────────────────────────────────

/// Whether a file's payload is encrypted.  Decrypting is not this layer's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EncryptionType {
    None   = 0,
    Aes128 = 1,
}

impl TryFrom<u8> for EncryptionType {
    type Error = FormatError;

    fn try_from(value: u8) -> Result<Self, FormatError> {
        match value {
            0 => Ok(EncryptionType::None),
            1 => Ok(EncryptionType::Aes128),
            v => Err(FormatError::UnknownEncryptionType(v)),
        }
    }
}

// ── Verification type ────────────────────────────────────────────────────────

/// Checksum scheme applied to a file's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum VerificationType {
    None       = 0,
    Crc        = 1,
    CrcBlocks  = 2,
    Md5Blocks  = 3,
    Sha1Blocks = 4,
}

impl TryFrom<u8> for VerificationType {
    type Error = FormatError;

    fn try_from(value: u8) -> Result<Self, FormatError> {
        match value {
            0 => Ok(VerificationType::None),
            1 => Ok(VerificationType::Crc),
            2 => Ok(VerificationType::CrcBlocks),
            3 => Ok(VerificationType::Md5Blocks),
            4 => Ok(VerificationType::Sha1Blocks),
            v => Err(FormatError::UnknownVerificationType(v)),
        }
    }
}
