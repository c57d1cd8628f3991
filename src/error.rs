use std::io;
use std::string::{FromUtf16Error, FromUtf8Error};
use thiserror::Error;

use crate::definitions::Version;

/// Every way a v10 archive can fail to decode or encode.
///
/// All variants are fatal for the archive being processed: the codec never
/// retries and never produces a partially-decoded record set.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Invalid archive magic: {observed:02x?}")]
    BadMagic { observed: [u8; 8] },
    #[error("Unsupported archive version {0}")]
    UnsupportedVersion(Version),
    /// Reserved header fields did not match the fixed constants.  Either the
    /// archive is not a valid v10 archive or the stream cursor is misaligned.
    #[error("Reserved flags mismatch: observed {observed:?}, expected {expected:?}")]
    ReservedMismatch {
        observed: (u32, u32),
        expected: (u32, u32),
    },
    #[error("Unknown storage type {0:#04x}")]
    UnknownStorageType(u8),
    #[error("Unknown encryption type {0:#04x}")]
    UnknownEncryptionType(u8),
    #[error("Unknown verification type {0:#04x}")]
    UnknownVerificationType(u8),
    #[error("Archive name is not valid UTF-16")]
    InvalidName(#[from] FromUtf16Error),
    #[error("Drive text field is not valid UTF-8")]
    InvalidText(#[from] FromUtf8Error),
    #[error("Text field is {len} bytes encoded, limit is {max}")]
    NameTooLong { len: usize, max: usize },
    #[error("Content hash is not valid hex: {0}")]
    InvalidHashHex(#[from] hex::FromHexError),
    #[error("Content hash must be {expected} bytes, got {got}")]
    HashLength { got: usize, expected: usize },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
