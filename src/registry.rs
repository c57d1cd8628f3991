//! Archive prelude and per-version dispatch.
//!
//! Every archive opens with an 8-byte magic and a (major, minor) version
//! pair; the version selects the structural codec for the rest of the file.
//! Dispatch is a static table resolved at compile time — there is no runtime
//! registration step, and an unknown version fails hard before any record
//! is decoded.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use crate::archive::{ArchiveRecords, ReadSeek, V10Codec, VersionCodec, WriteSeek};
use crate::definitions::{Version, VERSION_V10};
use crate::error::FormatError;

pub const MAGIC: [u8; 8] = *b"_ARCHIVE";
/// Magic plus version pair.
pub const PRELUDE_SIZE: usize = 12;

static V10: V10Codec = V10Codec;

/// Resolves a version tag to its structural codec.
///
/// The caller MUST NOT fall back to another version on failure; an archive
/// of unknown version cannot be decoded at all.
pub fn codec_for(version: Version) -> Result<&'static dyn VersionCodec, FormatError> {
    match version {
        VERSION_V10 => Ok(&V10),
        v => Err(FormatError::UnsupportedVersion(v)),
    }
}

/// Reads and validates the archive prelude, returning the version tag.
pub fn read_prelude<R: Read>(mut reader: R) -> Result<Version, FormatError> {
    let mut magic = [0u8; 8];
    reader.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(FormatError::BadMagic { observed: magic });
    }
    let major = reader.read_u16::<LittleEndian>()?;
    let minor = reader.read_u16::<LittleEndian>()?;
    Ok(Version::new(major, minor))
}

pub fn write_prelude<W: Write>(mut writer: W, version: Version) -> Result<usize, FormatError> {
    writer.write_all(&MAGIC)?;
    writer.write_u16::<LittleEndian>(version.major)?;
    writer.write_u16::<LittleEndian>(version.minor)?;
    Ok(PRELUDE_SIZE)
}

/// Decodes a whole archive from the current stream position: prelude,
/// version dispatch, then the selected codec's full record walk.
pub fn read_archive(reader: &mut dyn ReadSeek) -> Result<ArchiveRecords, FormatError> {
    let version = read_prelude(&mut *reader)?;
    let codec = codec_for(version)?;
    codec.read_records(reader)
}

/// Encodes a whole archive at the current stream position.  Returns the
/// number of bytes written.
pub fn write_archive(
    writer: &mut dyn WriteSeek,
    version: Version,
    records: &ArchiveRecords,
) -> Result<u64, FormatError> {
    let codec = codec_for(version)?;
    write_prelude(&mut *writer, version)?;
    let written = codec.write_records(writer, records)?;
    codec.finalize(writer, records)?;
    Ok(PRELUDE_SIZE as u64 + written)
}
