//! The per-version codec seam and the v10 facade behind it.
//!
//! A [`VersionCodec`] turns one seekable stream into the full set of records
//! the filesystem layer needs, and back.  It never touches payload bytes:
//! the data block is located by the pointers in the meta header and is read,
//! decompressed, and decrypted elsewhere.
//!
//! # Writing
//! `write_records` writes the meta header region up front, lays the TOC
//! block out contiguously behind it, then seeks back and patches the header
//! with the final positions and sizes.  v10 has no further finalize step:
//! the content hash is carried verbatim, never recomputed.

use std::io::{Read, Seek, SeekFrom, Write};

use crate::definitions::{Version, VERSION_V10};
use crate::entry::{DriveDef, FileDef, FolderDef, DRIVE_DEF_SIZE, FILE_DEF_SIZE, FOLDER_DEF_SIZE};
use crate::error::FormatError;
use crate::meta::MetaBlock;
use crate::toc::{TablePtr, TocFooter, TocHeader, TOC_FOOTER_SIZE, TOC_HEADER_SIZE};

pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek + ?Sized> ReadSeek for T {}

pub trait WriteSeek: Write + Seek {}
impl<T: Write + Seek + ?Sized> WriteSeek for T {}

// ── ArchiveRecords ───────────────────────────────────────────────────────────

/// Everything structural about one archive, fully decoded.
///
/// `names` is the raw name buffer; file and folder `name_pos` fields index
/// into it.  `toc` holds the offsets as decoded; the encoder recomputes them
/// from the tables, so after a decode they are informational.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveRecords {
    pub meta:    MetaBlock,
    pub toc:     TocHeader,
    pub footer:  TocFooter,
    pub drives:  Vec<DriveDef>,
    pub folders: Vec<FolderDef>,
    pub files:   Vec<FileDef>,
    pub names:   Vec<u8>,
}

// ── VersionCodec ─────────────────────────────────────────────────────────────

/// One archive version's structural codec.  Stateless; a single instance
/// may serve any number of streams, one operation per stream at a time.
pub trait VersionCodec: Sync {
    fn version(&self) -> Version;

    /// Decodes the meta header at the current stream position, then follows
    /// its pointers to decode the whole TOC block.
    fn read_records(&self, reader: &mut dyn ReadSeek) -> Result<ArchiveRecords, FormatError>;

    /// Encodes the meta header and TOC block starting at the current stream
    /// position.  Returns the number of bytes written.  Data-block pointers
    /// are taken from `records.meta` unchanged.
    fn write_records(
        &self,
        writer: &mut dyn WriteSeek,
        records: &ArchiveRecords,
    ) -> Result<u64, FormatError>;

    /// Placeholder meta header for a fresh archive, written before final
    /// offsets and the content hash are known.
    fn empty_meta(&self) -> MetaBlock;

    /// Post-write hook.  v10 does nothing here: the content hash is carried
    /// verbatim and never recomputed.
    fn finalize(
        &self,
        _writer: &mut dyn WriteSeek,
        _records: &ArchiveRecords,
    ) -> Result<(), FormatError> {
        Ok(())
    }
}

// ── V10 facade ───────────────────────────────────────────────────────────────

pub struct V10Codec;

impl VersionCodec for V10Codec {
    fn version(&self) -> Version {
        VERSION_V10
    }

    fn empty_meta(&self) -> MetaBlock {
        MetaBlock::default_block()
    }

    fn read_records(&self, reader: &mut dyn ReadSeek) -> Result<ArchiveRecords, FormatError> {
        let meta = MetaBlock::read(&mut *reader)?;

        let toc_start = meta.ptrs.header_pos;
        reader.seek(SeekFrom::Start(toc_start))?;
        let toc = TocHeader::read(&mut *reader)?;
        let footer = TocFooter::read(&mut *reader)?;

        reader.seek(SeekFrom::Start(toc_start + u64::from(toc.drives.pos)))?;
        let mut drives = Vec::with_capacity(toc.drives.count as usize);
        for _ in 0..toc.drives.count {
            drives.push(DriveDef::read(&mut *reader)?);
        }

        reader.seek(SeekFrom::Start(toc_start + u64::from(toc.folders.pos)))?;
        let mut folders = Vec::with_capacity(toc.folders.count as usize);
        for _ in 0..toc.folders.count {
            folders.push(FolderDef::read(&mut *reader)?);
        }

        reader.seek(SeekFrom::Start(toc_start + u64::from(toc.files.pos)))?;
        let mut files = Vec::with_capacity(toc.files.count as usize);
        for _ in 0..toc.files.count {
            files.push(FileDef::read(&mut *reader)?);
        }

        // Size-based for this version: names.count is the buffer length.
        reader.seek(SeekFrom::Start(toc_start + u64::from(toc.names.pos)))?;
        let mut names = vec![0u8; toc.names.count as usize];
        reader.read_exact(&mut names)?;

        Ok(ArchiveRecords { meta, toc, footer, drives, folders, files, names })
    }

    fn write_records(
        &self,
        writer: &mut dyn WriteSeek,
        records: &ArchiveRecords,
    ) -> Result<u64, FormatError> {
        let meta_pos = writer.stream_position()?;
        records.meta.write(&mut *writer)?;
        let toc_start = writer.stream_position()?;

        let toc = layout_toc(records);
        toc.write(&mut *writer)?;
        records.footer.write(&mut *writer)?;
        for drive in &records.drives {
            drive.write(&mut *writer)?;
        }
        for folder in &records.folders {
            folder.write(&mut *writer)?;
        }
        for file in &records.files {
            file.write(&mut *writer)?;
        }
        writer.write_all(&records.names)?;
        let end = writer.stream_position()?;

        // Patch the meta header now that the TOC block extent is known.
        let mut meta = records.meta.clone();
        meta.ptrs.header_pos = toc_start;
        meta.ptrs.header_size = (end - toc_start) as u32;
        writer.seek(SeekFrom::Start(meta_pos))?;
        meta.write(&mut *writer)?;
        writer.seek(SeekFrom::Start(end))?;

        Ok(end - meta_pos)
    }
}

/// Contiguous table layout the encoder emits:
/// header, footer, drives, folders, files, names.
fn layout_toc(records: &ArchiveRecords) -> TocHeader {
    let drive_pos = (TOC_HEADER_SIZE + TOC_FOOTER_SIZE) as u32;
    let folder_pos = drive_pos + (records.drives.len() * DRIVE_DEF_SIZE) as u32;
    let file_pos = folder_pos + (records.folders.len() * FOLDER_DEF_SIZE) as u32;
    let name_pos = file_pos + (records.files.len() * FILE_DEF_SIZE) as u32;
    TocHeader {
        drives:  TablePtr { pos: drive_pos, count: records.drives.len() as u32 },
        folders: TablePtr { pos: folder_pos, count: records.folders.len() as u32 },
        files:   TablePtr { pos: file_pos, count: records.files.len() as u32 },
        names:   TablePtr { pos: name_pos, count: records.names.len() as u32 },
    }
}
