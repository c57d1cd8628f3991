//! Typed metadata bridge to the filesystem layer.
//!
//! The filesystem abstraction stores archive- and file-level metadata in a
//! flat key/value form.  These structs are that contract made explicit: the
//! serde field names are the wire keys and must not change.  Positions and
//! lengths are deliberately absent — they depend on final archive layout and
//! are supplied by the writing orchestrator, not recoverable from metadata.

use serde::{Deserialize, Serialize};

use crate::definitions::{EncryptionType, StorageType, VerificationType};
use crate::entry::FileDef;
use crate::error::FormatError;
use crate::meta::{ArchivePtrs, MetaBlock, HASH_FIELD_SIZE};
use crate::toc::TocFooter;

// ── Archive-level metadata ───────────────────────────────────────────────────

/// Archive-level metadata handed to the filesystem layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveMeta {
    /// Hex encoding of the 256-byte content hash field.
    pub sha_256:    String,
    pub unk_a:      u32,
    pub unk_b:      u32,
    pub block_size: u32,
}

impl ArchiveMeta {
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Extracts the storable parts of the decoded header and footer.
pub fn assemble_meta(meta: &MetaBlock, footer: &TocFooter) -> ArchiveMeta {
    ArchiveMeta {
        sha_256:    hex::encode(meta.sha_256),
        unk_a:      footer.unk_a,
        unk_b:      footer.unk_b,
        block_size: footer.block_size,
    }
}

/// Rebuilds the records the encoder needs from stored metadata.
///
/// The returned `MetaBlock` has an empty name and zeroed pointers; both are
/// supplied by the archive-writing orchestrator once the final layout is
/// known.
pub fn disassemble_meta(metadata: &ArchiveMeta) -> Result<(MetaBlock, TocFooter), FormatError> {
    let hash_bytes = hex::decode(&metadata.sha_256)?;
    let sha_256: [u8; HASH_FIELD_SIZE] = hash_bytes
        .try_into()
        .map_err(|v: Vec<u8>| FormatError::HashLength { got: v.len(), expected: HASH_FIELD_SIZE })?;

    let meta = MetaBlock {
        name: String::new(),
        ptrs: ArchivePtrs::default(),
        sha_256,
    };
    let footer = TocFooter {
        unk_a:      metadata.unk_a,
        unk_b:      metadata.unk_b,
        block_size: metadata.block_size,
    };
    Ok((meta, footer))
}

// ── File-level metadata ──────────────────────────────────────────────────────

/// Per-file metadata handed to the filesystem layer.  Raw integer tags on
/// the wire; validated back into the closed enums on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub storage_type:      u8,
    pub verification_type: u8,
    pub encryption_type:   u8,
    pub hash_pos:          u32,
    pub crc:               u32,
}

impl FileMeta {
    pub fn from_def(def: &FileDef) -> Self {
        Self {
            storage_type:      def.storage as u8,
            verification_type: def.verification as u8,
            encryption_type:   def.encryption as u8,
            hash_pos:          def.hash_pos,
            crc:               def.crc,
        }
    }

    /// Rebuilds a `FileDef` with positions and lengths zeroed; those come
    /// from the final archive layout.
    pub fn to_def(&self) -> Result<FileDef, FormatError> {
        Ok(FileDef {
            name_pos:          0,
            hash_pos:          self.hash_pos,
            data_pos:          0,
            length_in_archive: 0,
            length_on_disk:    0,
            verification:      VerificationType::try_from(self.verification_type)?,
            storage:           StorageType::try_from(self.storage_type)?,
            encryption:        EncryptionType::try_from(self.encryption_type)?,
            crc:               self.crc,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
