pub mod archive;
pub mod definitions;
pub mod entry;
pub mod error;
pub mod meta;
pub mod metadata;
pub mod registry;
pub mod toc;

pub use archive::{ArchiveRecords, V10Codec, VersionCodec};
pub use definitions::{EncryptionType, StorageType, VerificationType, Version, VERSION_V10};
pub use entry::{DriveDef, FileDef, FolderDef};
pub use error::FormatError;
pub use meta::{ArchivePtrs, MetaBlock};
pub use metadata::{assemble_meta, disassemble_meta, ArchiveMeta, FileMeta};
pub use registry::{codec_for, read_archive, write_archive};
pub use toc::{TocFooter, TocHeader};
