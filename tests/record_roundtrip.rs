use proptest::prelude::*;
use std::io::Cursor;

use sga10::entry::{DriveDef, FileDef, FolderDef, DRIVE_DEF_SIZE, FILE_DEF_SIZE};
use sga10::meta::{ArchivePtrs, MetaBlock, HASH_FIELD_SIZE, META_BLOCK_SIZE};
use sga10::metadata::{assemble_meta, disassemble_meta, ArchiveMeta, FileMeta};
use sga10::toc::{TocFooter, TOC_FOOTER_SIZE};
use sga10::{EncryptionType, FormatError, StorageType, VerificationType};

fn sample_file_def() -> FileDef {
    FileDef {
        name_pos:          0x10,
        hash_pos:          0x20,
        data_pos:          0x1000,
        length_in_archive: 100,
        length_on_disk:    50,
        verification:      VerificationType::Crc,
        storage:           StorageType::BufferCompress,
        encryption:        EncryptionType::Aes128,
        crc:               0xDEAD_BEEF,
    }
}

#[test]
fn file_def_decodes_known_buffer() {
    // name_pos=0x10, hash_pos=0x20, data_pos=0x1000, length_in_archive=100,
    // length_on_disk=50, verification=1, storage=2 + encryption=1 packed as
    // 0x12, crc=0xDEADBEEF
    let buffer: Vec<u8> = vec![
        0x10, 0x00, 0x00, 0x00,
        0x20, 0x00, 0x00, 0x00,
        0x00, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x64, 0x00, 0x00, 0x00,
        0x32, 0x00, 0x00, 0x00,
        0x01,
        0x12,
        0xEF, 0xBE, 0xAD, 0xDE,
    ];
    assert_eq!(buffer.len(), FILE_DEF_SIZE);

    let def = FileDef::read(Cursor::new(&buffer)).unwrap();
    assert_eq!(def, sample_file_def());

    let mut encoded = Vec::new();
    let written = def.write(&mut encoded).unwrap();
    assert_eq!(written, FILE_DEF_SIZE);
    assert_eq!(encoded, buffer);
}

#[test]
fn file_def_all_tag_combinations_roundtrip() {
    let storages = [
        StorageType::Store,
        StorageType::StreamCompress,
        StorageType::BufferCompress,
    ];
    let encryptions = [EncryptionType::None, EncryptionType::Aes128];
    for storage in storages {
        for encryption in encryptions {
            let mut def = sample_file_def();
            def.storage = storage;
            def.encryption = encryption;

            let mut encoded = Vec::new();
            def.write(&mut encoded).unwrap();
            let decoded = FileDef::read(Cursor::new(&encoded)).unwrap();
            assert_eq!(decoded.storage, storage);
            assert_eq!(decoded.encryption, encryption);
        }
    }
}

#[test]
fn file_def_rejects_out_of_domain_nibbles() {
    let mut encoded = Vec::new();
    sample_file_def().write(&mut encoded).unwrap();
    let flags_offset = FILE_DEF_SIZE - 5;

    // Storage nibble 7 does not exist.
    let mut bad = encoded.clone();
    bad[flags_offset] = 0x17;
    match FileDef::read(Cursor::new(&bad)) {
        Err(FormatError::UnknownStorageType(7)) => {}
        other => panic!("expected UnknownStorageType(7), got {other:?}"),
    }

    // Encryption nibble 3 does not exist (storage nibble kept valid).
    let mut bad = encoded.clone();
    bad[flags_offset] = 0x30;
    match FileDef::read(Cursor::new(&bad)) {
        Err(FormatError::UnknownEncryptionType(3)) => {}
        other => panic!("expected UnknownEncryptionType(3), got {other:?}"),
    }

    // Verification byte 9 does not exist.
    let mut bad = encoded;
    bad[flags_offset - 1] = 9;
    match FileDef::read(Cursor::new(&bad)) {
        Err(FormatError::UnknownVerificationType(9)) => {}
        other => panic!("expected UnknownVerificationType(9), got {other:?}"),
    }
}

fn sample_meta_block() -> MetaBlock {
    MetaBlock {
        name: "EngineArtHigh".to_owned(),
        ptrs: ArchivePtrs {
            header_pos:  0x0e59,
            header_size: 0x03b1,
            data_pos:    0x01ac,
            data_size:   0x0cad,
        },
        sha_256: [0x5a; HASH_FIELD_SIZE],
    }
}

#[test]
fn meta_block_roundtrips() {
    let meta = sample_meta_block();
    let mut encoded = Vec::new();
    let written = meta.write(&mut encoded).unwrap();
    assert_eq!(written, META_BLOCK_SIZE);
    assert_eq!(encoded.len(), META_BLOCK_SIZE);

    let decoded = MetaBlock::read(Cursor::new(&encoded)).unwrap();
    assert_eq!(decoded, meta);
}

#[test]
fn meta_block_enforces_reserved_pair() {
    let mut encoded = Vec::new();
    sample_meta_block().write(&mut encoded).unwrap();

    // rsv_0 lives right after the two (pos, size) pairs.
    let rsv_offset = 128 + 8 + 4 + 8 + 4;
    encoded[rsv_offset] = 2;
    match MetaBlock::read(Cursor::new(&encoded)) {
        Err(FormatError::ReservedMismatch { observed, expected }) => {
            assert_eq!(observed, (2, 1));
            assert_eq!(expected, (0, 1));
        }
        other => panic!("expected ReservedMismatch, got {other:?}"),
    }
}

#[test]
fn meta_block_rejects_invalid_utf16_name() {
    let mut encoded = Vec::new();
    sample_meta_block().write(&mut encoded).unwrap();

    // Unpaired high surrogate in the first name unit.
    encoded[0..2].copy_from_slice(&0xD800u16.to_le_bytes());
    encoded[2..4].copy_from_slice(&[0, 0]);
    match MetaBlock::read(Cursor::new(&encoded)) {
        Err(FormatError::InvalidName(_)) => {}
        other => panic!("expected InvalidName, got {other:?}"),
    }
}

#[test]
fn meta_block_rejects_overlong_name() {
    // 65 ASCII chars encode to 130 bytes of UTF-16LE, past the 128-byte field.
    let meta = MetaBlock { name: "x".repeat(65), ..sample_meta_block() };
    let mut encoded = Vec::new();
    match meta.write(&mut encoded) {
        Err(FormatError::NameTooLong { len: 130, max: 128 }) => {}
        other => panic!("expected NameTooLong, got {other:?}"),
    }
}

#[test]
fn default_block_has_dummy_hash_and_zeroed_ptrs() {
    let block = MetaBlock::default_block();
    assert_eq!(block.name, "Default Meta Block");
    assert_eq!(block.ptrs, ArchivePtrs::default());
    assert_eq!(block.sha_256.to_vec(), b"default hash.   ".repeat(16));
}

#[test]
fn toc_footer_roundtrips() {
    let footer = TocFooter { unk_a: 7, unk_b: 0xFFFF_FFFF, block_size: 4096 };
    let mut encoded = Vec::new();
    let written = footer.write(&mut encoded).unwrap();
    assert_eq!(written, TOC_FOOTER_SIZE);
    assert_eq!(TocFooter::read(Cursor::new(&encoded)).unwrap(), footer);
}

#[test]
fn archive_meta_roundtrips_hash_and_footer() {
    let meta = sample_meta_block();
    let footer = TocFooter { unk_a: 1, unk_b: 2, block_size: 3 };

    let assembled = assemble_meta(&meta, &footer);
    assert_eq!(assembled.sha_256, hex::encode([0x5a; HASH_FIELD_SIZE]));

    let (rebuilt_meta, rebuilt_footer) = disassemble_meta(&assembled).unwrap();
    assert_eq!(rebuilt_footer, footer);
    assert_eq!(rebuilt_meta.sha_256, meta.sha_256);
    // Name and pointers are not stored in metadata.
    assert_eq!(rebuilt_meta.name, "");
    assert_eq!(rebuilt_meta.ptrs, ArchivePtrs::default());
}

#[test]
fn archive_meta_rejects_bad_hash() {
    let short = ArchiveMeta {
        sha_256:    hex::encode([0u8; 16]),
        unk_a:      0,
        unk_b:      0,
        block_size: 0,
    };
    match disassemble_meta(&short) {
        Err(FormatError::HashLength { got: 16, expected }) => {
            assert_eq!(expected, HASH_FIELD_SIZE)
        }
        other => panic!("expected HashLength, got {other:?}"),
    }

    let not_hex = ArchiveMeta { sha_256: "zz".to_owned(), ..short };
    assert!(matches!(
        disassemble_meta(&not_hex),
        Err(FormatError::InvalidHashHex(_))
    ));
}

#[test]
fn file_meta_preserves_tags_and_zeroes_layout() {
    let def = sample_file_def();
    let meta = FileMeta::from_def(&def);
    assert_eq!(meta.storage_type, 2);
    assert_eq!(meta.encryption_type, 1);
    assert_eq!(meta.verification_type, 1);
    assert_eq!(meta.hash_pos, 0x20);
    assert_eq!(meta.crc, 0xDEAD_BEEF);

    let rebuilt = meta.to_def().unwrap();
    assert_eq!(rebuilt.storage, def.storage);
    assert_eq!(rebuilt.encryption, def.encryption);
    assert_eq!(rebuilt.verification, def.verification);
    assert_eq!(rebuilt.name_pos, 0);
    assert_eq!(rebuilt.data_pos, 0);
    assert_eq!(rebuilt.length_in_archive, 0);
    assert_eq!(rebuilt.length_on_disk, 0);
}

#[test]
fn metadata_uses_contract_keys() {
    let meta = assemble_meta(
        &sample_meta_block(),
        &TocFooter { unk_a: 1, unk_b: 2, block_size: 3 },
    );
    let value: serde_json::Value = serde_json::from_slice(&meta.to_bytes().unwrap()).unwrap();
    for key in ["sha_256", "unk_a", "unk_b", "block_size"] {
        assert!(value.get(key).is_some(), "missing key {key}");
    }

    let file_meta = FileMeta::from_def(&sample_file_def());
    let value: serde_json::Value =
        serde_json::from_slice(&file_meta.to_bytes().unwrap()).unwrap();
    for key in ["storage_type", "verification_type", "encryption_type", "hash_pos", "crc"] {
        assert!(value.get(key).is_some(), "missing key {key}");
    }
}

#[test]
fn drive_and_folder_defs_roundtrip() {
    let drive = DriveDef {
        alias: "data".to_owned(),
        name: "My Archive".to_owned(),
        first_folder: 0,
        last_folder: 10,
        first_file: 0,
        last_file: 7,
        root_folder: 0,
    };
    let mut encoded = Vec::new();
    assert_eq!(drive.write(&mut encoded).unwrap(), DRIVE_DEF_SIZE);
    assert_eq!(DriveDef::read(Cursor::new(&encoded)).unwrap(), drive);

    let folder = FolderDef {
        name_pos: 42,
        first_folder: 1,
        last_folder: 3,
        first_file: 2,
        last_file: 5,
    };
    let mut encoded = Vec::new();
    folder.write(&mut encoded).unwrap();
    assert_eq!(FolderDef::read(Cursor::new(&encoded)).unwrap(), folder);
}

#[test]
fn drive_def_rejects_invalid_utf8_text() {
    // Drive record whose alias field holds non-UTF-8 bytes.  The decode must
    // fail outright; a lossy conversion would re-encode to different bytes
    // and break byte-identical round-trips.
    let mut buffer = vec![0u8; DRIVE_DEF_SIZE];
    buffer[0] = b'd';
    buffer[1] = 0xff;
    match DriveDef::read(Cursor::new(&buffer)) {
        Err(FormatError::InvalidText(_)) => {}
        other => panic!("expected InvalidText, got {other:?}"),
    }
}

#[test]
fn drive_def_rejects_overlong_text() {
    let drive = DriveDef { alias: "x".repeat(65), ..DriveDef::default() };
    let mut encoded = Vec::new();
    match drive.write(&mut encoded) {
        Err(FormatError::NameTooLong { len: 65, max: 64 }) => {}
        other => panic!("expected NameTooLong, got {other:?}"),
    }
}

// ── Property tests ───────────────────────────────────────────────────────────

fn storage_strategy() -> impl Strategy<Value = StorageType> {
    (0u8..=2).prop_map(|v| StorageType::try_from(v).unwrap())
}

fn encryption_strategy() -> impl Strategy<Value = EncryptionType> {
    (0u8..=1).prop_map(|v| EncryptionType::try_from(v).unwrap())
}

fn verification_strategy() -> impl Strategy<Value = VerificationType> {
    (0u8..=4).prop_map(|v| VerificationType::try_from(v).unwrap())
}

proptest! {
    #[test]
    fn prop_file_def_roundtrips(
        name_pos in any::<u32>(),
        hash_pos in any::<u32>(),
        data_pos in any::<u64>(),
        length_in_archive in any::<u32>(),
        length_on_disk in any::<u32>(),
        verification in verification_strategy(),
        storage in storage_strategy(),
        encryption in encryption_strategy(),
        crc in any::<u32>(),
    ) {
        let def = FileDef {
            name_pos, hash_pos, data_pos, length_in_archive, length_on_disk,
            verification, storage, encryption, crc,
        };
        let mut encoded = Vec::new();
        def.write(&mut encoded).unwrap();
        prop_assert_eq!(encoded.len(), FILE_DEF_SIZE);
        prop_assert_eq!(FileDef::read(Cursor::new(&encoded)).unwrap(), def);
    }

    #[test]
    fn prop_toc_footer_roundtrips(unk_a in any::<u32>(), unk_b in any::<u32>(), block_size in any::<u32>()) {
        let footer = TocFooter { unk_a, unk_b, block_size };
        let mut encoded = Vec::new();
        footer.write(&mut encoded).unwrap();
        prop_assert_eq!(TocFooter::read(Cursor::new(&encoded)).unwrap(), footer);
    }

    #[test]
    fn prop_meta_block_roundtrips(
        name in "[a-zA-Z0-9 _.-]{0,60}",
        header_pos in any::<u64>(),
        header_size in any::<u32>(),
        data_pos in any::<u64>(),
        data_size in any::<u32>(),
        hash in proptest::collection::vec(any::<u8>(), HASH_FIELD_SIZE),
    ) {
        let meta = MetaBlock {
            name,
            ptrs: ArchivePtrs { header_pos, header_size, data_pos, data_size },
            sha_256: hash.try_into().unwrap(),
        };
        let mut encoded = Vec::new();
        meta.write(&mut encoded).unwrap();
        prop_assert_eq!(encoded.len(), META_BLOCK_SIZE);
        prop_assert_eq!(MetaBlock::read(Cursor::new(&encoded)).unwrap(), meta);
    }
}
