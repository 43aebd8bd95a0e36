//! Unpack validation against handcrafted archive bytes

use msftool::{unpack, MsfError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Archive bytes for one entry named `a.mp3` holding `AA BB CC`
const ONE_ENTRY_ARCHIVE: &[u8] = &[
    0x00, 0x00, 0x03, 0xE7, // signature
    0x00, 0x00, 0x00, 0x02, // version
    0x00, 0x00, 0x00, 0x01, // entry count
    0x00, 0x00, 0x00, 0x1A, // offset 26
    0x00, 0x00, 0x00, 0x03, // size 3
    0x05, // name length
    0x61, 0x2E, 0x6D, 0x70, 0x33, // "a.mp3"
    0xAA, 0xBB, 0xCC, // payload
];

fn write_archive(dir: &Path, bytes: &[u8]) -> PathBuf {
    let path = dir.join("test.msf");
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_unpack_known_archive() {
    let dir = tempdir().unwrap();
    let archive = write_archive(dir.path(), ONE_ENTRY_ARCHIVE);

    let out = dir.path().join("out");
    unpack(&archive, &out).unwrap();

    assert_eq!(fs::read(out.join("a.mp3")).unwrap(), [0xAA, 0xBB, 0xCC]);
}

#[test]
fn test_bad_signature() {
    let dir = tempdir().unwrap();
    let mut bytes = ONE_ENTRY_ARCHIVE.to_vec();
    bytes[3] = 0xE8;
    let archive = write_archive(dir.path(), &bytes);

    let result = unpack(&archive, &dir.path().join("out"));
    match result {
        Err(MsfError::InvalidFormat(sig)) => assert_eq!(sig, [0x00, 0x00, 0x03, 0xE8]),
        other => panic!("expected InvalidFormat, got {:?}", other),
    }
}

#[test]
fn test_bad_version() {
    let dir = tempdir().unwrap();
    let mut bytes = ONE_ENTRY_ARCHIVE.to_vec();
    bytes[7] = 0x07;
    let archive = write_archive(dir.path(), &bytes);

    let result = unpack(&archive, &dir.path().join("out"));
    match result {
        Err(MsfError::UnsupportedVersion(v)) => assert_eq!(v, 7),
        other => panic!("expected UnsupportedVersion, got {:?}", other),
    }
}

#[test]
fn test_truncated_header() {
    let dir = tempdir().unwrap();
    let archive = write_archive(dir.path(), &ONE_ENTRY_ARCHIVE[..10]);

    let result = unpack(&archive, &dir.path().join("out"));
    assert!(matches!(result, Err(MsfError::TruncatedArchive(_))));
}

#[test]
fn test_truncated_table() {
    let dir = tempdir().unwrap();
    // Ends in the middle of the entry name
    let archive = write_archive(dir.path(), &ONE_ENTRY_ARCHIVE[..23]);

    let result = unpack(&archive, &dir.path().join("out"));
    assert!(matches!(result, Err(MsfError::TruncatedArchive(_))));
}

#[test]
fn test_truncated_payload() {
    let dir = tempdir().unwrap();
    // Table is intact but only two of three payload bytes are present
    let archive = write_archive(dir.path(), &ONE_ENTRY_ARCHIVE[..ONE_ENTRY_ARCHIVE.len() - 1]);

    let result = unpack(&archive, &dir.path().join("out"));
    assert!(matches!(result, Err(MsfError::TruncatedArchive(_))));
}

#[test]
fn test_size_past_end_of_file() {
    let dir = tempdir().unwrap();
    let mut bytes = ONE_ENTRY_ARCHIVE.to_vec();
    bytes[19] = 0xFF; // declared size far beyond the file
    let archive = write_archive(dir.path(), &bytes);

    let result = unpack(&archive, &dir.path().join("out"));
    assert!(matches!(result, Err(MsfError::TruncatedArchive(_))));
}

#[test]
fn test_missing_source_file() {
    let dir = tempdir().unwrap();
    let result = unpack(&dir.path().join("nope.msf"), &dir.path().join("out"));
    assert!(matches!(result, Err(MsfError::SourceNotFound(_))));
}

#[test]
fn test_source_is_a_directory() {
    let dir = tempdir().unwrap();
    let result = unpack(dir.path(), &dir.path().join("out"));
    assert!(matches!(result, Err(MsfError::SourceNotFound(_))));
}

#[test]
fn test_destination_is_a_file() {
    let dir = tempdir().unwrap();
    let archive = write_archive(dir.path(), ONE_ENTRY_ARCHIVE);

    let dest = dir.path().join("out");
    fs::write(&dest, b"occupied").unwrap();

    let result = unpack(&archive, &dest);
    assert!(matches!(result, Err(MsfError::DestinationNotDirectory(_))));
}
