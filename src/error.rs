use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::archive::format::{FORMAT_VERSION, SIGNATURE};

/// Result type for msftool operations
pub type Result<T> = std::result::Result<T, MsfError>;

/// Unified error type for pack and unpack operations
#[derive(Debug, Error)]
pub enum MsfError {
    // Pack precondition errors
    #[error("source '{0}' does not exist")]
    SourceNotFound(PathBuf),

    #[error("'{0}' is not a directory")]
    NotADirectory(PathBuf),

    #[error("destination '{0}' already exists")]
    DestinationExists(PathBuf),

    #[error("destination '{0}' exists but is not a directory")]
    DestinationNotDirectory(PathBuf),

    #[error("no .mp3 files found in '{0}'")]
    NoPayloadFilesFound(PathBuf),

    #[error("file name '{0}' is not ASCII-safe")]
    UnsafeFileName(String),

    // Archive validation errors
    #[error("invalid MSF signature: expected {SIGNATURE:02x?}, got {0:02x?}")]
    InvalidFormat([u8; 4]),

    #[error("unsupported MSF version: expected {FORMAT_VERSION}, got {0}")]
    UnsupportedVersion(u32),

    #[error("archive truncated while reading {0}")]
    TruncatedArchive(&'static str),

    #[error("entry name '{0}' escapes the output directory")]
    PathTraversal(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
