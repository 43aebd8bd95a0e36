//! msftool: pack and unpack MSF sound archives
//!
//! The MSF container is a flat archive: a 12-byte header (signature,
//! version, entry count), a table of (offset, size, name) records, and
//! the raw payload bytes of every file concatenated after the table.
//! All integers are big-endian; entry names are forward-slash relative
//! ASCII paths.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! // Pack every .mp3 under sounds/ into one archive
//! msftool::pack(Path::new("sounds"), Path::new("MaxPayneSoundsv2.msf"))?;
//!
//! // Unpack it back into a directory tree
//! msftool::unpack(Path::new("MaxPayneSoundsv2.msf"), Path::new("out"))?;
//! # Ok::<(), msftool::MsfError>(())
//! ```

pub mod archive;
pub mod error;

pub use archive::{
    header_size, pack, unpack, ArchiveHeader, EntryRecord, ENTRY_FIXED_SIZE, FORMAT_VERSION,
    HEADER_BASE_SIZE, MAX_NAME_LENGTH, PAYLOAD_EXTENSION, SIGNATURE,
};
pub use error::{MsfError, Result};
