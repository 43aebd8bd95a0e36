pub mod format;
mod reader;
mod writer;

pub use format::{
    header_size, ArchiveHeader, EntryRecord, ENTRY_FIXED_SIZE, FORMAT_VERSION, HEADER_BASE_SIZE,
    MAX_NAME_LENGTH, PAYLOAD_EXTENSION, SIGNATURE,
};
pub use reader::unpack;
pub use writer::pack;
