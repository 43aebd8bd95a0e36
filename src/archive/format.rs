use crate::error::{MsfError, Result};
use std::io::{self, Read, Write};

/// Signature bytes at the start of every MSF archive
pub const SIGNATURE: [u8; 4] = [0x00, 0x00, 0x03, 0xE7];

/// The single supported format version
pub const FORMAT_VERSION: u32 = 2;

/// Fixed part of the header: signature + version + entry count
pub const HEADER_BASE_SIZE: u32 = 12;

/// Fixed bytes per table entry before the name: offset(4) + size(4) + name_len(1)
pub const ENTRY_FIXED_SIZE: u32 = 9;

/// Extension of payload files eligible for packing (matched case-insensitively)
pub const PAYLOAD_EXTENSION: &str = "mp3";

/// Maximum entry name length, limited by the 1-byte name length field
pub const MAX_NAME_LENGTH: usize = u8::MAX as usize;

/// Archive header: signature, version, entry count. All fields big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveHeader {
    pub entry_count: u32,
}

impl ArchiveHeader {
    pub fn new(entry_count: u32) -> Self {
        Self { entry_count }
    }

    /// Write signature, version and entry count
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&SIGNATURE)?;
        writer.write_all(&FORMAT_VERSION.to_be_bytes())?;
        writer.write_all(&self.entry_count.to_be_bytes())?;
        Ok(())
    }

    /// Read and validate the header, failing on signature or version mismatch
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut signature = [0u8; 4];
        read_exact(&mut reader, &mut signature, "signature")?;
        if signature != SIGNATURE {
            return Err(MsfError::InvalidFormat(signature));
        }

        let version = read_u32(&mut reader, "version")?;
        if version != FORMAT_VERSION {
            return Err(MsfError::UnsupportedVersion(version));
        }

        let entry_count = read_u32(&mut reader, "entry count")?;
        Ok(Self { entry_count })
    }
}

/// One table entry: absolute payload offset, payload size, relative name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    pub offset: u32,
    pub size: u32,
    pub name: String,
}

impl EntryRecord {
    /// Bytes this entry occupies in the table
    pub fn table_len(&self) -> u32 {
        ENTRY_FIXED_SIZE + self.name.len() as u32
    }

    /// Write offset, size, name length and name bytes
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        if self.name.len() > MAX_NAME_LENGTH {
            return Err(MsfError::UnsafeFileName(self.name.clone()));
        }
        writer.write_all(&self.offset.to_be_bytes())?;
        writer.write_all(&self.size.to_be_bytes())?;
        writer.write_all(&[self.name.len() as u8])?;
        writer.write_all(self.name.as_bytes())?;
        Ok(())
    }

    /// Read one table entry. The name must be ASCII.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let offset = read_u32(&mut reader, "entry offset")?;
        let size = read_u32(&mut reader, "entry size")?;
        let name_len = read_u8(&mut reader, "entry name length")?;

        let mut name_bytes = vec![0u8; name_len as usize];
        read_exact(&mut reader, &mut name_bytes, "entry name")?;
        if !name_bytes.is_ascii() {
            return Err(MsfError::UnsafeFileName(
                String::from_utf8_lossy(&name_bytes).into_owned(),
            ));
        }
        // ASCII is valid UTF-8
        let name = String::from_utf8(name_bytes)
            .map_err(|e| MsfError::UnsafeFileName(e.to_string()))?;

        Ok(Self { offset, size, name })
    }
}

/// Byte length of signature + version + count + entire entry table, which is
/// also the offset at which payload data begins.
pub fn header_size(names: &[String]) -> u32 {
    HEADER_BASE_SIZE
        + names
            .iter()
            .map(|n| n.len() as u32 + ENTRY_FIXED_SIZE)
            .sum::<u32>()
}

// Read helpers. A short read means the archive ends mid-field, so
// UnexpectedEof becomes TruncatedArchive naming the field being read.
pub(crate) fn read_exact<R: Read>(
    mut reader: R,
    buf: &mut [u8],
    what: &'static str,
) -> Result<()> {
    reader.read_exact(buf).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            MsfError::TruncatedArchive(what)
        } else {
            MsfError::Io(e)
        }
    })
}

fn read_u32<R: Read>(mut reader: R, what: &'static str) -> Result<u32> {
    let mut buf = [0u8; 4];
    read_exact(&mut reader, &mut buf, what)?;
    Ok(u32::from_be_bytes(buf))
}

fn read_u8<R: Read>(mut reader: R, what: &'static str) -> Result<u8> {
    let mut buf = [0u8; 1];
    read_exact(&mut reader, &mut buf, what)?;
    Ok(buf[0])
}
