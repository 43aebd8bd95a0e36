use crate::archive::format::{read_exact, ArchiveHeader, EntryRecord};
use crate::error::{MsfError, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Component, Path};
use tracing::{debug, info};

/// Unpack an MSF archive into a directory.
///
/// Validates the signature and version, then walks the entry table in
/// order. For each entry the table cursor is saved, the payload is read
/// at its absolute offset, written to `dest_dir/<name>`, and the cursor
/// restored before the next entry. `dest_dir` is created (with parents)
/// if it does not exist.
pub fn unpack(source_file: &Path, dest_dir: &Path) -> Result<()> {
    if !source_file.exists() || source_file.is_dir() {
        return Err(MsfError::SourceNotFound(source_file.to_path_buf()));
    }

    if dest_dir.exists() {
        if !dest_dir.is_dir() {
            return Err(MsfError::DestinationNotDirectory(dest_dir.to_path_buf()));
        }
    } else {
        fs::create_dir_all(dest_dir)?;
    }

    let mut archive = File::open(source_file)?;
    let header = ArchiveHeader::read_from(&mut archive)?;
    info!(entries = header.entry_count, source = %source_file.display(), "unpacking archive");

    for _ in 0..header.entry_count {
        let record = EntryRecord::read_from(&mut archive)?;
        check_entry_name(&record.name)?;

        // Save the table cursor, fetch the payload, come back
        let table_pos = archive.stream_position()?;
        archive.seek(SeekFrom::Start(record.offset as u64))?;
        extract_payload(&mut archive, &record, dest_dir)?;
        archive.seek(SeekFrom::Start(table_pos))?;
    }

    Ok(())
}

/// Reject entry names that could resolve outside the destination. The
/// format's ASCII name field does not forbid them, so the decoder must.
fn check_entry_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains('\\') {
        return Err(MsfError::PathTraversal(name.to_string()));
    }

    for comp in Path::new(name).components() {
        match comp {
            Component::Normal(_) => {}
            _ => return Err(MsfError::PathTraversal(name.to_string())),
        }
    }
    Ok(())
}

fn extract_payload(archive: &mut File, record: &EntryRecord, dest_dir: &Path) -> Result<()> {
    let mut payload = vec![0u8; record.size as usize];
    read_exact(&mut *archive, &mut payload, "entry payload")?;

    let out_path = dest_dir.join(&record.name);
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }

    debug!(name = %record.name, size = record.size, "extracted entry");
    let mut out = BufWriter::new(File::create(&out_path)?);
    out.write_all(&payload)?;
    out.flush()?;
    Ok(())
}
