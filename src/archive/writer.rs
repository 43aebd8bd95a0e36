use crate::archive::format::{header_size, ArchiveHeader, EntryRecord, PAYLOAD_EXTENSION};
use crate::error::{MsfError, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// One payload file selected for packing
struct PayloadFile {
    /// Forward-slash relative path, used as the entry name
    name: String,
    /// Location on disk
    disk_path: PathBuf,
    size: u32,
}

/// Pack a directory of payload files into a single MSF archive.
///
/// Recursively collects every `.mp3` file (case-insensitive) under
/// `source_dir`, sorts the entries by relative path, and writes the
/// header, offset table, and concatenated payloads to `dest_file`.
/// The destination must not already exist; on any failure after the
/// output is created it is removed again, so a failed pack never
/// leaves a partial archive behind.
pub fn pack(source_dir: &Path, dest_file: &Path) -> Result<()> {
    if !source_dir.exists() {
        return Err(MsfError::SourceNotFound(source_dir.to_path_buf()));
    }
    if !source_dir.is_dir() {
        return Err(MsfError::NotADirectory(source_dir.to_path_buf()));
    }
    if dest_file.exists() {
        return Err(MsfError::DestinationExists(dest_file.to_path_buf()));
    }

    let mut files = collect_payload_files(source_dir)?;
    if files.is_empty() {
        return Err(MsfError::NoPayloadFilesFound(source_dir.to_path_buf()));
    }

    // Deterministic output: entries ordered by relative path bytes
    files.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));

    // create_new closes the exists-check race; a concurrent file still
    // reports DestinationExists
    let out = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest_file)
        .map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                MsfError::DestinationExists(dest_file.to_path_buf())
            } else {
                MsfError::Io(e)
            }
        })?;

    match write_archive(out, &files) {
        Ok(()) => {
            info!(entries = files.len(), dest = %dest_file.display(), "packed archive");
            Ok(())
        }
        Err(e) => {
            // Best effort: the write already failed, keep the original error
            let _ = std::fs::remove_file(dest_file);
            Err(e)
        }
    }
}

fn walk_error(e: walkdir::Error) -> MsfError {
    let msg = e.to_string();
    MsfError::Io(
        e.into_io_error()
            .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, msg)),
    )
}

/// Recursively enumerate eligible payload files under `source_dir`
fn collect_payload_files(source_dir: &Path) -> Result<Vec<PayloadFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(source_dir).follow_links(false) {
        let entry = entry.map_err(walk_error)?;
        if !entry.file_type().is_file() || !has_payload_extension(entry.path()) {
            continue;
        }

        let name = relative_name(source_dir, entry.path())?;
        if !name.is_ascii() {
            return Err(MsfError::UnsafeFileName(name));
        }

        let meta = entry.metadata().map_err(walk_error)?;
        // Sizes are stored in a u32 field; anything bigger cannot be archived
        let size = u32::try_from(meta.len()).map_err(|_| {
            MsfError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "'{}' is too large for the MSF format ({} bytes)",
                    entry.path().display(),
                    meta.len()
                ),
            ))
        })?;

        debug!(name = %name, size, "selected payload file");
        files.push(PayloadFile {
            name,
            disk_path: entry.path().to_path_buf(),
            size,
        });
    }

    Ok(files)
}

fn has_payload_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(PAYLOAD_EXTENSION))
        .unwrap_or(false)
}

/// Path relative to the source root, joined with forward slashes
fn relative_name(root: &Path, path: &Path) -> Result<String> {
    let rel = path
        .strip_prefix(root)
        .map_err(|_| MsfError::UnsafeFileName(path.to_string_lossy().into_owned()))?;

    let mut name = String::new();
    for (i, comp) in rel.components().enumerate() {
        if i != 0 {
            name.push('/');
        }
        name.push_str(&comp.as_os_str().to_string_lossy());
    }
    Ok(name)
}

/// Write header, table and payloads in order
fn write_archive(out: File, files: &[PayloadFile]) -> Result<()> {
    let names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
    let mut offset = header_size(&names);

    let mut writer = BufWriter::new(out);
    ArchiveHeader::new(files.len() as u32).write_to(&mut writer)?;

    for (i, file) in files.iter().enumerate() {
        let record = EntryRecord {
            offset,
            size: file.size,
            name: file.name.clone(),
        };
        record.write_to(&mut writer)?;

        // Offsets are u32; fail instead of wrapping when the running sum
        // pushes a later entry past the addressable range
        if i + 1 < files.len() {
            offset = offset.checked_add(file.size).ok_or_else(|| {
                MsfError::Io(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!(
                        "payload offset for '{}' exceeds the MSF offset range",
                        files[i + 1].name
                    ),
                ))
            })?;
        }
    }

    for file in files {
        let mut payload = File::open(&file.disk_path)?;
        let copied = io::copy(&mut payload, &mut writer)?;
        if copied != file.size as u64 {
            return Err(MsfError::Io(io::Error::new(
                io::ErrorKind::Other,
                format!(
                    "'{}' changed size while packing ({} -> {} bytes)",
                    file.disk_path.display(),
                    file.size,
                    copied
                ),
            )));
        }
    }

    writer.flush()?;
    Ok(())
}
