//! Zip archive creation and extraction.
//!
//! Creation is purely in memory. Extraction writes every file entry through a
//! `StreamService` so archives land on disk exactly like any other saved
//! stream (buffered, flushed, synced).

use std::io::{Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::errors::{Result, SlotIoError};
use crate::services::StreamService;
use crate::services::helpers::io_error_with_help;

/// One entry to be written into an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipEntry {
    pub name: String,
    pub content: Vec<u8>,
}

impl ZipEntry {
    pub fn new(name: &str, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: clean_entry_name(name),
            content: content.into(),
        }
    }
}

/// Archive-relative entry name: forward slashes, no leading slash.
pub fn clean_entry_name(name: &str) -> String {
    name.replace('\\', "/").trim_start_matches('/').to_string()
}

/// Metadata a zip tool left behind that nobody wants extracted.
fn is_junk(name: &str) -> bool {
    name.starts_with("__MACOSX/")
        || name
            .rsplit('/')
            .find(|s| !s.is_empty())
            .is_some_and(|last| last == ".DS_Store")
}

/// Build a deflated archive from `entries`, in order.
pub fn zip_entries(entries: &[ZipEntry]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in entries {
        if entry.name.is_empty() {
            return Err(SlotIoError::invalid("content.zip", "zip entry name cannot be empty"));
        }
        if entry.name.ends_with('/') {
            writer.add_directory(entry.name.as_str(), options)?;
            continue;
        }
        writer.start_file(entry.name.as_str(), options)?;
        writer
            .write_all(&entry.content)
            .map_err(io_error_with_help("write zip entry", Path::new(&entry.name)))?;
        debug!(entry = %entry.name, bytes = entry.content.len(), "added zip entry");
    }

    let cursor = writer.finish()?;
    let bytes = cursor.into_inner();
    info!(entries = entries.len(), bytes = bytes.len(), "Created zip archive");
    Ok(bytes)
}

/// Extract `reader` into the existing folder `dest`, returning the absolute
/// paths of the files written, in archive order.
pub fn extract<R: Read + Seek>(
    reader: R,
    dest: &Path,
    sink: &dyn StreamService,
) -> Result<Vec<PathBuf>> {
    if !dest.is_dir() {
        return Err(SlotIoError::NotFound(dest.to_path_buf()));
    }
    let mut archive = ZipArchive::new(reader)?;
    let mut written = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let name = entry.name().to_string();
        if is_junk(&name) {
            debug!(entry = %name, "skipping archive metadata entry");
            continue;
        }
        let Some(rel) = entry.enclosed_name() else {
            warn!(entry = %name, "refusing archive entry outside destination");
            return Err(SlotIoError::invalid(
                "file.unzip",
                format!("archive entry '{name}' would escape the destination folder"),
            ));
        };
        let target = dest.join(rel);

        if entry.is_dir() {
            std::fs::create_dir_all(&target)
                .map_err(io_error_with_help("create directory", &target))?;
            continue;
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .map_err(io_error_with_help("create directory", parent))?;
        }
        sink.save_file(&mut entry, &target, true)?;
        written.push(target);
    }

    info!(dest = %dest.display(), files = written.len(), "Extracted zip archive");
    Ok(written)
}
