//! File primitives behind the `file.*` slots.
//!
//! `FileService` is the seam slots talk to; `LocalFileService` maps it onto
//! `std::fs` for the blocking variants and `tokio::fs` for the async ones.
//! Both variants share semantics:
//! - `delete` of a missing file is a no-op.
//! - `copy`/`move_to` refuse identical source and destination.
//! - `save*` overwrites unconditionally.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::errors::{Result, SlotIoError};

use super::helpers::{io_error_with_help, join_error};
use super::listing::{EntryKind, list_dir, list_dir_async, walk_dir};

#[async_trait]
pub trait FileService: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
    fn delete(&self, path: &Path) -> Result<()>;
    fn copy(&self, src: &Path, dst: &Path) -> Result<()>;
    fn move_to(&self, src: &Path, dst: &Path) -> Result<()>;
    fn load(&self, path: &Path) -> Result<String>;
    fn load_binary(&self, path: &Path) -> Result<Vec<u8>>;
    fn save(&self, path: &Path, content: &str) -> Result<()>;
    fn save_binary(&self, path: &Path, content: &[u8]) -> Result<()>;
    fn list_files(&self, folder: &Path) -> Result<Vec<PathBuf>>;
    fn list_files_recursively(&self, folder: &Path) -> Result<Vec<PathBuf>>;

    async fn exists_async(&self, path: &Path) -> bool;
    async fn delete_async(&self, path: &Path) -> Result<()>;
    async fn copy_async(&self, src: &Path, dst: &Path) -> Result<()>;
    async fn move_to_async(&self, src: &Path, dst: &Path) -> Result<()>;
    async fn load_async(&self, path: &Path) -> Result<String>;
    async fn load_binary_async(&self, path: &Path) -> Result<Vec<u8>>;
    async fn save_async(&self, path: &Path, content: &str) -> Result<()>;
    async fn save_binary_async(&self, path: &Path, content: &[u8]) -> Result<()>;
    async fn list_files_async(&self, folder: &Path) -> Result<Vec<PathBuf>>;
    async fn list_files_recursively_async(&self, folder: &Path) -> Result<Vec<PathBuf>>;
}

/// `FileService` over the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileService;

fn ensure_distinct(op: &str, src: &Path, dst: &Path) -> Result<()> {
    if src == dst {
        return Err(SlotIoError::invalid(
            format!("file.{op}"),
            format!("cannot {op} using same source and destination '{}'", src.display()),
        ));
    }
    Ok(())
}

fn ensure_source(src: &Path) -> Result<()> {
    if src.is_file() {
        Ok(())
    } else {
        Err(SlotIoError::NotFound(src.to_path_buf()))
    }
}

#[cfg(unix)]
fn is_cross_device(e: &std::io::Error) -> bool {
    e.raw_os_error() == Some(libc::EXDEV)
}

#[cfg(not(unix))]
fn is_cross_device(e: &std::io::Error) -> bool {
    // ERROR_NOT_SAME_DEVICE
    e.raw_os_error() == Some(17)
}

#[async_trait]
impl FileService for LocalFileService {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn delete(&self, path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => {
                info!(path = %path.display(), "Deleted file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "delete: file already absent");
                Ok(())
            }
            Err(e) => Err(io_error_with_help("delete file", path)(e)),
        }
    }

    fn copy(&self, src: &Path, dst: &Path) -> Result<()> {
        ensure_distinct("copy", src, dst)?;
        ensure_source(src)?;
        let bytes = std::fs::copy(src, dst).map_err(io_error_with_help("copy file to", dst))?;
        info!(src = %src.display(), dst = %dst.display(), bytes, "Copied file");
        Ok(())
    }

    fn move_to(&self, src: &Path, dst: &Path) -> Result<()> {
        ensure_distinct("move", src, dst)?;
        ensure_source(src)?;
        match std::fs::rename(src, dst) {
            Ok(()) => {
                info!(src = %src.display(), dst = %dst.display(), "Renamed file");
                Ok(())
            }
            Err(e) if is_cross_device(&e) => {
                warn!(error = %e, "Rename crossed filesystems, falling back to copy+remove");
                std::fs::copy(src, dst).map_err(io_error_with_help("copy file to", dst))?;
                std::fs::remove_file(src).map_err(io_error_with_help("remove original file", src))?;
                info!(src = %src.display(), dst = %dst.display(), "Copied file and removed source");
                Ok(())
            }
            Err(e) => Err(io_error_with_help("move file to", dst)(e)),
        }
    }

    fn load(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(io_error_with_help("read file", path))
    }

    fn load_binary(&self, path: &Path) -> Result<Vec<u8>> {
        std::fs::read(path).map_err(io_error_with_help("read file", path))
    }

    fn save(&self, path: &Path, content: &str) -> Result<()> {
        self.save_binary(path, content.as_bytes())
    }

    fn save_binary(&self, path: &Path, content: &[u8]) -> Result<()> {
        std::fs::write(path, content).map_err(io_error_with_help("write file", path))?;
        info!(path = %path.display(), bytes = content.len(), "Saved file");
        Ok(())
    }

    fn list_files(&self, folder: &Path) -> Result<Vec<PathBuf>> {
        list_dir(folder, EntryKind::File)
    }

    fn list_files_recursively(&self, folder: &Path) -> Result<Vec<PathBuf>> {
        walk_dir(folder, EntryKind::File)
    }

    async fn exists_async(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    async fn delete_async(&self, path: &Path) -> Result<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => {
                info!(path = %path.display(), "Deleted file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error_with_help("delete file", path)(e)),
        }
    }

    async fn copy_async(&self, src: &Path, dst: &Path) -> Result<()> {
        ensure_distinct("copy", src, dst)?;
        if !self.exists_async(src).await {
            return Err(SlotIoError::NotFound(src.to_path_buf()));
        }
        let bytes = tokio::fs::copy(src, dst)
            .await
            .map_err(io_error_with_help("copy file to", dst))?;
        info!(src = %src.display(), dst = %dst.display(), bytes, "Copied file");
        Ok(())
    }

    async fn move_to_async(&self, src: &Path, dst: &Path) -> Result<()> {
        ensure_distinct("move", src, dst)?;
        if !self.exists_async(src).await {
            return Err(SlotIoError::NotFound(src.to_path_buf()));
        }
        match tokio::fs::rename(src, dst).await {
            Ok(()) => {
                info!(src = %src.display(), dst = %dst.display(), "Renamed file");
                Ok(())
            }
            Err(e) if is_cross_device(&e) => {
                warn!(error = %e, "Rename crossed filesystems, falling back to copy+remove");
                tokio::fs::copy(src, dst)
                    .await
                    .map_err(io_error_with_help("copy file to", dst))?;
                tokio::fs::remove_file(src)
                    .await
                    .map_err(io_error_with_help("remove original file", src))?;
                Ok(())
            }
            Err(e) => Err(io_error_with_help("move file to", dst)(e)),
        }
    }

    async fn load_async(&self, path: &Path) -> Result<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(io_error_with_help("read file", path))
    }

    async fn load_binary_async(&self, path: &Path) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(io_error_with_help("read file", path))
    }

    async fn save_async(&self, path: &Path, content: &str) -> Result<()> {
        self.save_binary_async(path, content.as_bytes()).await
    }

    async fn save_binary_async(&self, path: &Path, content: &[u8]) -> Result<()> {
        tokio::fs::write(path, content)
            .await
            .map_err(io_error_with_help("write file", path))?;
        info!(path = %path.display(), bytes = content.len(), "Saved file");
        Ok(())
    }

    async fn list_files_async(&self, folder: &Path) -> Result<Vec<PathBuf>> {
        list_dir_async(folder, EntryKind::File).await
    }

    async fn list_files_recursively_async(&self, folder: &Path) -> Result<Vec<PathBuf>> {
        let folder = folder.to_path_buf();
        tokio::task::spawn_blocking(move || walk_dir(&folder, EntryKind::File))
            .await
            .map_err(|e| join_error("list files", e))?
    }
}
