//! Folder primitives behind the `folder.*` slots.
//! `copy` merges into an existing destination; `move_to` tries a rename and
//! falls back to copying the tree and removing the source.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::errors::{Result, SlotIoError};

use super::helpers::{io_error_with_help, join_error};
use super::listing::{EntryKind, list_dir, list_dir_async, walk_dir};

#[async_trait]
pub trait FolderService: Send + Sync {
    /// Returns `true` when the folder did not exist before.
    fn create(&self, path: &Path) -> Result<bool>;
    fn delete(&self, path: &Path) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
    fn move_to(&self, src: &Path, dst: &Path) -> Result<()>;
    fn copy(&self, src: &Path, dst: &Path) -> Result<()>;
    fn list_folders(&self, folder: &Path) -> Result<Vec<PathBuf>>;
    fn list_folders_recursively(&self, folder: &Path) -> Result<Vec<PathBuf>>;

    async fn create_async(&self, path: &Path) -> Result<bool>;
    async fn delete_async(&self, path: &Path) -> Result<()>;
    async fn exists_async(&self, path: &Path) -> bool;
    async fn move_to_async(&self, src: &Path, dst: &Path) -> Result<()>;
    async fn copy_async(&self, src: &Path, dst: &Path) -> Result<()>;
    async fn list_folders_async(&self, folder: &Path) -> Result<Vec<PathBuf>>;
    async fn list_folders_recursively_async(&self, folder: &Path) -> Result<Vec<PathBuf>>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFolderService;

/// Merge-copy `src` into `dst`, creating folders as needed and overwriting
/// files that already exist on the destination side.
fn copy_tree(src: &Path, dst: &Path) -> Result<u64> {
    if !src.is_dir() {
        return Err(SlotIoError::NotFound(src.to_path_buf()));
    }
    std::fs::create_dir_all(dst).map_err(io_error_with_help("create directory", dst))?;

    let mut files = 0u64;
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            match e.into_io_error() {
                Some(io) => io_error_with_help("walk folder", &path)(io),
                None => SlotIoError::invalid("folder.copy", format!("filesystem loop at '{}'", path.display())),
            }
        })?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)
                .map_err(io_error_with_help("create directory", &target))?;
        } else if entry.file_type().is_file() {
            std::fs::copy(entry.path(), &target)
                .map_err(io_error_with_help("copy file to destination", &target))?;
            files += 1;
        }
    }
    Ok(files)
}

fn move_tree(src: &Path, dst: &Path) -> Result<()> {
    if !src.is_dir() {
        return Err(SlotIoError::NotFound(src.to_path_buf()));
    }
    if std::fs::rename(src, dst).is_ok() {
        info!(src = %src.display(), dst = %dst.display(), "Renamed directory");
        return Ok(());
    }
    warn!(src = %src.display(), "Rename failed, copying tree instead");
    copy_tree(src, dst)?;
    std::fs::remove_dir_all(src).map_err(io_error_with_help("remove source directory", src))?;
    info!(src = %src.display(), dst = %dst.display(), "Copied directory contents and removed source");
    Ok(())
}

#[async_trait]
impl FolderService for LocalFolderService {
    fn create(&self, path: &Path) -> Result<bool> {
        if path.is_dir() {
            return Ok(false);
        }
        std::fs::create_dir_all(path).map_err(io_error_with_help("create directory", path))?;
        info!(path = %path.display(), "Created folder");
        Ok(true)
    }

    fn delete(&self, path: &Path) -> Result<()> {
        match std::fs::remove_dir_all(path) {
            Ok(()) => {
                info!(path = %path.display(), "Deleted folder");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error_with_help("delete folder", path)(e)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn move_to(&self, src: &Path, dst: &Path) -> Result<()> {
        move_tree(src, dst)
    }

    fn copy(&self, src: &Path, dst: &Path) -> Result<()> {
        let files = copy_tree(src, dst)?;
        info!(src = %src.display(), dst = %dst.display(), files, "Copied folder");
        Ok(())
    }

    fn list_folders(&self, folder: &Path) -> Result<Vec<PathBuf>> {
        list_dir(folder, EntryKind::Folder)
    }

    fn list_folders_recursively(&self, folder: &Path) -> Result<Vec<PathBuf>> {
        walk_dir(folder, EntryKind::Folder)
    }

    async fn create_async(&self, path: &Path) -> Result<bool> {
        if self.exists_async(path).await {
            return Ok(false);
        }
        tokio::fs::create_dir_all(path)
            .await
            .map_err(io_error_with_help("create directory", path))?;
        info!(path = %path.display(), "Created folder");
        Ok(true)
    }

    async fn delete_async(&self, path: &Path) -> Result<()> {
        match tokio::fs::remove_dir_all(path).await {
            Ok(()) => {
                info!(path = %path.display(), "Deleted folder");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error_with_help("delete folder", path)(e)),
        }
    }

    async fn exists_async(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    async fn move_to_async(&self, src: &Path, dst: &Path) -> Result<()> {
        let (src, dst) = (src.to_path_buf(), dst.to_path_buf());
        tokio::task::spawn_blocking(move || move_tree(&src, &dst))
            .await
            .map_err(|e| join_error("move folder", e))?
    }

    async fn copy_async(&self, src: &Path, dst: &Path) -> Result<()> {
        let (src, dst) = (src.to_path_buf(), dst.to_path_buf());
        tokio::task::spawn_blocking(move || {
            let files = copy_tree(&src, &dst)?;
            info!(src = %src.display(), dst = %dst.display(), files, "Copied folder");
            Ok(())
        })
        .await
        .map_err(|e| join_error("copy folder", e))?
    }

    async fn list_folders_async(&self, folder: &Path) -> Result<Vec<PathBuf>> {
        list_dir_async(folder, EntryKind::Folder).await
    }

    async fn list_folders_recursively_async(&self, folder: &Path) -> Result<Vec<PathBuf>> {
        let folder = folder.to_path_buf();
        tokio::task::spawn_blocking(move || walk_dir(&folder, EntryKind::Folder))
            .await
            .map_err(|e| join_error("list folders", e))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn create_reports_whether_new() {
        let td = tempdir().unwrap();
        let p = td.path().join("a/b");
        assert!(LocalFolderService.create(&p).unwrap());
        assert!(!LocalFolderService.create(&p).unwrap());
        assert!(p.is_dir());
    }

    #[test]
    fn copy_merges_and_overwrites() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let dst = td.path().join("dst");
        fs::create_dir_all(src.join("inner")).unwrap();
        fs::write(src.join("one.txt"), "new").unwrap();
        fs::write(src.join("inner/two.txt"), "2").unwrap();
        fs::create_dir_all(&dst).unwrap();
        fs::write(dst.join("one.txt"), "old").unwrap();
        fs::write(dst.join("keep.txt"), "k").unwrap();

        LocalFolderService.copy(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(dst.join("one.txt")).unwrap(), "new");
        assert_eq!(fs::read_to_string(dst.join("inner/two.txt")).unwrap(), "2");
        assert_eq!(fs::read_to_string(dst.join("keep.txt")).unwrap(), "k");
        assert!(src.join("one.txt").exists());
    }

    #[test]
    fn move_removes_source() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        fs::create_dir_all(src.join("x")).unwrap();
        fs::write(src.join("x/f.txt"), "f").unwrap();
        let dst = td.path().join("moved");
        LocalFolderService.move_to(&src, &dst).unwrap();
        assert!(!src.exists());
        assert_eq!(fs::read_to_string(dst.join("x/f.txt")).unwrap(), "f");
    }

    #[test]
    fn delete_missing_is_noop() {
        let td = tempdir().unwrap();
        LocalFolderService.delete(&td.path().join("nope")).unwrap();
    }

    #[tokio::test]
    async fn async_copy_matches_sync_semantics() {
        let td = tempdir().unwrap();
        let src = td.path().join("s");
        fs::create_dir_all(src.join("deep/er")).unwrap();
        fs::write(src.join("deep/er/z.txt"), "z").unwrap();
        let dst = td.path().join("d");
        LocalFolderService.copy_async(&src, &dst).await.unwrap();
        assert_eq!(fs::read_to_string(dst.join("deep/er/z.txt")).unwrap(), "z");
        let dirs = LocalFolderService.list_folders_recursively_async(&dst).await.unwrap();
        assert_eq!(dirs, vec![dst.join("deep"), dst.join("deep/er")]);
    }
}
