//! Directory enumeration shared by the file and folder services.
//! Results are absolute paths sorted lexicographically.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::{Result, SlotIoError};

use super::helpers::io_error_with_help;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EntryKind {
    File,
    Folder,
}

impl EntryKind {
    fn matches(self, ft: &std::fs::FileType) -> bool {
        match self {
            EntryKind::File => ft.is_file(),
            EntryKind::Folder => ft.is_dir(),
        }
    }
}

/// Immediate children of `folder` of the requested kind.
pub(crate) fn list_dir(folder: &Path, kind: EntryKind) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(folder).map_err(io_error_with_help("list folder", folder))? {
        let entry = entry.map_err(io_error_with_help("read folder entry", folder))?;
        let ft = entry
            .file_type()
            .map_err(io_error_with_help("stat entry", &entry.path()))?;
        if kind.matches(&ft) {
            out.push(entry.path());
        }
    }
    out.sort();
    Ok(out)
}

/// All descendants of `folder` of the requested kind, excluding `folder` itself.
pub(crate) fn walk_dir(folder: &Path, kind: EntryKind) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(SlotIoError::NotFound(folder.to_path_buf()));
    }
    let mut out = Vec::new();
    for entry in WalkDir::new(folder).min_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(folder).to_path_buf();
            match e.into_io_error() {
                Some(io) => io_error_with_help("walk folder", &path)(io),
                None => SlotIoError::invalid("walk", format!("filesystem loop at '{}'", path.display())),
            }
        })?;
        if kind.matches(&entry.file_type()) {
            out.push(entry.into_path());
        }
    }
    out.sort();
    Ok(out)
}

/// Async counterpart of `list_dir`.
pub(crate) async fn list_dir_async(folder: &Path, kind: EntryKind) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let mut rd = tokio::fs::read_dir(folder)
        .await
        .map_err(io_error_with_help("list folder", folder))?;
    while let Some(entry) = rd
        .next_entry()
        .await
        .map_err(io_error_with_help("read folder entry", folder))?
    {
        let ft = entry
            .file_type()
            .await
            .map_err(io_error_with_help("stat entry", &entry.path()))?;
        if kind.matches(&ft) {
            out.push(entry.path());
        }
    }
    out.sort();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn list_dir_separates_files_and_folders_sorted() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("b.txt"), "b").unwrap();
        fs::write(td.path().join("a.txt"), "a").unwrap();
        fs::create_dir(td.path().join("zdir")).unwrap();
        fs::create_dir(td.path().join("cdir")).unwrap();

        let files = list_dir(td.path(), EntryKind::File).unwrap();
        assert_eq!(files, vec![td.path().join("a.txt"), td.path().join("b.txt")]);
        let dirs = list_dir(td.path(), EntryKind::Folder).unwrap();
        assert_eq!(dirs, vec![td.path().join("cdir"), td.path().join("zdir")]);
    }

    #[test]
    fn walk_dir_recurses() {
        let td = tempdir().unwrap();
        fs::create_dir_all(td.path().join("x/y")).unwrap();
        fs::write(td.path().join("x/y/deep.txt"), "d").unwrap();
        fs::write(td.path().join("top.txt"), "t").unwrap();
        let files = walk_dir(td.path(), EntryKind::File).unwrap();
        assert_eq!(files, vec![td.path().join("top.txt"), td.path().join("x/y/deep.txt")]);
        let dirs = walk_dir(td.path(), EntryKind::Folder).unwrap();
        assert_eq!(dirs, vec![td.path().join("x"), td.path().join("x/y")]);
    }

    #[test]
    fn walk_missing_folder_is_not_found() {
        let td = tempdir().unwrap();
        let err = walk_dir(&td.path().join("missing"), EntryKind::File).unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::NotFound);
    }
}
