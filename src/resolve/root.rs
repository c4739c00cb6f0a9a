//! The root folder all slot paths are confined to.

use std::path::Path;
use tracing::debug;

use crate::errors::{Result, SlotIoError};

use super::path::{combine_paths, escapes_root, normalize};

/// Absolute root plus the translation between host-relative and absolute paths.
///
/// Constructed once from configuration and shared by every slot; there is no
/// process-wide instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootResolver {
    root_folder: String,
    confine: bool,
}

impl RootResolver {
    /// Normalize `root` (forward slashes, no trailing slash). Empty roots, and
    /// the bare filesystem root which normalizes to empty, are rejected.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root_folder = normalize(&root.as_ref().to_string_lossy());
        if root_folder.trim().is_empty() {
            return Err(SlotIoError::invalid(
                "folder.root",
                "root folder must be a non-empty directory path",
            ));
        }
        Ok(Self {
            root_folder,
            confine: true,
        })
    }

    /// Toggle rejection of relative paths that climb out of the root.
    pub fn with_confinement(mut self, confine: bool) -> Self {
        self.confine = confine;
        self
    }

    pub fn root_folder(&self) -> &str {
        &self.root_folder
    }

    pub fn absolute_path(&self, relative: &str) -> String {
        combine_paths(&self.root_folder, relative)
    }

    /// Inverse of `absolute_path`; the result always starts with `/`.
    pub fn relative_path(&self, absolute: &str) -> String {
        let absolute = absolute.replace('\\', "/");
        let rest = match absolute.strip_prefix(&self.root_folder) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => absolute.as_str(),
        };
        format!("/{}", rest.trim_start_matches('/'))
    }

    /// Absolute path for a slot argument, refusing `..` escapes when confined.
    pub fn resolve(&self, relative: &str) -> Result<String> {
        if self.confine && escapes_root(relative) {
            return Err(SlotIoError::invalid(
                "path",
                format!("'{relative}' resolves outside of the root folder"),
            ));
        }
        let absolute = self.absolute_path(relative);
        debug!(relative, absolute = %absolute, "resolved path");
        Ok(absolute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn new_normalizes_root() {
        let r = RootResolver::new("C:\\srv\\files\\").unwrap();
        assert_eq!(r.root_folder(), "C:/srv/files");
    }

    #[test]
    fn empty_root_rejected() {
        assert!(RootResolver::new("").is_err());
        assert!(RootResolver::new("/").is_err());
    }

    #[test]
    fn relative_absolute_round_trip() {
        let r = RootResolver::new("/srv/files").unwrap();
        for rel in ["a.txt", "/a.txt", "/x/y/z.bin", "deep/er/"] {
            let abs = r.absolute_path(rel);
            assert_eq!(r.absolute_path(&r.relative_path(&abs)), abs);
        }
        assert_eq!(r.relative_path("/srv/files/x/y.txt"), "/x/y.txt");
        assert_eq!(r.relative_path("/srv/files"), "/");
    }

    #[test]
    fn relative_path_respects_segment_boundary() {
        let r = RootResolver::new("/srv/files").unwrap();
        assert_eq!(r.relative_path("/srv/files2/x"), "/srv/files2/x");
        assert_eq!(r.relative_path("/srv/files/2/x"), "/2/x");
    }

    #[test]
    fn resolve_rejects_escapes_only_when_confined() {
        let r = RootResolver::new("/srv/files").unwrap();
        let err = r.resolve("../etc/passwd").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(r.resolve("/a/../b.txt").unwrap(), "/srv/files/a/../b.txt");

        let open = r.with_confinement(false);
        assert_eq!(open.resolve("../x").unwrap(), "/srv/files/../x");
    }
}
