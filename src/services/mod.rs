//! Filesystem services the slots delegate to.

pub mod file;
pub mod folder;
pub mod helpers;
mod listing;
pub mod stream;

use std::sync::Arc;

pub use file::{FileService, LocalFileService};
pub use folder::{FolderService, LocalFolderService};
pub use stream::{LocalStreamService, Stream, StreamService};

/// The three services a dispatcher needs, shareable across threads.
#[derive(Clone)]
pub struct Services {
    pub file: Arc<dyn FileService>,
    pub folder: Arc<dyn FolderService>,
    pub stream: Arc<dyn StreamService>,
}

impl Services {
    /// Services backed by the local filesystem.
    pub fn local() -> Self {
        Self {
            file: Arc::new(LocalFileService),
            folder: Arc::new(LocalFolderService),
            stream: Arc::new(LocalStreamService),
        }
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::local()
    }
}
