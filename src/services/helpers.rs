//! I/O error adapters.
//!
//! Converts `io::Error` into `SlotIoError`, keeping the operation and path in
//! the message together with a platform-aware hint. Missing paths become
//! `NotFound` and pre-existing targets become `Conflict` so callers can branch
//! on the kind instead of the text.
//!
//! Usage:
//!   fs::read(path).map_err(io_error_with_help("read file", path))?;

use std::io;
use std::path::Path;

use crate::errors::SlotIoError;

fn hint(e: &io::Error) -> Option<&'static str> {
    #[cfg(unix)]
    if let Some(code) = e.raw_os_error() {
        return match code {
            libc::EACCES | libc::EPERM => Some("permission denied; check ownership and write permissions"),
            libc::EXDEV => Some("cross-filesystem; rename not possible"),
            libc::EBUSY => Some("resource busy; another process may be using it"),
            libc::ENOSPC => Some("insufficient space on device"),
            libc::EROFS => Some("read-only filesystem"),
            libc::ENOTEMPTY => Some("directory not empty"),
            libc::EISDIR => Some("is a directory"),
            libc::ENOTDIR => Some("a path component is not a directory"),
            libc::ENAMETOOLONG => Some("filename or path too long"),
            libc::EMFILE | libc::ENFILE => Some("too many open files"),
            _ => None,
        };
    }
    #[cfg(windows)]
    if let Some(code) = e.raw_os_error() {
        return match code {
            5 => Some("access denied; check permissions"),
            17 => Some("not same device; cross-filesystem move"),
            32 => Some("sharing violation; file is in use"),
            112 => Some("insufficient disk space"),
            _ => None,
        };
    }
    match e.kind() {
        io::ErrorKind::PermissionDenied => Some("permission denied"),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Some("busy or timed out"),
        _ => None,
    }
}

fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    if let Some(h) = hint(e) {
        msg.push_str(" (");
        msg.push_str(h);
        msg.push(')');
    }
    msg
}

/// Returns a closure suitable for `.map_err(...)`.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> SlotIoError + 'a {
    move |e: io::Error| match e.kind() {
        io::ErrorKind::NotFound => SlotIoError::NotFound(path.to_path_buf()),
        io::ErrorKind::AlreadyExists => {
            SlotIoError::Conflict(format!("{} '{}': already exists", op, path.display()))
        }
        _ => SlotIoError::Io {
            context: build_message(op, path, &e),
            source: e,
        },
    }
}

/// Failure of a blocking task handed to tokio.
pub fn join_error(op: &str, e: tokio::task::JoinError) -> SlotIoError {
    SlotIoError::Io {
        context: format!("{op}: background task failed"),
        source: io::Error::other(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use std::path::PathBuf;

    #[test]
    fn not_found_maps_to_kind() {
        let p = PathBuf::from("/nope");
        let err = io_error_with_help("read file", &p)(io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn other_errors_keep_context() {
        let p = PathBuf::from("/x/y");
        let err = io_error_with_help("write file", &p)(io::Error::other("boom"));
        assert_eq!(err.kind(), ErrorKind::Io);
        let msg = err.to_string();
        assert!(msg.contains("write file '/x/y'"), "{msg}");
        assert!(msg.contains("boom"), "{msg}");
    }
}
