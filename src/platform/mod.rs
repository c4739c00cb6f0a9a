//! Platform-specific helpers for the config file and the log file.
//! Unix gets real 0600/0700 modes; elsewhere the mode setters are no-ops.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{
    open_log_file_secure_append, set_dir_mode_0700, set_file_mode_0600,
    write_config_secure_new_0600,
};

#[cfg(not(unix))]
pub use windows::{
    open_log_file_secure_append, set_dir_mode_0700, set_file_mode_0600,
    write_config_secure_new_0600,
};

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Hidden sibling used as the staging file for an atomic config write.
/// Pattern: `.slot_io.config.tmp.<pid>.<nanos>.<seq>`
pub(crate) fn tmp_config_sibling_name(target: &Path) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
    target
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!(".slot_io.config.tmp.{pid}.{nanos}.{seq}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tmp_names_are_unique_siblings() {
        let target = Path::new("/etc/slot_io/config.xml");
        let names: HashSet<PathBuf> = (0..16).map(|_| tmp_config_sibling_name(target)).collect();
        assert_eq!(names.len(), 16);
        assert!(names.iter().all(|p| p.parent() == target.parent()));
    }
}
