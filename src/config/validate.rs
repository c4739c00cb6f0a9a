//! Config validation logic.
//! Makes sure the root folder exists (creating it if needed), is a readable
//! and writable directory, then canonicalizes it.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

use super::types::Config;

/// Validate the root folder and replace it with its canonical form.
pub fn validate_and_normalize(cfg: &mut Config) -> Result<()> {
    let root = cfg.root_folder.clone();
    if root.as_os_str().is_empty() {
        bail!("root_folder is empty; set it in the config file or pass --root");
    }

    ensure_dir_is_or_create(&root, "root_folder")?;
    ensure_readable(&root, "root_folder")?;
    ensure_writable(&root, "root_folder")?;

    cfg.root_folder = dunce::canonicalize(&root)
        .with_context(|| format!("canonicalize root_folder '{}'", root.display()))?;

    info!(
        "Config validated: root='{}' confine_paths={} log_file='{}'",
        cfg.root_folder.display(),
        cfg.confine_paths,
        cfg.log_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<none>".into())
    );
    Ok(())
}

/// Ensure directory is readable by attempting to open its entries.
fn ensure_readable(path: &Path, name: &str) -> Result<()> {
    fs::read_dir(path).with_context(|| {
        format!("Cannot read {name} directory '{}'; check permissions", path.display())
    })?;
    debug!("{name} readable: {}", path.display());
    Ok(())
}

/// Ensure directory exists (create if missing). If exists, it must be a directory.
fn ensure_dir_is_or_create(path: &Path, name: &str) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            error!("{name} exists but isn't a directory: {}", path.display());
            bail!("{name} exists but isn't a directory: {}", path.display());
        }
    } else {
        fs::create_dir_all(path).with_context(|| {
            format!("Failed to create {name} directory '{}'", path.display())
        })?;
        info!("Created {name} directory: {}", path.display());
    }
    Ok(())
}

/// Ensure directory is writable using a non-destructive probe file.
fn ensure_writable(path: &Path, name: &str) -> Result<()> {
    let probe = path.join(format!(".slot_io_probe_{}.tmp", std::process::id()));
    fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&probe)
        .with_context(|| format!("Cannot write to {name} '{}'; check permissions", path.display()))?;
    let _ = fs::remove_file(&probe);
    debug!("{name} writable: {}", path.display());
    Ok(())
}
