//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Creates a secure template at the default location when none exists.
//!
//! Notes:
//! - This module only reads/writes the config file; directory validation happens elsewhere.
//! - Unknown XML fields are rejected so misconfigurations surface early.

use anyhow::{Context, Result, anyhow, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel};
use super::{CONFIG_ENV, ROOT_FOLDER_DEFAULT};

use crate::platform::{set_dir_mode_0700, set_file_mode_0600, write_config_secure_new_0600};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(rename = "root_folder")]
    root_folder: Option<String>,
    #[serde(rename = "log_level")]
    log_level: Option<String>,
    #[serde(rename = "log_file")]
    log_file: Option<String>,
    #[serde(rename = "confine_paths")]
    confine_paths: Option<bool>,
}

/// Outcome of looking for a config file at startup.
#[derive(Debug)]
pub enum LoadResult {
    /// Config parsed from the given file.
    Loaded(Config, PathBuf),
    /// No file existed at the default location; a template was written there.
    CreatedTemplate(PathBuf),
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|t| !t.is_empty())
}

fn xml_to_config(parsed: XmlConfig, path: &Path) -> Result<Config> {
    let mut cfg = Config::default();
    if let Some(root) = non_empty(parsed.root_folder.as_deref()) {
        cfg.root_folder = PathBuf::from(root);
    }
    if let Some(lvl) = non_empty(parsed.log_level.as_deref()) {
        cfg.log_level = lvl
            .parse::<LogLevel>()
            .map_err(|e| anyhow!("{e} in config '{}'", path.display()))?;
    }
    cfg.log_file = non_empty(parsed.log_file.as_deref()).map(PathBuf::from);
    if let Some(confine) = parsed.confine_paths {
        cfg.confine_paths = confine;
    }
    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed, path)
}

/// Load the config from `$SLOT_IO_CONFIG` or the default location.
///
/// An explicit `$SLOT_IO_CONFIG` that does not exist is an error. A missing
/// default file is replaced by a template and reported as `CreatedTemplate`.
pub fn load_or_init() -> Result<LoadResult> {
    let explicit = env::var_os(CONFIG_ENV).is_some();
    let path = default_config_path()?;
    if path.exists() {
        let cfg = load_config_from_xml_path(&path)?;
        return Ok(LoadResult::Loaded(cfg, path));
    }
    if explicit {
        bail!("{CONFIG_ENV} points to '{}', which does not exist", path.display());
    }
    create_template_config(&path)?;
    Ok(LoadResult::CreatedTemplate(path))
}

/// Create default template config file and parent directory (best-effort permissions).
/// Refuses to write below a symlinked ancestor.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory '{}'", parent.display()))?;
        let _ = set_dir_mode_0700(parent);
    }

    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "/path/to/slot_io.log".into());

    let content = format!(
        "<!--\n  slot_io configuration (XML)\n\n    root_folder    -> directory all slot paths are resolved against\n    log_level      -> quiet | normal | info | debug\n    log_file       -> path to log file (optional; stderr is always used)\n    confine_paths  -> true rejects paths whose '..' segments leave root_folder\n\n  CLI flags override XML values.\n-->\n<config>\n  <root_folder>{ROOT_FOLDER_DEFAULT}</root_folder>\n  <log_level>normal</log_level>\n  <log_file>{suggested_log}</log_file>\n  <confine_paths>true</confine_paths>\n</config>\n"
    );

    write_config_secure_new_0600(path, content.as_bytes())?;
    let _ = set_file_mode_0600(path);

    info!("Created template config at {}", path.display());
    Ok(())
}
