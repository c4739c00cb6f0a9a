//! Config module.
//! Provides configuration types, default paths, XML loading, and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use validate::validate_and_normalize;
pub use xml::{LoadResult, create_template_config, load_config_from_xml_path, load_or_init};

/// Environment variable naming the config file (or a directory holding `config.xml`).
pub const CONFIG_ENV: &str = "SLOT_IO_CONFIG";

/// Root folder written into a freshly created template config.
pub const ROOT_FOLDER_DEFAULT: &str = "/srv/slot_io";
