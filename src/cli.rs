//! CLI definition and parsing.
//! Defines Args and turns them into a single slot `Call`.
//!
//! Notes:
//! - VERB accepts `wait.` and `io.` prefixes; `--wait` is the flag spelling of `wait.`.
//! - Trailing `name=value` arguments become named children, bare ones positional children.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};
use crate::errors::SlotIoError;
use crate::node::Node;
use crate::slots::{Call, Invocation};

/// Run one file, folder, stream or zip slot against a root folder.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Root-confined file, folder, stream and zip operations"
)]
pub struct Args {
    /// Slot to run, e.g. `file.load`, `folder.list` or `wait.file.copy`.
    #[arg(value_name = "VERB", required_unless_present = "print_config")]
    pub verb: Option<String>,

    /// Primary argument, usually a path relative to the root folder.
    #[arg(value_name = "VALUE", value_hint = ValueHint::AnyPath)]
    pub value: Option<String>,

    /// Further arguments: `name=value` for named ones, bare values for positional ones.
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    /// Override the root folder (normally configured via XML).
    #[arg(long, value_hint = ValueHint::DirPath, help = "Override the root folder")]
    pub root: Option<PathBuf>,

    /// Run on the async path, same as prefixing the verb with `wait.`.
    #[arg(long, help = "Run the slot on the async path")]
    pub wait: bool,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Print where slot_io will look for the config file, then exit.
    #[arg(long, help = "Print the config file location used by slot_io and exit")]
    pub print_config: bool,

    /// Emit logs in structured JSON.
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(root) = &self.root {
            cfg.root_folder = root.clone();
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
    }

    /// Build the invocation and call described by the command line.
    pub fn to_call(&self) -> Result<(Invocation, Call), SlotIoError> {
        let verb = self
            .verb
            .as_deref()
            .ok_or_else(|| SlotIoError::invalid("cli", "no verb given"))?;
        let mut invocation = Invocation::parse(verb)?;
        invocation.wait |= self.wait;

        let mut call = Call::new(invocation.verb);
        if let Some(value) = &self.value {
            call = call.with_value(value.as_str());
        }
        for raw in &self.args {
            call = call.with_child(arg_node(raw));
        }
        Ok((invocation, call))
    }
}

/// `name=value` becomes a named child; anything else an unnamed positional one.
/// Names are restricted to the characters slot arguments use.
fn arg_node(raw: &str) -> Node {
    match raw.split_once('=') {
        Some((name, value))
            if !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.') =>
        {
            Node::new(name).with_value(value)
        }
        _ => Node::leaf(raw),
    }
}

pub fn parse() -> Args {
    Args::parse()
}
