//! Core library for `slot_io`.
//!
//! File, folder, stream and zip operations confined to a configured root
//! folder, exposed as named verbs ("slots") a host evaluator can dispatch.
//!
//! Layout:
//! - `resolve`: pure path helpers and the `RootResolver`
//! - `services`: injectable filesystem backends (sync and async)
//! - `archive`: zip building and extraction
//! - `slots`: the `Verb` set, `Call`/`Outcome` and the `Dispatcher`
//! - `config`, `cli`, `output`, `platform`: the `slot_io` binary's plumbing

pub mod archive;
pub mod cli;
pub mod config;
pub mod errors;
pub mod node;
pub mod output;
pub mod platform;
pub mod resolve;
pub mod services;
pub mod slots;

pub use config::{
    CONFIG_ENV, Config, LogLevel, default_config_path, default_log_path,
    path_has_symlink_ancestor,
};
pub use errors::{ErrorKind, Result, SlotIoError};
pub use node::{Node, StreamId, Value};
pub use resolve::RootResolver;
pub use services::{
    FileService, FolderService, LocalFileService, LocalFolderService, LocalStreamService,
    Services, Stream, StreamService,
};
pub use slots::{Call, Dispatcher, Evaluator, Invocation, Outcome, StreamRegistry, Verb};
