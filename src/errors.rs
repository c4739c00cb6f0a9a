//! Typed error definitions for slot_io.
//! Every slot failure maps onto one of a handful of kinds so hosts can react
//! without string matching.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::node::StreamId;

/// Coarse classification of a failure, stable across error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    Conflict,
    NotFound,
    TypeMismatch,
    Io,
    Archive,
    Evaluation,
}

#[derive(Debug, Error)]
pub enum SlotIoError {
    #[error("Invalid argument to [{slot}]: {reason}")]
    InvalidArgument { slot: String, reason: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    #[error("No open stream with handle {0}")]
    UnknownStream(StreamId),

    #[error("[{slot}] cannot handle {found} content; expected text or bytes")]
    TypeMismatch { slot: String, found: &'static str },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Evaluation failed: {0}")]
    Evaluation(String),
}

impl SlotIoError {
    pub fn invalid(slot: impl Into<String>, reason: impl Into<String>) -> Self {
        SlotIoError::InvalidArgument {
            slot: slot.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SlotIoError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            SlotIoError::Conflict(_) => ErrorKind::Conflict,
            SlotIoError::NotFound(_) | SlotIoError::UnknownStream(_) => ErrorKind::NotFound,
            SlotIoError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            SlotIoError::Io { .. } => ErrorKind::Io,
            SlotIoError::Archive(_) => ErrorKind::Archive,
            SlotIoError::Evaluation(_) => ErrorKind::Evaluation,
        }
    }

    /// Numeric code suitable for process exit statuses and structured logs.
    pub fn code(&self) -> i32 {
        match self.kind() {
            ErrorKind::InvalidArgument => 2,
            ErrorKind::Conflict => 3,
            ErrorKind::NotFound => 4,
            ErrorKind::TypeMismatch => 5,
            ErrorKind::Io => 10,
            ErrorKind::Archive => 11,
            ErrorKind::Evaluation => 12,
        }
    }
}

pub type Result<T> = std::result::Result<T, SlotIoError>;
