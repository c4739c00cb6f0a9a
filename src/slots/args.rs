//! Argument extraction shared by the slot handlers.

use crate::errors::{Result, SlotIoError};
use crate::node::{Node, StreamId, Value};
use crate::resolve::{RootResolver, collapse_dots, file_name};

use super::Call;

/// The call's value as a path string.
pub(crate) fn path_value<'a>(call: &'a Call, slot: &str) -> Result<&'a str> {
    match &call.value {
        Some(Value::Str(s)) if !s.trim().is_empty() => Ok(s),
        Some(Value::Str(_)) | None => Err(SlotIoError::invalid(slot, "No path provided")),
        Some(other) => Err(SlotIoError::TypeMismatch {
            slot: slot.to_string(),
            found: other.type_name(),
        }),
    }
}

/// The call's value as a path, or `default` when absent.
pub(crate) fn path_value_or<'a>(call: &'a Call, slot: &str, default: &'a str) -> Result<&'a str> {
    match &call.value {
        None => Ok(default),
        Some(_) => path_value(call, slot),
    }
}

/// First unnamed child.
pub(crate) fn first_positional(call: &Call) -> Option<&Node> {
    call.children.iter().find(|c| c.name.is_empty())
}

/// First unnamed child's value as a string.
pub(crate) fn destination<'a>(call: &'a Call, slot: &str) -> Result<&'a str> {
    match first_positional(call).and_then(|n| n.value.as_ref()) {
        Some(Value::Str(s)) if !s.trim().is_empty() => Ok(s),
        Some(Value::Str(_)) | None => Err(SlotIoError::invalid(slot, "No destination provided")),
        Some(other) => Err(SlotIoError::TypeMismatch {
            slot: slot.to_string(),
            found: other.type_name(),
        }),
    }
}

/// Boolean child `name`, or `default` when absent.
pub(crate) fn flag(call: &Call, slot: &str, name: &str, default: bool) -> Result<bool> {
    let Some(node) = call.children.iter().find(|c| c.name == name) else {
        return Ok(default);
    };
    match &node.value {
        None => Ok(default),
        Some(v) => v
            .as_bool()
            .ok_or_else(|| SlotIoError::invalid(slot, format!("[{name}] must be true or false, got '{v}'"))),
    }
}

/// String child `name`, if supplied.
pub(crate) fn named_str<'a>(call: &'a Call, slot: &str, name: &str) -> Result<Option<&'a str>> {
    let Some(node) = call.children.iter().find(|c| c.name == name) else {
        return Ok(None);
    };
    match &node.value {
        None => Ok(None),
        Some(Value::Str(s)) => Ok(Some(s)),
        Some(other) => Err(SlotIoError::TypeMismatch {
            slot: slot.to_string(),
            found: other.type_name(),
        }),
    }
}

pub(crate) fn stream_handle(value: Option<&Value>, slot: &str) -> Result<StreamId> {
    match value {
        Some(Value::Stream(id)) => Ok(*id),
        None => Err(SlotIoError::invalid(slot, "No stream provided")),
        Some(other) => Err(SlotIoError::TypeMismatch {
            slot: slot.to_string(),
            found: other.type_name(),
        }),
    }
}

/// Resolved source and destination for copy and move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CopyMovePaths {
    pub source: String,
    pub destination: String,
}

/// Resolve the source (call value) and destination (first positional child)
/// of a copy or move. A file destination ending in `/` names a folder and gets
/// the source file name appended. Identical resolved paths are rejected.
pub(crate) fn copy_move_paths(
    call: &Call,
    root: &RootResolver,
    slot: &str,
    is_folder: bool,
) -> Result<CopyMovePaths> {
    let src = path_value(call, slot)?;
    let dest = destination(call, slot)?;

    let dest = if !is_folder && dest.ends_with('/') {
        let name = file_name(src)
            .ok_or_else(|| SlotIoError::invalid(slot, format!("source '{src}' has no file name")))?;
        format!("{dest}{name}")
    } else {
        dest.to_string()
    };

    let source = collapse_dots(&root.resolve(src)?);
    let destination = collapse_dots(&root.resolve(&dest)?);
    if source == destination {
        return Err(SlotIoError::invalid(
            slot,
            format!("cannot {} using the same source and destination path '{src}'", verb_of(slot)),
        ));
    }
    Ok(CopyMovePaths { source, destination })
}

fn verb_of(slot: &str) -> &str {
    slot.rsplit('.').next().unwrap_or(slot)
}
