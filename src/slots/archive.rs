//! `content.zip` and `file.unzip` handlers.

use std::path::{Path, PathBuf};

use crate::archive::{ZipEntry, extract, zip_entries};
use crate::errors::{Result, SlotIoError};
use crate::node::{Node, Value};
use crate::resolve::get_folder;
use crate::services::Stream;
use crate::services::helpers::join_error;

use super::args::named_str;
use super::{Call, Dispatcher, Outcome};

fn entry_from(node: &Node, slot: &str) -> Result<ZipEntry> {
    let name = match &node.value {
        Some(Value::Str(s)) => s.as_str(),
        Some(other) => {
            return Err(SlotIoError::TypeMismatch {
                slot: slot.to_string(),
                found: other.type_name(),
            });
        }
        None => return Err(SlotIoError::invalid(slot, "zip entry without a name")),
    };
    let content = match node.children.first().and_then(|c| c.value.as_ref()) {
        None => Vec::new(),
        Some(Value::Str(s)) => s.as_bytes().to_vec(),
        Some(Value::Bytes(b)) => b.clone(),
        Some(other) => {
            return Err(SlotIoError::TypeMismatch {
                slot: slot.to_string(),
                found: other.type_name(),
            });
        }
    };
    Ok(ZipEntry::new(name, content))
}

/// Zip the call's children into an in-memory stream and hand back its handle.
pub(super) fn zip(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let slot = call.verb.name();
    let entries = call
        .children
        .iter()
        .map(|n| entry_from(n, slot))
        .collect::<Result<Vec<_>>>()?;
    let bytes = zip_entries(&entries)?;
    let id = d.streams().insert(Stream::memory(bytes));
    Ok(Outcome::value(id))
}

enum Source {
    File(String),
    Stream(Stream),
}

/// Where to read the archive from and which existing folder to extract into.
fn unzip_args(d: &Dispatcher, call: &Call) -> Result<(Source, PathBuf)> {
    const SLOT: &str = "file.unzip";
    let folder = named_str(call, SLOT, "folder")?;
    match &call.value {
        Some(Value::Str(zip)) if !zip.trim().is_empty() => {
            let zip_path = d.root().resolve(zip)?;
            let dest = match folder {
                Some(f) => d.root().resolve(f)?,
                None => d.root().resolve(&get_folder(zip))?,
            };
            Ok((Source::File(zip_path), PathBuf::from(dest)))
        }
        Some(Value::Stream(id)) => {
            let Some(f) = folder else {
                return Err(SlotIoError::invalid(SLOT, "[folder] is required when unzipping a stream"));
            };
            let dest = d.root().resolve(f)?;
            if !d.services().folder.exists(Path::new(&dest)) {
                return Err(SlotIoError::NotFound(PathBuf::from(dest)));
            }
            let stream = d.streams().take(*id)?;
            Ok((Source::Stream(stream), PathBuf::from(dest)))
        }
        Some(Value::Str(_)) | None => Err(SlotIoError::invalid(SLOT, "No zip file provided")),
        Some(other) => Err(SlotIoError::TypeMismatch {
            slot: SLOT.to_string(),
            found: other.type_name(),
        }),
    }
}

fn written_outcome(d: &Dispatcher, written: Vec<PathBuf>) -> Outcome {
    Outcome::list(written.iter().map(|p| d.relative(p)))
}

pub(super) fn unzip(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let (source, dest) = unzip_args(d, call)?;
    let svc = &d.services().stream;
    let written = match source {
        Source::File(zip) => {
            let stream = svc.open_file(Path::new(&zip))?;
            extract(stream, &dest, svc.as_ref())?
        }
        Source::Stream(stream) => extract(stream, &dest, svc.as_ref())?,
    };
    Ok(written_outcome(d, written))
}

pub(super) async fn unzip_async(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let (source, dest) = unzip_args(d, call)?;
    let svc = d.services().stream.clone();
    let stream = match source {
        Source::File(zip) => svc.open_file_async(Path::new(&zip)).await?,
        Source::Stream(stream) => stream,
    };
    let written = tokio::task::spawn_blocking(move || extract(stream, &dest, svc.as_ref()))
        .await
        .map_err(|e| join_error("unzip", e))??;
    Ok(written_outcome(d, written))
}
