//! `stream.*` handlers. Hosts only ever see handles; the streams themselves
//! stay in the dispatcher's registry.

use std::path::Path;
use tracing::info;

use crate::errors::{Result, SlotIoError};
use crate::node::StreamId;
use crate::services::helpers::join_error;

use super::args::{first_positional, flag, path_value, stream_handle};
use super::{Call, Dispatcher, Outcome};

fn read_error(handle: StreamId) -> impl FnOnce(std::io::Error) -> SlotIoError {
    move |e| SlotIoError::Io {
        context: format!("read stream {handle}: {e}"),
        source: e,
    }
}

pub(super) fn open_file(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let path = d.root().resolve(path_value(call, "stream.open-file")?)?;
    let stream = d.services().stream.open_file(Path::new(&path))?;
    let id = d.streams().insert(stream);
    info!(stream = %id, path = %path, "Opened file stream");
    Ok(Outcome::value(id))
}

struct SaveArgs {
    path: String,
    overwrite: bool,
    handle: StreamId,
}

fn save_args(d: &Dispatcher, call: &Call) -> Result<SaveArgs> {
    const SLOT: &str = "stream.save-file";
    let path = d.root().resolve(path_value(call, SLOT)?)?;
    let overwrite = flag(call, SLOT, "overwrite", true)?;
    let handle = stream_handle(first_positional(call).and_then(|n| n.value.as_ref()), SLOT)?;
    if !overwrite && d.services().stream.exists(Path::new(&path)) {
        // Checked before the stream leaves the registry so the host keeps it.
        return Err(SlotIoError::Conflict(format!(
            "file '{}' already exists and overwrite was not requested",
            d.root().relative_path(&path)
        )));
    }
    Ok(SaveArgs { path, overwrite, handle })
}

pub(super) fn save_file(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let args = save_args(d, call)?;
    let mut stream = d.streams().take(args.handle)?;
    let bytes = d
        .services()
        .stream
        .save_file(&mut stream, Path::new(&args.path), args.overwrite)?;
    Ok(Outcome::value(bytes as i64))
}

pub(super) fn read(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let handle = stream_handle(call.value.as_ref(), "stream.read")?;
    let bytes = d
        .streams()
        .with_stream(handle, |s| s.read_remaining().map_err(read_error(handle)))?;
    Ok(Outcome::value(bytes))
}

pub(super) fn close(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let handle = stream_handle(call.value.as_ref(), "stream.close")?;
    drop(d.streams().take(handle)?);
    info!(stream = %handle, "Closed stream");
    Ok(Outcome::empty())
}

pub(super) async fn open_file_async(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let path = d.root().resolve(path_value(call, "stream.open-file")?)?;
    let stream = d.services().stream.open_file_async(Path::new(&path)).await?;
    let id = d.streams().insert(stream);
    info!(stream = %id, path = %path, "Opened file stream");
    Ok(Outcome::value(id))
}

pub(super) async fn save_file_async(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let args = save_args(d, call)?;
    let stream = d.streams().take(args.handle)?;
    let bytes = d
        .services()
        .stream
        .save_file_async(stream, Path::new(&args.path), args.overwrite)
        .await?;
    Ok(Outcome::value(bytes as i64))
}

/// Reads off the runtime thread; the stream is parked back under the same
/// handle afterwards, even when the read fails.
pub(super) async fn read_async(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let handle = stream_handle(call.value.as_ref(), "stream.read")?;
    let mut stream = d.streams().take(handle)?;
    let (stream, read) = tokio::task::spawn_blocking(move || {
        let read = stream.read_remaining();
        (stream, read)
    })
    .await
    .map_err(|e| join_error("read stream", e))?;
    d.streams().restore(handle, stream);
    let bytes = read.map_err(read_error(handle))?;
    Ok(Outcome::value(bytes))
}
