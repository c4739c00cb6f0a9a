//! `file.*` handlers.

use std::path::Path;
use tracing::debug;

use crate::errors::{Result, SlotIoError};
use crate::node::Value;

use super::args::{copy_move_paths, first_positional, flag, path_value, path_value_or};
use super::{Call, Dispatcher, Outcome};

enum Content<'a> {
    Text(&'a str),
    Binary(&'a [u8]),
}

fn write(d: &Dispatcher, path: &str, content: Content<'_>) -> Result<()> {
    let svc = &d.services().file;
    match content {
        Content::Text(s) => svc.save(Path::new(path), s),
        Content::Binary(b) => svc.save_binary(Path::new(path), b),
    }
}

async fn write_async(d: &Dispatcher, path: &str, content: Content<'_>) -> Result<()> {
    let svc = &d.services().file;
    match content {
        Content::Text(s) => svc.save_async(Path::new(path), s).await,
        Content::Binary(b) => svc.save_binary_async(Path::new(path), b).await,
    }
}

/// Path (call value) and content (first positional child) of a save.
fn save_args<'a>(d: &Dispatcher, call: &'a Call, binary: bool) -> Result<(String, Content<'a>)> {
    let slot = if binary { "file.save.binary" } else { "file.save" };
    let path = d.root().resolve(path_value(call, slot)?)?;
    let content = match first_positional(call).and_then(|n| n.value.as_ref()) {
        Some(Value::Str(s)) => Content::Text(s),
        Some(Value::Bytes(b)) if binary => Content::Binary(b),
        Some(other) => {
            return Err(SlotIoError::TypeMismatch {
                slot: slot.to_string(),
                found: other.type_name(),
            });
        }
        None => return Err(SlotIoError::invalid(slot, "No content provided")),
    };
    Ok((path, content))
}

pub(super) fn save(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let (path, content) = save_args(d, call, false)?;
    write(d, &path, content)?;
    Ok(Outcome::empty())
}

pub(super) fn save_binary(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let (path, content) = save_args(d, call, true)?;
    write(d, &path, content)?;
    Ok(Outcome::empty())
}

pub(super) fn load(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let path = d.root().resolve(path_value(call, "file.load")?)?;
    let text = d.services().file.load(Path::new(&path))?;
    Ok(Outcome::value(text))
}

pub(super) fn load_binary(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let path = d.root().resolve(path_value(call, "file.load.binary")?)?;
    let bytes = d.services().file.load_binary(Path::new(&path))?;
    Ok(Outcome::value(bytes))
}

/// Remove an existing destination once the source is known to be there.
fn clear_destination(d: &Dispatcher, src: &Path, dst: &Path) -> Result<()> {
    if !d.services().file.exists(src) {
        return Err(SlotIoError::NotFound(src.to_path_buf()));
    }
    if d.services().file.exists(dst) {
        debug!(dst = %dst.display(), "removing existing destination before transfer");
        d.services().file.delete(dst)?;
    }
    Ok(())
}

pub(super) fn copy(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let paths = copy_move_paths(call, d.root(), "file.copy", false)?;
    let dst = Path::new(&paths.destination);
    clear_destination(d, Path::new(&paths.source), dst)?;
    d.services().file.copy(Path::new(&paths.source), dst)?;
    Ok(Outcome::empty())
}

pub(super) fn move_to(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let paths = copy_move_paths(call, d.root(), "file.move", false)?;
    let dst = Path::new(&paths.destination);
    clear_destination(d, Path::new(&paths.source), dst)?;
    d.services().file.move_to(Path::new(&paths.source), dst)?;
    Ok(Outcome::empty())
}

pub(super) fn delete(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let path = d.root().resolve(path_value(call, "file.delete")?)?;
    d.services().file.delete(Path::new(&path))?;
    Ok(Outcome::empty())
}

pub(super) fn exists(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let path = d.root().resolve(path_value(call, "file.exists")?)?;
    Ok(Outcome::value(d.services().file.exists(Path::new(&path))))
}

fn list_slot(recursive: bool) -> &'static str {
    if recursive { "file.list-recursively" } else { "file.list" }
}

pub(super) fn list(d: &Dispatcher, call: &Call, recursive: bool) -> Result<Outcome> {
    let slot = list_slot(recursive);
    let folder = d.root().resolve(path_value_or(call, slot, "/")?)?;
    let show_hidden = flag(call, slot, "display-hidden", false)?;
    let svc = &d.services().file;
    let files = if recursive {
        svc.list_files_recursively(Path::new(&folder))?
    } else {
        svc.list_files(Path::new(&folder))?
    };
    Ok(d.listing(files, show_hidden, false))
}

pub(super) async fn save_async(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let (path, content) = save_args(d, call, false)?;
    write_async(d, &path, content).await?;
    Ok(Outcome::empty())
}

pub(super) async fn save_binary_async(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let (path, content) = save_args(d, call, true)?;
    write_async(d, &path, content).await?;
    Ok(Outcome::empty())
}

pub(super) async fn load_async(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let path = d.root().resolve(path_value(call, "file.load")?)?;
    let text = d.services().file.load_async(Path::new(&path)).await?;
    Ok(Outcome::value(text))
}

pub(super) async fn load_binary_async(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let path = d.root().resolve(path_value(call, "file.load.binary")?)?;
    let bytes = d.services().file.load_binary_async(Path::new(&path)).await?;
    Ok(Outcome::value(bytes))
}

async fn clear_destination_async(d: &Dispatcher, src: &Path, dst: &Path) -> Result<()> {
    if !d.services().file.exists_async(src).await {
        return Err(SlotIoError::NotFound(src.to_path_buf()));
    }
    if d.services().file.exists_async(dst).await {
        debug!(dst = %dst.display(), "removing existing destination before transfer");
        d.services().file.delete_async(dst).await?;
    }
    Ok(())
}

pub(super) async fn copy_async(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let paths = copy_move_paths(call, d.root(), "file.copy", false)?;
    let dst = Path::new(&paths.destination);
    clear_destination_async(d, Path::new(&paths.source), dst).await?;
    d.services()
        .file
        .copy_async(Path::new(&paths.source), dst)
        .await?;
    Ok(Outcome::empty())
}

pub(super) async fn move_to_async(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let paths = copy_move_paths(call, d.root(), "file.move", false)?;
    let dst = Path::new(&paths.destination);
    clear_destination_async(d, Path::new(&paths.source), dst).await?;
    d.services()
        .file
        .move_to_async(Path::new(&paths.source), dst)
        .await?;
    Ok(Outcome::empty())
}

pub(super) async fn delete_async(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let path = d.root().resolve(path_value(call, "file.delete")?)?;
    d.services().file.delete_async(Path::new(&path)).await?;
    Ok(Outcome::empty())
}

pub(super) async fn exists_async(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let path = d.root().resolve(path_value(call, "file.exists")?)?;
    Ok(Outcome::value(
        d.services().file.exists_async(Path::new(&path)).await,
    ))
}

pub(super) async fn list_async(d: &Dispatcher, call: &Call, recursive: bool) -> Result<Outcome> {
    let slot = list_slot(recursive);
    let folder = d.root().resolve(path_value_or(call, slot, "/")?)?;
    let show_hidden = flag(call, slot, "display-hidden", false)?;
    let svc = &d.services().file;
    let files = if recursive {
        svc.list_files_recursively_async(Path::new(&folder)).await?
    } else {
        svc.list_files_async(Path::new(&folder)).await?
    };
    Ok(d.listing(files, show_hidden, false))
}
