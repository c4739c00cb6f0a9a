//! `folder.*` handlers.

use std::path::Path;

use crate::errors::{Result, SlotIoError};
use crate::resolve::normalize;

use super::args::{CopyMovePaths, copy_move_paths, flag, path_value, path_value_or};
use super::{Call, Dispatcher, Outcome};

/// Copy/move paths, refusing a destination inside the source tree.
fn transfer_paths(d: &Dispatcher, call: &Call, slot: &str) -> Result<CopyMovePaths> {
    let paths = copy_move_paths(call, d.root(), slot, true)?;
    let src = format!("{}/", normalize(&paths.source));
    if normalize(&paths.destination).starts_with(&src) {
        return Err(SlotIoError::invalid(
            slot,
            format!("cannot place folder '{}' inside itself", d.root().relative_path(&paths.source)),
        ));
    }
    Ok(paths)
}

fn refuse_existing(d: &Dispatcher, dst: &str) -> SlotIoError {
    SlotIoError::Conflict(format!(
        "destination folder '{}' already exists",
        d.root().relative_path(dst)
    ))
}

pub(super) fn create(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let path = d.root().resolve(path_value(call, "folder.create")?)?;
    Ok(Outcome::value(d.services().folder.create(Path::new(&path))?))
}

pub(super) fn copy(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let paths = transfer_paths(d, call, "folder.copy")?;
    d.services()
        .folder
        .copy(Path::new(&paths.source), Path::new(&paths.destination))?;
    Ok(Outcome::empty())
}

pub(super) fn move_to(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let paths = transfer_paths(d, call, "folder.move")?;
    let svc = &d.services().folder;
    if svc.exists(Path::new(&paths.destination)) {
        return Err(refuse_existing(d, &paths.destination));
    }
    svc.move_to(Path::new(&paths.source), Path::new(&paths.destination))?;
    Ok(Outcome::empty())
}

pub(super) fn delete(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let path = d.root().resolve(path_value(call, "folder.delete")?)?;
    d.services().folder.delete(Path::new(&path))?;
    Ok(Outcome::empty())
}

pub(super) fn exists(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let path = d.root().resolve(path_value(call, "folder.exists")?)?;
    Ok(Outcome::value(d.services().folder.exists(Path::new(&path))))
}

fn list_slot(recursive: bool) -> &'static str {
    if recursive { "folder.list-recursively" } else { "folder.list" }
}

pub(super) fn list(d: &Dispatcher, call: &Call, recursive: bool) -> Result<Outcome> {
    let slot = list_slot(recursive);
    let folder = d.root().resolve(path_value_or(call, slot, "/")?)?;
    let show_hidden = flag(call, slot, "display-hidden", false)?;
    let svc = &d.services().folder;
    let folders = if recursive {
        svc.list_folders_recursively(Path::new(&folder))?
    } else {
        svc.list_folders(Path::new(&folder))?
    };
    Ok(d.listing(folders, show_hidden, true))
}

pub(super) async fn create_async(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let path = d.root().resolve(path_value(call, "folder.create")?)?;
    Ok(Outcome::value(
        d.services().folder.create_async(Path::new(&path)).await?,
    ))
}

pub(super) async fn copy_async(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let paths = transfer_paths(d, call, "folder.copy")?;
    d.services()
        .folder
        .copy_async(Path::new(&paths.source), Path::new(&paths.destination))
        .await?;
    Ok(Outcome::empty())
}

pub(super) async fn move_to_async(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let paths = transfer_paths(d, call, "folder.move")?;
    let svc = &d.services().folder;
    if svc.exists_async(Path::new(&paths.destination)).await {
        return Err(refuse_existing(d, &paths.destination));
    }
    svc.move_to_async(Path::new(&paths.source), Path::new(&paths.destination))
        .await?;
    Ok(Outcome::empty())
}

pub(super) async fn delete_async(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let path = d.root().resolve(path_value(call, "folder.delete")?)?;
    d.services().folder.delete_async(Path::new(&path)).await?;
    Ok(Outcome::empty())
}

pub(super) async fn exists_async(d: &Dispatcher, call: &Call) -> Result<Outcome> {
    let path = d.root().resolve(path_value(call, "folder.exists")?)?;
    Ok(Outcome::value(
        d.services().folder.exists_async(Path::new(&path)).await,
    ))
}

pub(super) async fn list_async(d: &Dispatcher, call: &Call, recursive: bool) -> Result<Outcome> {
    let slot = list_slot(recursive);
    let folder = d.root().resolve(path_value_or(call, slot, "/")?)?;
    let show_hidden = flag(call, slot, "display-hidden", false)?;
    let svc = &d.services().folder;
    let folders = if recursive {
        svc.list_folders_recursively_async(Path::new(&folder)).await?
    } else {
        svc.list_folders_async(Path::new(&folder)).await?
    };
    Ok(d.listing(folders, show_hidden, true))
}
