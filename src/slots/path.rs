//! Slots that only inspect paths.

use crate::errors::Result;
use crate::resolve;

use super::args::path_value;
use super::{Call, Dispatcher, Outcome};

pub(super) fn root_folder(d: &Dispatcher) -> Result<Outcome> {
    Ok(Outcome::value(d.root().root_folder()))
}

pub(super) fn get_folder(call: &Call) -> Result<Outcome> {
    let path = path_value(call, "path.get-folder")?;
    Ok(Outcome::value(resolve::get_folder(path)))
}
