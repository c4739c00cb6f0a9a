use std::process::ExitCode;

use slot_io::SlotIoError;
use slot_io::cli;
use slot_io::output as out;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = cli::parse();
    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            let code = e.downcast_ref::<SlotIoError>().map_or(1, SlotIoError::code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
