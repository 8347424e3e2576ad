//! Subcommand implementations. Each module owns one CLI verb and reports
//! failure by returning `anyhow::Result`; [`run_cli`] centralizes the
//! error-to-exit-code mapping so every verb exits the same way on failure.

pub mod index;
pub mod index_show;
pub mod start;

use std::process::ExitCode;

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Run `f`, logging and converting any error into the process's exit code.
pub fn run_cli<F: FnOnce() -> anyhow::Result<()>>(f: F) -> ExitCode {
    match f() {
        Ok(()) => ExitCode::from(EXIT_OK),
        Err(err) => {
            log::error!("{:#}", err);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
