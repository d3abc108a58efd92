//! Daemon entrypoint for the Fresco plugin host.

use std::process::ExitCode;

fn main() -> ExitCode {
    match frescod::run_daemon() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            // Telemetry may not be installed when bootstrap itself failed.
            eprintln!("frescod: {error}");
            ExitCode::FAILURE
        }
    }
}
