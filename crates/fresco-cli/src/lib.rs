//! Client for the Fresco wallpaper plugin host.
//!
//! The CLI builds one operation request from its subcommand, connects to the
//! configured daemon socket, sends the request as a JSONL line, and renders
//! the single terminal reply. Exit codes mirror the reply kinds: `0` for
//! success, `1` for a structured failure, `3` for `not_implemented`, and `2`
//! for usage or transport problems on the client side.

mod cli;
mod errors;
mod output;
mod requests;
mod transport;


use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;

use fresco_config::Config;

use crate::cli::Cli;
use crate::errors::{AppError, is_daemon_not_running};

/// Exit code for client-side errors (usage, transport, malformed replies).
const APP_ERROR_CODE: u8 = 2;

/// Runs the CLI against the given argument list and output streams.
pub fn run<I, T>(args: I, stdout: &mut impl Write, stderr: &mut impl Write) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    ExitCode::from(run_code(args, stdout, stderr))
}

/// [`run`] with a plain numeric exit code, which tests can assert on.
fn run_code<I, T>(args: I, stdout: &mut impl Write, stderr: &mut impl Write) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match execute(args, stdout) {
        Ok(code) => code,
        Err(AppError::CliUsage(error))
            if matches!(
                error.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) =>
        {
            let _ = write!(stdout, "{error}");
            0
        }
        Err(error) => {
            let _ = writeln!(stderr, "fresco: {error}");
            if is_daemon_not_running(&error) {
                let _ = writeln!(stderr, "hint: is frescod running?");
            }
            APP_ERROR_CODE
        }
    }
}

fn execute<I, T>(args: I, stdout: &mut impl Write) -> Result<u8, AppError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args).map_err(AppError::CliUsage)?;

    let mut config = Config::load().map_err(AppError::LoadConfiguration)?;
    if let Some(socket) = &cli.socket {
        config.daemon_socket = socket
            .parse()
            .map_err(|source| AppError::InvalidSocket {
                value: socket.clone(),
                source,
            })?;
    }

    let request = requests::build(&cli.command)?;
    let line = serde_json::to_string(&request).map_err(AppError::SerialiseRequest)?;

    let mut connection = transport::connect(config.daemon_socket())?;
    connection
        .write_all(line.as_bytes())
        .map_err(AppError::SendRequest)?;
    connection.write_all(b"\n").map_err(AppError::SendRequest)?;
    connection.flush().map_err(AppError::SendRequest)?;

    let reply = output::read_reply(&mut connection)?;
    output::render(&reply, cli.output, stdout)?;
    Ok(output::exit_code(&reply))
}
