//! Reply parsing, rendering, and exit-code mapping.

use std::io::{BufRead, BufReader, Read, Write};

use serde_json::Value;

use fresco_daemon_types::OperationReply;

use crate::cli::OutputFormat;
use crate::errors::AppError;

/// Reads the single terminal reply line from the daemon connection.
pub(crate) fn read_reply<R: Read>(connection: &mut R) -> Result<OperationReply, AppError> {
    let mut reader = BufReader::new(connection);
    let mut line = String::new();
    loop {
        line.clear();
        let read = reader.read_line(&mut line).map_err(AppError::ReadReply)?;
        if read == 0 {
            return Err(AppError::MissingReply);
        }
        if !line.trim().is_empty() {
            break;
        }
    }
    serde_json::from_str(line.trim()).map_err(AppError::ParseReply)
}

/// Renders the reply in the selected format.
pub(crate) fn render(
    reply: &OperationReply,
    format: OutputFormat,
    writer: &mut impl Write,
) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => {
            let line = serde_json::to_string(reply).map_err(AppError::SerialiseReply)?;
            writeln!(writer, "{line}").map_err(AppError::Render)
        }
        OutputFormat::Human => render_human(reply, writer).map_err(AppError::Render),
    }
}

fn render_human(reply: &OperationReply, writer: &mut impl Write) -> std::io::Result<()> {
    match reply {
        OperationReply::Success { value } => match value {
            Value::String(text) => writeln!(writer, "{text}"),
            other => writeln!(writer, "{other}"),
        },
        OperationReply::Failure {
            code,
            message,
            details,
        } => {
            writeln!(writer, "error [{code}]: {message}")?;
            if let Some(details) = details {
                writeln!(writer, "  details: {details}")?;
            }
            Ok(())
        }
        OperationReply::NotImplemented { operation } => {
            writeln!(writer, "not implemented: {operation}")
        }
    }
}

/// Exit code for one reply kind.
pub(crate) fn exit_code(reply: &OperationReply) -> u8 {
    match reply {
        OperationReply::Success { .. } => 0,
        OperationReply::Failure { .. } => 1,
        OperationReply::NotImplemented { .. } => 3,
    }
}
