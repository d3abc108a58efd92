//! Request line parsing for the dispatch loop.

use fresco_daemon_types::OperationRequest;

use super::errors::DispatchError;

/// Parses a JSONL line into an operation request.
///
/// Trailing whitespace (including the line delimiter) is trimmed before
/// parsing. An empty line, invalid JSON, or a blank operation name is a
/// malformed request.
pub(crate) fn parse_request(line: &[u8]) -> Result<OperationRequest, DispatchError> {
    let trimmed = trim_trailing_whitespace(line);
    if trimmed.is_empty() {
        return Err(DispatchError::malformed("empty request line"));
    }

    let request: OperationRequest =
        serde_json::from_slice(trimmed).map_err(DispatchError::from_json_error)?;
    if request.name().is_empty() {
        return Err(DispatchError::malformed("operation name is empty"));
    }
    Ok(request)
}

/// Trims trailing ASCII whitespace from a byte slice.
fn trim_trailing_whitespace(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|byte| !byte.is_ascii_whitespace())
        .map_or(0, |pos| pos + 1);
    &bytes[..end]
}
