//! Connection handler that dispatches JSONL operation requests.
//!
//! Each connection carries exactly one request. The handler reads a bounded
//! request line, wraps the stream in the request's response slot, and routes
//! the parsed request. Every early-exit path below delivers through the slot,
//! and a final check guarantees the slot is never left unset.

use std::io::{self, Read};
use std::sync::Arc;

use tracing::{debug, warn};

use fresco_daemon_types::{ErrorCode, OperationReply};
use fresco_platform::Capabilities;

use super::DISPATCH_TARGET;
use super::errors::DispatchError;
use super::request::parse_request;
use super::response::ResponseSlot;
use super::router::OperationRouter;
use crate::shutdown::{InFlightGauge, ShutdownToken};
use crate::transport::{ConnectionHandler, ConnectionStream};

/// Maximum size of a single request line in bytes.
///
/// Byte payloads travel base64-encoded inside the line, so the bound covers
/// roughly a 24 MiB image.
pub(crate) const MAX_REQUEST_BYTES: usize = 32 * 1024 * 1024;

/// Connection handler that parses and dispatches operation requests.
pub(crate) struct DispatchConnectionHandler {
    router: OperationRouter,
    gauge: InFlightGauge,
}

impl DispatchConnectionHandler {
    /// Creates a handler serving the resolved capability bundle.
    pub(crate) fn new(
        capabilities: Capabilities,
        album_name: String,
        shutdown: ShutdownToken,
        gauge: InFlightGauge,
    ) -> Self {
        Self {
            router: OperationRouter::new(capabilities, album_name, shutdown),
            gauge,
        }
    }

    fn dispatch(&self, mut stream: ConnectionStream) {
        let _in_flight = self.gauge.enter();

        let request_bytes = match read_request_line(&mut stream) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(target: DISPATCH_TARGET, "client disconnected without request");
                return;
            }
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %error, "failed to read request");
                ResponseSlot::new(stream).deliver(&error.to_reply());
                return;
            }
        };

        let slot = Arc::new(ResponseSlot::new(stream));

        let request = match parse_request(&request_bytes) {
            Ok(request) => request,
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %error, "malformed request");
                slot.deliver(&error.to_reply());
                return;
            }
        };

        self.router.dispatch(&request, &slot);

        // Belt over braces: no handler path should get here without having
        // delivered, but the sentinel must never end a request unset.
        if !slot.is_delivered() {
            warn!(
                target: DISPATCH_TARGET,
                operation = request.name(),
                "handler produced no reply"
            );
            slot.deliver(&OperationReply::failure(
                ErrorCode::UnexpectedError,
                "no reply produced for request",
            ));
        }
    }
}

impl ConnectionHandler for DispatchConnectionHandler {
    fn handle(&self, stream: ConnectionStream) {
        self.dispatch(stream);
    }
}

/// Reads a bounded JSONL request line from the stream.
///
/// Returns `Ok(None)` if the client disconnects without sending data, and
/// `Ok(Some(bytes))` for a complete line or EOF with partial data.
fn read_request_line(stream: &mut ConnectionStream) -> Result<Option<Vec<u8>>, DispatchError> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 8192];

    loop {
        let bytes_read = read_with_retry(stream, &mut chunk)?;

        if bytes_read == 0 {
            return Ok(if buffer.is_empty() {
                None
            } else {
                Some(buffer)
            });
        }

        if let Some(newline_pos) = chunk[..bytes_read].iter().position(|byte| *byte == b'\n') {
            buffer.extend_from_slice(&chunk[..=newline_pos]);
            enforce_limit(buffer.len())?;
            return Ok(Some(buffer));
        }

        buffer.extend_from_slice(&chunk[..bytes_read]);
        enforce_limit(buffer.len())?;
    }
}

/// Reads from the stream, retrying on interrupts.
fn read_with_retry(stream: &mut ConnectionStream, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match stream.read(buf) {
            Ok(read) => return Ok(read),
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error),
        }
    }
}

fn enforce_limit(size: usize) -> Result<(), DispatchError> {
    if size > MAX_REQUEST_BYTES {
        return Err(DispatchError::request_too_large(size, MAX_REQUEST_BYTES));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;
    use std::net::{TcpListener, TcpStream};
    use std::thread;

    use super::*;

    fn stream_pair() -> (TcpStream, ConnectionStream) {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind listener");
        let addr = listener.local_addr().expect("listener address");
        let client = TcpStream::connect(addr).expect("connect client");
        let (server, _) = listener.accept().expect("accept connection");
        (client, ConnectionStream::Tcp(server))
    }

    #[test]
    fn reads_one_line_and_stops_at_the_delimiter() {
        let (mut client, mut server) = stream_pair();
        client
            .write_all(b"{\"operation\":\"isSupported\"}\nleftover")
            .expect("write request");

        let line = read_request_line(&mut server)
            .expect("read should succeed")
            .expect("line should be present");
        assert_eq!(line, b"{\"operation\":\"isSupported\"}\n");
    }

    #[test]
    fn reports_disconnect_without_data_as_none() {
        let (client, mut server) = stream_pair();
        drop(client);
        let line = read_request_line(&mut server).expect("read should succeed");
        assert!(line.is_none());
    }

    #[test]
    fn accepts_partial_line_at_eof() {
        let (mut client, mut server) = stream_pair();
        client.write_all(b"{\"operation\"").expect("write partial");
        drop(client);

        let line = read_request_line(&mut server)
            .expect("read should succeed")
            .expect("partial data should surface");
        assert_eq!(line, b"{\"operation\"");
    }

    #[test]
    fn oversized_requests_are_rejected() {
        let (client, mut server) = stream_pair();
        let writer = thread::spawn(move || {
            let mut client = client;
            let chunk = vec![b'a'; 1024 * 1024];
            // Stop once the reader bails out and the pipe breaks.
            for _ in 0..64 {
                if client.write_all(&chunk).is_err() {
                    break;
                }
            }
        });

        let result = read_request_line(&mut server);
        assert!(matches!(
            result,
            Err(DispatchError::RequestTooLarge { .. })
        ));
        drop(server);
        writer.join().expect("writer thread");
    }
}
