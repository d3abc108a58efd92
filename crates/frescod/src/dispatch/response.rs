//! Reply serialization and the response-once sentinel.

use std::io::Write;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use fresco_daemon_types::OperationReply;

use super::DISPATCH_TARGET;
use super::errors::DispatchError;

/// Writer that serializes replies as JSONL lines.
pub(crate) struct ReplyWriter<W> {
    writer: W,
}

impl<W: Write> ReplyWriter<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes one reply line and flushes.
    pub(crate) fn write_reply(&mut self, reply: &OperationReply) -> Result<(), DispatchError> {
        serde_json::to_writer(&mut self.writer, reply)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Single-use delivery slot for one request's terminal reply.
///
/// The slot is the request's response sentinel: the `delivered` flag
/// transitions unset → set exactly once, and only the path that wins the
/// test-and-set writes to the connection. Losing paths are logged and
/// dropped. Write failures still consume the slot — the client may be gone,
/// but the request is terminally answered either way.
pub(crate) struct ResponseSlot<W> {
    delivered: AtomicBool,
    writer: Mutex<ReplyWriter<W>>,
}

impl<W: Write> ResponseSlot<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self {
            delivered: AtomicBool::new(false),
            writer: Mutex::new(ReplyWriter::new(writer)),
        }
    }

    /// Attempts to deliver `reply`; returns whether this call won the slot.
    pub(crate) fn deliver(&self, reply: &OperationReply) -> bool {
        if self
            .delivered
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!(
                target: DISPATCH_TARGET,
                reply = ?reply,
                "suppressed duplicate reply"
            );
            return false;
        }

        match self.writer.lock() {
            Ok(mut writer) => {
                if let Err(error) = writer.write_reply(reply) {
                    warn!(
                        target: DISPATCH_TARGET,
                        error = %error,
                        "failed to write reply to client"
                    );
                }
            }
            Err(_poisoned) => {
                warn!(
                    target: DISPATCH_TARGET,
                    "reply writer poisoned; dropping reply"
                );
            }
        }
        true
    }

    /// Whether a reply has been delivered (or at least claimed).
    pub(crate) fn is_delivered(&self) -> bool {
        self.delivered.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use fresco_daemon_types::ErrorCode;

    use super::*;

    #[test]
    fn writes_kind_tagged_jsonl_line() {
        let mut buffer = Vec::new();
        ReplyWriter::new(&mut buffer)
            .write_reply(&OperationReply::success(true))
            .expect("write reply");
        let text = String::from_utf8(buffer).expect("utf8 reply");
        assert_eq!(text, "{\"kind\":\"success\",\"value\":true}\n");
    }

    #[test]
    fn slot_accepts_only_the_first_reply() {
        let slot = ResponseSlot::new(Vec::new());
        assert!(slot.deliver(&OperationReply::success(true)));
        assert!(!slot.deliver(&OperationReply::failure(
            ErrorCode::UnexpectedError,
            "too late"
        )));
        assert!(slot.is_delivered());
    }
}
