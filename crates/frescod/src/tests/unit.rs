//! Unit tests for the dispatch core and bootstrap wiring.

use std::sync::Arc;
use std::thread;

use rstest::rstest;

use fresco_config::{Config, ConfigError};
use fresco_daemon_types::{ErrorCode, OperationReply, OperationRequest};

use crate::bootstrap::{BootstrapError, ConfigLoader, StaticConfigLoader, bootstrap_with};
use crate::dispatch::{OperationRouter, ResponseSlot};
use crate::shutdown::ShutdownToken;

use super::support::{
    CountingCodec, RecordingReporter, RecordingStation, SharedBuffer, capabilities_with,
};

#[test]
fn response_slot_admits_exactly_one_of_many_racing_deliveries() {
    let buffer = SharedBuffer::new();
    let slot = Arc::new(ResponseSlot::new(buffer.clone()));

    let workers: Vec<_> = (0..16)
        .map(|index| {
            let slot = Arc::clone(&slot);
            thread::spawn(move || {
                let reply = if index % 2 == 0 {
                    OperationReply::success(true)
                } else {
                    OperationReply::failure(ErrorCode::UnexpectedError, format!("loser {index}"))
                };
                usize::from(slot.deliver(&reply))
            })
        })
        .collect();

    let winners: usize = workers
        .into_iter()
        .map(|worker| worker.join().expect("delivery thread"))
        .sum();

    assert_eq!(winners, 1, "exactly one delivery may win the slot");
    let written = buffer.text();
    assert_eq!(written.lines().count(), 1, "exactly one reply line written");
    assert!(slot.is_delivered());
}

fn sync_dispatch(request: &OperationRequest) -> (OperationReply, SharedBuffer) {
    let scratch = tempfile::tempdir().expect("create tempdir");
    let router = OperationRouter::new(
        capabilities_with(
            CountingCodec::new(),
            RecordingStation::desktop(),
            scratch.path(),
        ),
        "Fresco".to_owned(),
        ShutdownToken::new(),
    );

    let buffer = SharedBuffer::new();
    let slot = Arc::new(ResponseSlot::new(buffer.clone()));
    router.dispatch(request, &slot);
    assert!(slot.is_delivered(), "every dispatch must deliver");

    let line = buffer.text();
    let reply = serde_json::from_str(line.trim()).expect("reply should parse");
    (reply, buffer)
}

#[test]
fn is_supported_answers_synchronously_from_the_station() {
    let (reply, _buffer) = sync_dispatch(&OperationRequest::new("isSupported"));
    assert_eq!(reply, OperationReply::success(true));
}

#[test]
fn platform_version_reports_the_host_description() {
    let (reply, _buffer) = sync_dispatch(&OperationRequest::new("getPlatformVersion"));
    let OperationReply::Success { value } = reply else {
        panic!("platform version should succeed");
    };
    let text = value.as_str().expect("description should be text");
    assert!(text.contains(std::env::consts::OS));
}

#[rstest]
#[case("frobnicate")]
#[case("issupported")]
#[case("daemon/stop")]
fn unknown_operations_get_the_not_implemented_sentinel(#[case] name: &str) {
    let (reply, _buffer) = sync_dispatch(&OperationRequest::new(name));
    assert_eq!(reply, OperationReply::not_implemented(name));
    assert_eq!(reply.code(), None, "not_implemented is not a failure");
}

struct FailingLoader;

impl ConfigLoader for FailingLoader {
    fn load(&self) -> Result<Config, ConfigError> {
        Err(ConfigError::EmptyAlbum)
    }
}

#[test]
fn bootstrap_reports_success_events_in_order() {
    let reporter = RecordingReporter::new();
    let daemon = bootstrap_with(
        &StaticConfigLoader::new(Config::default()),
        reporter.clone(),
    )
    .expect("bootstrap should succeed");

    assert_eq!(
        reporter.events(),
        vec!["bootstrap_starting", "bootstrap_succeeded"]
    );
    assert!(daemon.capabilities().station().supports_wallpaper());
}

#[test]
fn bootstrap_reports_configuration_failures() {
    let reporter = RecordingReporter::new();
    let error = bootstrap_with(&FailingLoader, reporter.clone())
        .expect_err("failing loader should fail bootstrap");

    assert!(matches!(error, BootstrapError::Configuration { .. }));
    let events = reporter.events();
    assert_eq!(events.first().map(String::as_str), Some("bootstrap_starting"));
    assert!(
        events
            .iter()
            .any(|event| event.starts_with("bootstrap_failed"))
    );
}
