//! Listener lifecycle and daemon run-loop behaviour.

use std::io::{BufRead, BufReader, Write};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use fresco_config::{Config, SocketEndpoint};
use fresco_daemon_types::OperationReply;

use crate::bootstrap::StaticConfigLoader;
use crate::process::run_daemon_with;
use crate::shutdown::ShutdownToken;
use crate::transport::SocketListener;

use super::support::{
    CountingCodec, RecordingReporter, RecordingStation, capabilities_with, handler_for,
};

fn wait_for<F: Fn() -> bool>(what: &str, condition: F) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(10));
    }
}

#[cfg(unix)]
#[test]
fn unix_listener_serves_requests_and_cleans_up_its_socket() {
    let scratch = tempfile::tempdir().expect("create tempdir");
    let socket_path = scratch.path().join("frescod.sock");
    let Some(socket_text) = socket_path.to_str() else {
        panic!("tempdir paths should be UTF-8");
    };
    let endpoint = SocketEndpoint::unix(socket_text);

    let gallery_root = scratch.path().join("pictures");
    let handler = handler_for(capabilities_with(
        CountingCodec::new(),
        RecordingStation::desktop(),
        &gallery_root,
    ));

    let listener = SocketListener::bind(&endpoint).expect("bind unix listener");
    let handle = listener.start(handler).expect("start listener");

    let mut client =
        std::os::unix::net::UnixStream::connect(&socket_path).expect("connect client");
    client
        .write_all(b"{\"operation\":\"isSupported\"}\n")
        .expect("write request");

    let mut reply = String::new();
    BufReader::new(&mut client)
        .read_line(&mut reply)
        .expect("read reply");
    let parsed: OperationReply = serde_json::from_str(reply.trim()).expect("reply should parse");
    assert_eq!(parsed, OperationReply::success(true));
    drop(client);

    handle.shutdown();
    handle.join().expect("join listener");
    assert!(
        !socket_path.exists(),
        "socket file must be removed on shutdown"
    );
}

#[cfg(unix)]
#[test]
fn stale_socket_files_are_replaced_on_bind() {
    let scratch = tempfile::tempdir().expect("create tempdir");
    let socket_path = scratch.path().join("stale.sock");

    // A dead daemon leaves its socket file behind.
    let abandoned = std::os::unix::net::UnixListener::bind(&socket_path).expect("bind first");
    drop(abandoned);
    assert!(socket_path.exists(), "stale socket file should remain");

    let Some(socket_text) = socket_path.to_str() else {
        panic!("tempdir paths should be UTF-8");
    };
    let endpoint = SocketEndpoint::unix(socket_text);
    let listener = SocketListener::bind(&endpoint);
    assert!(listener.is_ok(), "stale socket should be reclaimed");
}

#[test]
fn tcp_listener_round_trips_requests() {
    let scratch = tempfile::tempdir().expect("create tempdir");
    let handler = handler_for(capabilities_with(
        CountingCodec::new(),
        RecordingStation::desktop(),
        scratch.path(),
    ));

    let listener =
        SocketListener::bind(&SocketEndpoint::tcp("127.0.0.1", 0)).expect("bind tcp listener");
    let addr = listener.local_addr().expect("ephemeral port");
    let handle = listener.start(handler).expect("start listener");

    let mut client = std::net::TcpStream::connect(addr).expect("connect client");
    client
        .write_all(b"{\"operation\":\"getPlatformVersion\"}\n")
        .expect("write request");

    let mut reply = String::new();
    BufReader::new(&mut client)
        .read_line(&mut reply)
        .expect("read reply");
    assert!(reply.contains("\"kind\":\"success\""));

    handle.shutdown();
    handle.join().expect("join listener");
}

#[test]
fn run_daemon_with_serves_until_the_token_trips() {
    let scratch = tempfile::tempdir().expect("create tempdir");
    let Some(socket_text) = scratch.path().join("rund.sock").to_str().map(str::to_owned) else {
        panic!("tempdir paths should be UTF-8");
    };
    let endpoint: SocketEndpoint = if cfg!(unix) {
        SocketEndpoint::unix(socket_text)
    } else {
        SocketEndpoint::tcp("127.0.0.1", 0)
    };

    let config = Config {
        daemon_socket: endpoint,
        ..Config::default()
    };
    let loader = StaticConfigLoader::new(config);
    let reporter = RecordingReporter::new();
    let token = ShutdownToken::new();

    let daemon_reporter = reporter.clone();
    let daemon_token = token.clone();
    let daemon = thread::spawn(move || run_daemon_with(&loader, daemon_reporter, daemon_token));

    wait_for("listener to come up", || {
        reporter.events().iter().any(|event| event == "listener_active")
    });

    token.trip();
    let result = daemon.join().expect("daemon thread");
    assert!(result.is_ok(), "clean teardown expected: {result:?}");

    let events = reporter.events();
    assert!(events.iter().any(|event| event == "shutdown_starting"));
    assert!(
        events
            .iter()
            .any(|event| event.starts_with("shutdown_complete")),
        "teardown must report completion: {events:?}"
    );
}
