//! Recording fakes and fixtures shared by the daemon test suites.

use std::io::{self, BufReader, Cursor, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use fresco_config::Config;
use fresco_daemon_types::OperationReply;
use fresco_platform::{
    Capabilities, CodecError, DecodedImage, ImageCodec, OpenPermissionGate, PicturesDirStore,
    PlatformProfile, StandardImageCodec, StationError, WallpaperStation,
};

use crate::bootstrap::BootstrapError;
use crate::dispatch::DispatchConnectionHandler;
use crate::health::HealthReporter;
use crate::shutdown::{InFlightGauge, ShutdownToken};
use crate::transport::ConnectionStream;

/// Encodes a solid RGB image as PNG bytes.
pub(crate) fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image::DynamicImage::new_rgb8(width, height)
        .write_to(&mut buffer, image::ImageFormat::Png)
        .expect("encode fixture");
    buffer.into_inner()
}

/// Clonable in-memory writer for response-slot tests.
#[derive(Debug, Clone, Default)]
pub(crate) struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn text(&self) -> String {
        let bytes = self.bytes.lock().expect("buffer lock");
        String::from_utf8(bytes.clone()).expect("utf8 buffer")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().expect("buffer lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Behaviour knob for [`RecordingStation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StationBehaviour {
    /// Desktop-like: home and combined surfaces work, lock is unsupported.
    Desktop,
    /// Lock-capable: every surface works.
    WithLock,
    /// Every call fails with a backend error.
    Failing,
    /// Every call panics, for worker-supervision tests.
    Panicking,
}

/// Wallpaper station that records which surfaces were set.
#[derive(Debug)]
pub(crate) struct RecordingStation {
    behaviour: StationBehaviour,
    surfaces: Mutex<Vec<&'static str>>,
}

impl RecordingStation {
    pub(crate) fn desktop() -> Arc<Self> {
        Arc::new(Self::with_behaviour(StationBehaviour::Desktop))
    }

    pub(crate) fn with_lock() -> Arc<Self> {
        Arc::new(Self::with_behaviour(StationBehaviour::WithLock))
    }

    pub(crate) fn failing() -> Arc<Self> {
        Arc::new(Self::with_behaviour(StationBehaviour::Failing))
    }

    pub(crate) fn panicking() -> Arc<Self> {
        Arc::new(Self::with_behaviour(StationBehaviour::Panicking))
    }

    fn with_behaviour(behaviour: StationBehaviour) -> Self {
        Self {
            behaviour,
            surfaces: Mutex::new(Vec::new()),
        }
    }

    /// Surfaces set so far, in call order.
    pub(crate) fn surfaces(&self) -> Vec<&'static str> {
        self.surfaces.lock().expect("surface lock").clone()
    }

    fn record(&self, surface: &'static str) -> Result<(), StationError> {
        match self.behaviour {
            StationBehaviour::Failing => Err(StationError::Backend {
                message: "backend exploded".to_owned(),
            }),
            StationBehaviour::Panicking => panic!("station panicked mid-call"),
            StationBehaviour::Desktop | StationBehaviour::WithLock => {
                self.surfaces.lock().expect("surface lock").push(surface);
                Ok(())
            }
        }
    }
}

impl WallpaperStation for RecordingStation {
    fn supports_wallpaper(&self) -> bool {
        true
    }

    fn supports_lock_screen(&self) -> bool {
        self.behaviour == StationBehaviour::WithLock
    }

    fn set_home(&self, _image: &DecodedImage) -> Result<(), StationError> {
        self.record("home")
    }

    fn set_lock(&self, _image: &DecodedImage) -> Result<(), StationError> {
        if self.behaviour == StationBehaviour::Desktop {
            return Err(StationError::LockUnsupported);
        }
        self.record("lock")
    }

    fn set_both(&self, _image: &DecodedImage) -> Result<(), StationError> {
        self.record("both")
    }
}

/// Codec wrapper counting decode attempts.
#[derive(Debug, Default)]
pub(crate) struct CountingCodec {
    inner: StandardImageCodec,
    decodes: AtomicUsize,
}

impl CountingCodec {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn decode_count(&self) -> usize {
        self.decodes.load(Ordering::SeqCst)
    }
}

impl ImageCodec for CountingCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, CodecError> {
        self.decodes.fetch_add(1, Ordering::SeqCst);
        self.inner.decode(bytes)
    }
}

/// Health reporter that records event names for assertions.
#[derive(Debug, Default)]
pub(crate) struct RecordingReporter {
    events: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn events(&self) -> Vec<String> {
        self.events.lock().expect("event lock").clone()
    }

    fn record(&self, event: impl Into<String>) {
        self.events.lock().expect("event lock").push(event.into());
    }
}

impl HealthReporter for RecordingReporter {
    fn bootstrap_starting(&self) {
        self.record("bootstrap_starting");
    }

    fn bootstrap_succeeded(&self, _config: &Config) {
        self.record("bootstrap_succeeded");
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(format!("bootstrap_failed: {error}"));
    }

    fn listener_active(&self, _endpoint: &fresco_config::SocketEndpoint) {
        self.record("listener_active");
    }

    fn shutdown_starting(&self) {
        self.record("shutdown_starting");
    }

    fn shutdown_complete(&self, abandoned_requests: usize) {
        self.record(format!("shutdown_complete: {abandoned_requests}"));
    }
}

/// Builds a capability bundle over fakes, with the gallery rooted at `root`.
pub(crate) fn capabilities_with(
    codec: Arc<CountingCodec>,
    station: Arc<RecordingStation>,
    root: &Path,
) -> Capabilities {
    Capabilities::new(
        PlatformProfile::Full,
        codec,
        station,
        Arc::new(PicturesDirStore::new(
            root,
            Arc::new(OpenPermissionGate::new()),
        )),
    )
}

/// Builds a dispatch handler for the given capability bundle.
pub(crate) fn handler_for(capabilities: Capabilities) -> Arc<DispatchConnectionHandler> {
    handler_with_shutdown(capabilities, ShutdownToken::new())
}

/// Builds a dispatch handler observing the given shutdown token.
pub(crate) fn handler_with_shutdown(
    capabilities: Capabilities,
    shutdown: ShutdownToken,
) -> Arc<DispatchConnectionHandler> {
    Arc::new(DispatchConnectionHandler::new(
        capabilities,
        "Fresco".to_owned(),
        shutdown,
        InFlightGauge::new(),
    ))
}

/// Sends one raw request line through a TCP pair and returns the parsed reply.
pub(crate) fn roundtrip(handler: &Arc<DispatchConnectionHandler>, line: &str) -> OperationReply {
    let raw = roundtrip_raw(handler, line);
    let first = raw.lines().next().expect("reply line should be present");
    serde_json::from_str(first).expect("reply should parse")
}

/// Sends one raw request line and returns everything the daemon wrote back.
pub(crate) fn roundtrip_raw(handler: &Arc<DispatchConnectionHandler>, line: &str) -> String {
    use std::io::Read as _;

    use crate::transport::ConnectionHandler as _;

    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind listener");
    let addr = listener.local_addr().expect("listener address");

    let server_handler = Arc::clone(handler);
    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept connection");
        server_handler.handle(ConnectionStream::Tcp(stream));
    });

    let mut client = TcpStream::connect(addr).expect("connect client");
    client.write_all(line.as_bytes()).expect("write request");
    client.write_all(b"\n").expect("write delimiter");
    client
        .shutdown(std::net::Shutdown::Write)
        .expect("half-close client");

    let mut reply = String::new();
    BufReader::new(&mut client)
        .read_to_string(&mut reply)
        .expect("read reply stream");
    server.join().expect("server thread");
    reply
}
