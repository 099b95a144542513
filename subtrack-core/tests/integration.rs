//! Integration tests — full session lifecycle with framed packets
//! arriving over a real Unix-domain socket.

use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use subtrack_core::{
    DataType, Decoder, DecoderContext, DecoderFactory, GfxEngine, GfxWindow, Packet,
    PacketBuilder, PacketType, RenderConfig, RenderSession, Selection, SessionType,
};

// ── Helpers ──────────────────────────────────────────────────────

#[derive(Default)]
struct Probe {
    data_payloads: Mutex<Vec<Vec<u8>>>,
    deactivations: AtomicUsize,
    alive: AtomicBool,
}

struct ProbeDecoder {
    probe: Arc<Probe>,
}

impl Decoder for ProbeDecoder {
    fn add_data(&mut self, packet: &Packet) {
        self.probe
            .data_payloads
            .lock()
            .unwrap()
            .push(packet.payload().to_vec());
    }
    fn mute(&mut self, _muted: bool) {}
    fn pause(&mut self) {}
    fn resume(&mut self) {}
    fn deactivate(&mut self) {
        self.probe.alive.store(false, Ordering::SeqCst);
        self.probe.deactivations.fetch_add(1, Ordering::SeqCst);
    }
    fn process(&mut self) {
        // A tick after deactivation would mean the scheduler outlived
        // the decoder teardown.
        assert!(self.probe.alive.load(Ordering::SeqCst));
    }
    fn wait_time(&self) -> Duration {
        Duration::from_millis(10)
    }
}

#[derive(Default)]
struct ProbeFactory {
    probe: Arc<Probe>,
}

impl DecoderFactory for ProbeFactory {
    fn create(&self, _selection: &Selection, _ctx: DecoderContext<'_>) -> Option<Box<dyn Decoder>> {
        self.probe.alive.store(true, Ordering::SeqCst);
        Some(Box::new(ProbeDecoder {
            probe: Arc::clone(&self.probe),
        }))
    }
}

struct NullWindow;
impl GfxWindow for NullWindow {
    fn size(&self) -> (u32, u32) {
        (1920, 1080)
    }
}

#[derive(Default)]
struct NullEngine;
impl GfxEngine for NullEngine {
    fn create_window(&self) -> Arc<dyn GfxWindow> {
        Arc::new(NullWindow)
    }
    fn attach(&self, _window: &Arc<dyn GfxWindow>) {}
    fn detach(&self, _window: &Arc<dyn GfxWindow>) {}
    fn execute(&self) {}
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn socket_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("subtrack-it-{tag}-{}.sock", std::process::id()))
}

fn cc_frame(payload: &[u8]) -> Vec<u8> {
    let mut bp = PacketBuilder::new(PacketType::CcData);
    bp.push_u32(3).push_u32(0).push_u32(0).push_bytes(payload);
    bp.finish()
}

fn wait_for(deadline: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

// ── Socket ingress ───────────────────────────────────────────────

#[test]
fn test_socket_data_reaches_decoder() {
    init_logging();
    let path = socket_path("data");
    let factory = Arc::new(ProbeFactory::default());
    let probe = Arc::clone(&factory.probe);
    let session = RenderSession::new(
        "it-data",
        Some(path.clone()),
        RenderConfig::default(),
        Arc::new(NullEngine),
        factory,
    );
    session.start().unwrap();
    session.select_cc_service("CC1").unwrap();

    let mut client = UnixStream::connect(&path).unwrap();
    client.write_all(&cc_frame(b"first cue")).unwrap();
    client.write_all(&cc_frame(b"second cue")).unwrap();

    assert!(wait_for(Duration::from_secs(5), || {
        probe.data_payloads.lock().unwrap().len() == 2
    }));
    {
        let payloads = probe.data_payloads.lock().unwrap();
        // 12 bytes of CC framing words precede the caption bytes.
        assert_eq!(&payloads[0][12..], b"first cue");
        assert_eq!(&payloads[1][12..], b"second cue");
    }

    session.stop();
    assert!(!path.exists());
}

#[test]
fn test_socket_data_dropped_without_decoder() {
    init_logging();
    let path = socket_path("nodec");
    let factory = Arc::new(ProbeFactory::default());
    let probe = Arc::clone(&factory.probe);
    let session = RenderSession::new(
        "it-nodec",
        Some(path.clone()),
        RenderConfig::default(),
        Arc::new(NullEngine),
        factory,
    );
    session.start().unwrap();

    // No selection yet: these must be dropped at the door, not queued
    // for a future decoder.
    let mut client = UnixStream::connect(&path).unwrap();
    client.write_all(&cc_frame(b"too early")).unwrap();
    client.flush().unwrap();
    thread::sleep(Duration::from_millis(100));

    session.select_cc_service("CC1").unwrap();
    client.write_all(&cc_frame(b"on time")).unwrap();

    assert!(wait_for(Duration::from_secs(5), || {
        !probe.data_payloads.lock().unwrap().is_empty()
    }));
    let payloads = probe.data_payloads.lock().unwrap();
    assert_eq!(payloads.len(), 1);
    assert_eq!(&payloads[0][12..], b"on time");
    drop(payloads);

    session.stop();
}

#[test]
fn test_reselection_over_socket() {
    init_logging();
    let path = socket_path("resel");
    let factory = Arc::new(ProbeFactory::default());
    let session = RenderSession::new(
        "it-resel",
        Some(path.clone()),
        RenderConfig::default(),
        Arc::new(NullEngine),
        factory,
    );
    session.start().unwrap();
    session.select_cc_service("SERVICE1").unwrap();
    assert_eq!(session.session_type(), SessionType::Cc);

    // With a decoder active the socket path accepts selection packets
    // too; the render thread performs the switch.
    let mut client = UnixStream::connect(&path).unwrap();
    let mut bp = PacketBuilder::new(PacketType::TtmlSelection);
    bp.push_u32(1920).push_u32(1080);
    client.write_all(&bp.finish()).unwrap();

    assert!(wait_for(Duration::from_secs(5), || {
        session.session_type() == SessionType::Ttml
    }));

    session.stop();
}

#[test]
fn test_display_offset_framing() {
    init_logging();
    let factory = Arc::new(ProbeFactory::default());
    let probe = Arc::clone(&factory.probe);
    let session = RenderSession::new(
        "it-offset",
        None,
        RenderConfig::default(),
        Arc::new(NullEngine),
        factory,
    );
    session.start().unwrap();

    session.select_ttml(1920, 1080);
    session.send_data(DataType::Ttml, b"<tt/>", 1500);
    assert!(wait_for(Duration::from_secs(5), || {
        probe.data_payloads.lock().unwrap().len() == 1
    }));

    session.select_webvtt(1920, 1080);
    session.send_data(DataType::Webvtt, b"cue", 1500);
    assert!(wait_for(Duration::from_secs(5), || {
        probe.data_payloads.lock().unwrap().len() == 2
    }));

    let payloads = probe.data_payloads.lock().unwrap();
    let offset = |p: &[u8]| i64::from_le_bytes(p[..8].try_into().unwrap());
    // TTML carries the offset as given; WebVTT carries it negated.
    assert_eq!(offset(&payloads[0]), 1500);
    assert_eq!(&payloads[0][8..], b"<tt/>");
    assert_eq!(offset(&payloads[1]), -1500);
    assert_eq!(&payloads[1][8..], b"cue");
    drop(payloads);

    session.stop();
}

// ── Teardown ordering ────────────────────────────────────────────

#[test]
fn test_stop_under_concurrent_producers() {
    init_logging();
    let path = socket_path("race");
    let factory = Arc::new(ProbeFactory::default());
    let probe = Arc::clone(&factory.probe);
    let session = RenderSession::new(
        "it-race",
        Some(path.clone()),
        RenderConfig::default(),
        Arc::new(NullEngine),
        factory,
    );
    session.start().unwrap();
    session.select_cc_service("CC1").unwrap();

    let stop_flag = Arc::new(AtomicBool::new(false));
    let producers: Vec<_> = (0..3)
        .map(|_| {
            let session = Arc::clone(&session);
            let stop_flag = Arc::clone(&stop_flag);
            thread::spawn(move || {
                while !stop_flag.load(Ordering::SeqCst) {
                    session.send_data(DataType::Cc, b"racing", 0);
                    thread::sleep(Duration::from_millis(1));
                }
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(100));
    session.stop();
    // The decoder must be gone exactly once and never ticked afterwards
    // (the decoder asserts that itself).
    assert_eq!(probe.deactivations.load(Ordering::SeqCst), 1);

    stop_flag.store(true, Ordering::SeqCst);
    for producer in producers {
        producer.join().unwrap();
    }
    assert!(!path.exists());
}

#[test]
fn test_restart_after_stop() {
    init_logging();
    let path = socket_path("restart");
    let factory = Arc::new(ProbeFactory::default());
    let probe = Arc::clone(&factory.probe);
    let session = RenderSession::new(
        "it-restart",
        Some(path.clone()),
        RenderConfig::default(),
        Arc::new(NullEngine),
        factory,
    );

    for round in 1..=2 {
        session.start().unwrap();
        session.select_cc_service("CC1").unwrap();

        let mut client = UnixStream::connect(&path).unwrap();
        client.write_all(&cc_frame(b"cue")).unwrap();
        assert!(wait_for(Duration::from_secs(5), || {
            probe.data_payloads.lock().unwrap().len() == round
        }));

        session.stop();
        assert_eq!(probe.deactivations.load(Ordering::SeqCst), round);
        assert!(!path.exists());
    }
}
