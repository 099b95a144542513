//! Unix-domain socket packet source.
//!
//! Runs one dedicated reader thread per session socket: accept a stream
//! connection, read length-framed packets (fixed header, then the
//! declared payload), and hand each complete buffer to the session's
//! [`PacketReceiver`]. A stream that breaks mid-frame is reported via
//! `on_stream_broken` and the thread goes back to accepting.
//!
//! Bind failure is fatal to session start; everything after that is
//! absorbed locally and surfaced through logging.

use std::io::Read;
use std::os::unix::fs::PermissionsExt;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config::SocketConfig;
use crate::error::TrackError;
use crate::header::HEADER_SIZE;
use crate::packet::MAX_PAYLOAD_SIZE;

/// Sink for buffers arriving from a socket source.
pub trait PacketReceiver: Send + Sync {
    /// A complete framed packet arrived.
    fn add_buffer(&self, buffer: Vec<u8>);

    /// The stream broke mid-frame.
    fn on_stream_broken(&self);
}

/// How long the accept loop sleeps between polls, and the per-read
/// timeout on accepted streams. Both bound how fast shutdown is seen.
const POLL_INTERVAL: Duration = Duration::from_millis(10);
const READ_TIMEOUT: Duration = Duration::from_millis(50);

/// A Unix-domain socket source feeding one [`PacketReceiver`].
pub struct UnixSocketSource {
    path: PathBuf,
    shutdown: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

impl UnixSocketSource {
    /// Bind the socket, apply best-effort permissions, and start the
    /// reader thread.
    pub fn spawn(
        path: impl Into<PathBuf>,
        config: &SocketConfig,
        receiver: Arc<dyn PacketReceiver>,
    ) -> Result<Self, TrackError> {
        let path = path.into();
        // A stale socket file from a crashed predecessor blocks bind.
        match std::fs::remove_file(&path) {
            Ok(()) => tracing::debug!("removed stale socket file {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        let listener = UnixListener::bind(&path)?;
        listener.set_nonblocking(true)?;

        apply_permissions(&path, config);

        let shutdown = Arc::new(AtomicBool::new(false));
        let reader = {
            let shutdown = Arc::clone(&shutdown);
            let path = path.clone();
            thread::Builder::new()
                .name(format!("sock-{}", path.display()))
                .spawn(move || accept_loop(listener, &shutdown, receiver.as_ref()))?
        };

        tracing::info!("socket source listening on {}", path.display());
        Ok(Self {
            path,
            shutdown,
            reader: Some(reader),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Signal the reader thread, join it, and unlink the socket file.
    pub fn stop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(reader) = self.reader.take() {
            if reader.join().is_err() {
                tracing::error!("socket reader thread panicked");
            }
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("could not unlink {}: {e}", self.path.display());
            }
        }
    }
}

impl Drop for UnixSocketSource {
    fn drop(&mut self) {
        self.stop();
    }
}

// ── Socket-file permissions ──────────────────────────────────────

/// Widen the socket file's permissions so the producing process can
/// connect. Bounded retries with a short backoff; abandoned on failure
/// without affecting the session.
fn apply_permissions(path: &Path, config: &SocketConfig) {
    let perms = std::fs::Permissions::from_mode(config.permissions);
    let delay = Duration::from_millis(config.permission_retry_delay_ms);
    for _ in 0..config.permission_retries.max(1) {
        match std::fs::set_permissions(path, perms.clone()) {
            Ok(()) => return,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => thread::sleep(delay),
            Err(e) => {
                tracing::warn!("chmod {} failed: {e}", path.display());
                return;
            }
        }
    }
    tracing::warn!("giving up on socket permissions for {}", path.display());
}

// ── Reader thread ────────────────────────────────────────────────

fn accept_loop(listener: UnixListener, shutdown: &AtomicBool, receiver: &dyn PacketReceiver) {
    while !shutdown.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, _)) => {
                tracing::debug!("socket client connected");
                serve_stream(stream, shutdown, receiver);
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                tracing::error!("accept failed: {e}");
                thread::sleep(POLL_INTERVAL);
            }
        }
    }
}

fn serve_stream(mut stream: UnixStream, shutdown: &AtomicBool, receiver: &dyn PacketReceiver) {
    if let Err(e) = stream.set_read_timeout(Some(READ_TIMEOUT)) {
        tracing::error!("set_read_timeout failed: {e}");
        return;
    }
    loop {
        match read_frame(&mut stream, shutdown) {
            Ok(Some(buffer)) => receiver.add_buffer(buffer),
            // Clean EOF at a frame boundary, or shutdown.
            Ok(None) => return,
            Err(e) => {
                tracing::error!("stream broken: {e}");
                receiver.on_stream_broken();
                return;
            }
        }
    }
}

/// Read one complete frame (header plus declared payload). `Ok(None)`
/// means a clean end: EOF between frames, or shutdown was requested.
fn read_frame(stream: &mut UnixStream, shutdown: &AtomicBool) -> std::io::Result<Option<Vec<u8>>> {
    let mut frame = vec![0u8; HEADER_SIZE];
    if !read_full(stream, &mut frame, shutdown, true)? {
        return Ok(None);
    }
    let payload_len = u32::from_le_bytes(
        frame[12..16]
            .try_into()
            .expect("slice is exactly 4 bytes"),
    ) as usize;
    if payload_len > MAX_PAYLOAD_SIZE {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("declared payload of {payload_len} bytes exceeds {MAX_PAYLOAD_SIZE}"),
        ));
    }
    let header_len = frame.len();
    frame.resize(header_len + payload_len, 0);
    if !read_full(stream, &mut frame[header_len..], shutdown, false)? {
        if shutdown.load(Ordering::SeqCst) {
            return Ok(None);
        }
        return Err(std::io::ErrorKind::UnexpectedEof.into());
    }
    Ok(Some(frame))
}

/// Fill `buf` completely. Returns `Ok(false)` on shutdown, or on EOF
/// when `at_boundary` and nothing was read yet; EOF mid-buffer is an
/// error.
fn read_full(
    stream: &mut UnixStream,
    buf: &mut [u8],
    shutdown: &AtomicBool,
    at_boundary: bool,
) -> std::io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        if shutdown.load(Ordering::SeqCst) {
            return Ok(false);
        }
        match stream.read(&mut buf[filled..]) {
            Ok(0) => {
                if filled == 0 && at_boundary {
                    return Ok(false);
                }
                return Err(std::io::ErrorKind::UnexpectedEof.into());
            }
            Ok(n) => filled += n,
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::WouldBlock
                        | std::io::ErrorKind::TimedOut
                        | std::io::ErrorKind::Interrupted
                ) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}

// ── Tests ────────────────────────────────────────────────────────
