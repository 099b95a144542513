//! Per-display subtitle rendering session.
//!
//! A [`RenderSession`] owns at most one active decoder, an ingress queue
//! of raw packet buffers, and a dedicated render thread that ticks the
//! decoder on its own schedule. Packets reach the session two ways:
//! framed buffers from the Unix socket source are queued and drained by
//! the render thread, while in-process control calls build a packet and
//! dispatch it synchronously on the caller's thread.
//!
//! Three locks, always taken in this order when nested:
//! render state, then the decoder state, then the ingress queue.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::RenderConfig;
use crate::decoder::{Decoder, DecoderContext, DecoderFactory, Selection};
use crate::error::TrackError;
use crate::gfx::{FontCache, GfxEngine, GfxWindow};
use crate::message::{
    CcService, CcServiceType, DataType, PacketType, SessionType, SubtitleKind, TtxPage,
};
use crate::packet::{Packet, PacketBuilder};
use crate::stc::StcProvider;
use crate::style::CcStyle;
use crate::transport::{PacketReceiver, UnixSocketSource};

/// A poisoning thread has already aborted its work; the data these
/// guards protect stays usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Decoder state ────────────────────────────────────────────────

/// Everything guarded by the decoder lock: the active decoder, its type
/// tag, and the overrides that must survive re-selection.
struct DecoderState {
    decoder: Option<Box<dyn Decoder>>,
    session_type: SessionType,
    muted: bool,
    preview_text: String,
    custom_cc_style: Option<CcStyle>,
    custom_ttml_styling: Option<String>,
    font_cache: Arc<FontCache>,
    window: Option<Arc<dyn GfxWindow>>,
}

impl DecoderState {
    fn new() -> Self {
        Self {
            decoder: None,
            session_type: SessionType::None,
            muted: false,
            preview_text: String::new(),
            custom_cc_style: None,
            custom_ttml_styling: None,
            font_cache: Arc::new(FontCache::new()),
            window: None,
        }
    }
}

// ── RenderSession ────────────────────────────────────────────────

/// One subtitle rendering session, bound to a display.
pub struct RenderSession {
    display_name: String,
    socket_path: Option<PathBuf>,
    config: RenderConfig,
    engine: Arc<dyn GfxEngine>,
    factory: Arc<dyn DecoderFactory>,
    stc: Arc<StcProvider>,
    started: AtomicBool,
    last_active: Mutex<Instant>,
    decoder: Mutex<DecoderState>,
    queue: Mutex<VecDeque<Vec<u8>>>,
    /// The render thread's quit flag, paired with `render_cond`.
    render: Mutex<bool>,
    render_cond: Condvar,
    render_thread: Mutex<Option<JoinHandle<()>>>,
    socket: Mutex<Option<UnixSocketSource>>,
}

impl RenderSession {
    /// Create an idle session. Nothing runs until [`start`](Self::start).
    pub fn new(
        display_name: impl Into<String>,
        socket_path: Option<PathBuf>,
        config: RenderConfig,
        engine: Arc<dyn GfxEngine>,
        factory: Arc<dyn DecoderFactory>,
    ) -> Arc<Self> {
        Arc::new(Self {
            display_name: display_name.into(),
            socket_path,
            config,
            engine,
            factory,
            stc: Arc::new(StcProvider::new()),
            started: AtomicBool::new(false),
            last_active: Mutex::new(Instant::now()),
            decoder: Mutex::new(DecoderState::new()),
            queue: Mutex::new(VecDeque::new()),
            render: Mutex::new(false),
            render_cond: Condvar::new(),
            render_thread: Mutex::new(None),
            socket: Mutex::new(None),
        })
    }

    // ── Introspection ────────────────────────────────────────────

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn socket_path(&self) -> Option<&Path> {
        self.socket_path.as_deref()
    }

    pub fn session_type(&self) -> SessionType {
        lock(&self.decoder).session_type
    }

    /// When the session last saw a packet on either dispatch path.
    pub fn last_active(&self) -> Instant {
        *lock(&self.last_active)
    }

    pub fn is_muted(&self) -> bool {
        lock(&self.decoder).muted
    }

    pub fn has_custom_cc_style(&self) -> bool {
        lock(&self.decoder).custom_cc_style.is_some()
    }

    pub fn has_custom_ttml_styling(&self) -> bool {
        lock(&self.decoder).custom_ttml_styling.is_some()
    }

    /// A session renders only while a selection installed a decoder.
    pub fn is_rendering_active(&self) -> bool {
        let state = lock(&self.decoder);
        state.session_type != SessionType::None && state.decoder.is_some()
    }

    fn is_data_queued(&self) -> bool {
        !lock(&self.queue).is_empty()
    }

    fn touch(&self) {
        *lock(&self.last_active) = Instant::now();
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Bring the session up: attach a window, start the socket source if
    /// a path was given, and spawn the render thread. Idempotent.
    ///
    /// The render thread holds an `Arc` to the session, so [`stop`]
    /// (which joins it) must be called before the session can be freed.
    ///
    /// [`stop`]: Self::stop
    pub fn start(self: &Arc<Self>) -> Result<(), TrackError> {
        if self.started.swap(true, Ordering::SeqCst) {
            tracing::debug!(display = %self.display_name, "session already started");
            return Ok(());
        }

        {
            let mut state = lock(&self.decoder);
            let window = self.engine.create_window();
            self.engine.attach(&window);
            state.window = Some(window);
        }

        if let Some(path) = &self.socket_path {
            let receiver = Arc::clone(self) as Arc<dyn PacketReceiver>;
            match UnixSocketSource::spawn(path, &self.config.socket, receiver) {
                Ok(source) => *lock(&self.socket) = Some(source),
                Err(e) => {
                    self.teardown_window();
                    self.started.store(false, Ordering::SeqCst);
                    return Err(e);
                }
            }
        }

        *lock(&self.render) = false;
        let session = Arc::clone(self);
        let spawned = thread::Builder::new()
            .name(format!("render-{}", self.display_name))
            .spawn(move || session.render_loop());
        match spawned {
            Ok(handle) => *lock(&self.render_thread) = Some(handle),
            Err(e) => {
                if let Some(mut source) = lock(&self.socket).take() {
                    source.stop();
                }
                self.teardown_window();
                self.started.store(false, Ordering::SeqCst);
                return Err(e.into());
            }
        }

        tracing::info!(display = %self.display_name, "session started");
        Ok(())
    }

    /// Detach the session from its media source. The decoder, window and
    /// overrides are untouched; callers pair this with [`reset`] when
    /// the decoder should go too.
    ///
    /// [`reset`]: Self::reset
    pub fn close(&self) {
        self.touch();
        tracing::debug!(display = %self.display_name, "session closed");
    }

    /// Tear the session down in dependency order: socket source first so
    /// no new buffers arrive, then the render thread, then the queue,
    /// then the decoder, and the window last. Idempotent.
    pub fn stop(&self) {
        if !self.started.swap(false, Ordering::SeqCst) {
            return;
        }

        if let Some(mut source) = lock(&self.socket).take() {
            source.stop();
        }

        {
            let mut quit = lock(&self.render);
            *quit = true;
            self.render_cond.notify_one();
        }
        if let Some(handle) = lock(&self.render_thread).take() {
            if handle.join().is_err() {
                tracing::error!(display = %self.display_name, "render thread panicked");
            }
        }

        lock(&self.queue).clear();

        {
            let mut state = lock(&self.decoder);
            if let Some(mut decoder) = state.decoder.take() {
                decoder.deactivate();
            }
            state.session_type = SessionType::None;
        }

        self.teardown_window();
        tracing::info!(display = %self.display_name, "session stopped");
    }

    fn teardown_window(&self) {
        let mut state = lock(&self.decoder);
        if let Some(window) = state.window.take() {
            self.engine.detach(&window);
        }
    }

    // ── Render thread ────────────────────────────────────────────

    fn render_loop(&self) {
        let mut quit = lock(&self.render);
        loop {
            // Sleep until there is something to render or we are told
            // to quit.
            quit = self
                .render_cond
                .wait_while(quit, |quit| {
                    !*quit && !(self.is_rendering_active() && self.is_data_queued())
                })
                .unwrap_or_else(PoisonError::into_inner);
            if *quit {
                return;
            }

            while !*quit && self.is_rendering_active() {
                let wait = self.process_queued();
                self.engine.execute();
                if wait.is_zero() {
                    // The decoder has more work ready now.
                    continue;
                }
                let (guard, _) = self
                    .render_cond
                    .wait_timeout(quit, wait)
                    .unwrap_or_else(PoisonError::into_inner);
                quit = guard;
            }
            if *quit {
                return;
            }
            // Leaving the active phase discards anything still queued.
            lock(&self.queue).clear();
        }
    }

    /// Drain and dispatch the ingress queue, then give the decoder one
    /// tick. Returns the decoder's requested wait until the next tick.
    fn process_queued(&self) -> Duration {
        let buffers: Vec<Vec<u8>> = lock(&self.queue).drain(..).collect();
        for buffer in &buffers {
            match Packet::parse(buffer) {
                Ok(packet) => self.dispatch(&packet),
                Err(e) => {
                    tracing::warn!(display = %self.display_name, "dropping malformed packet: {e}");
                }
            }
        }

        let mut state = lock(&self.decoder);
        match state.decoder.as_mut() {
            Some(decoder) => {
                decoder.process();
                decoder.wait_time()
            }
            None => Duration::ZERO,
        }
    }

    // ── Dispatch ─────────────────────────────────────────────────

    /// Route one parsed packet. Shared by both ingress paths; callers on
    /// the synchronous path follow up with a condvar notify.
    fn dispatch(&self, packet: &Packet) {
        self.touch();
        let ty = packet.packet_type();
        let mut state = lock(&self.decoder);

        if ty.is_selection() {
            self.handle_selection(&mut state, packet);
            return;
        }
        if ty.is_data() {
            // No decoder means the data has nowhere to go.
            if let Some(decoder) = state.decoder.as_mut() {
                decoder.add_data(packet);
            }
            return;
        }

        match ty {
            PacketType::Timestamp => {
                let mut rd = packet.reader();
                match rd.read_u32().and_then(|stc| Ok((stc, rd.read_u64()?))) {
                    Ok((stc, timestamp_ms)) => self.stc.process_timestamp(stc, timestamp_ms),
                    Err(e) => {
                        tracing::warn!(display = %self.display_name, "bad timestamp packet: {e}");
                    }
                }
            }
            PacketType::TtmlTimestamp | PacketType::WebvttTimestamp => {
                if let Some(decoder) = state.decoder.as_mut() {
                    decoder.process_timestamp(packet);
                }
            }
            PacketType::TtmlInfo => {
                if let Some(decoder) = state.decoder.as_mut() {
                    decoder.process_info(packet);
                }
            }
            PacketType::Pause => {
                if let Some(decoder) = state.decoder.as_mut() {
                    decoder.pause();
                }
            }
            PacketType::Resume => {
                if let Some(decoder) = state.decoder.as_mut() {
                    decoder.resume();
                }
            }
            PacketType::Mute => {
                if let Some(decoder) = state.decoder.as_mut() {
                    decoder.mute(true);
                    state.muted = true;
                }
            }
            PacketType::Unmute => {
                if let Some(decoder) = state.decoder.as_mut() {
                    decoder.mute(false);
                    state.muted = false;
                }
            }
            PacketType::SetCcAttributes => {
                if state.session_type == SessionType::Cc {
                    if let Some(decoder) = state.decoder.as_mut() {
                        decoder.set_style_attributes(packet);
                    }
                }
            }
            PacketType::ResetAll => {
                lock(&self.queue).clear();
                if let Some(mut decoder) = state.decoder.take() {
                    decoder.deactivate();
                }
                state.session_type = SessionType::None;
            }
            PacketType::ResetChannel => {
                let addressed = state
                    .decoder
                    .as_ref()
                    .is_some_and(|decoder| decoder.wants_data(packet));
                if addressed {
                    if let Some(mut decoder) = state.decoder.take() {
                        decoder.deactivate();
                    }
                    state.session_type = SessionType::None;
                }
            }
            PacketType::Invalid => {
                tracing::error!(display = %self.display_name, "invalid packet on dispatch");
            }
            // Data and selection types were routed above.
            _ => {}
        }
    }

    /// Replace the active decoder. The old decoder is deactivated before
    /// the selection is even parsed, so a malformed selection still
    /// leaves the session with no decoder rather than a stale one.
    fn handle_selection(&self, state: &mut DecoderState, packet: &Packet) {
        if let Some(mut old) = state.decoder.take() {
            old.deactivate();
        }
        state.session_type = SessionType::None;

        let selection = match parse_selection(packet) {
            Ok(selection) => selection,
            Err(e) => {
                tracing::warn!(display = %self.display_name, "rejecting selection: {e}");
                return;
            }
        };

        // A fresh cache per CC service; atlases rendered for the old
        // service would never be hit again.
        if matches!(selection, Selection::Cc { .. }) {
            state.font_cache = Arc::new(FontCache::new());
        }

        let created = {
            let Some(window) = state.window.as_ref() else {
                tracing::warn!(display = %self.display_name, "selection before start; no window");
                return;
            };
            let ctx = DecoderContext {
                window,
                engine: &self.engine,
                stc: &self.stc,
                font_cache: &state.font_cache,
                config: &self.config,
            };
            self.factory.create(&selection, ctx)
        };

        match created {
            Some(mut decoder) => {
                if state.muted {
                    decoder.mute(true);
                }
                state.decoder = Some(decoder);
                state.session_type = selection.session_type();
                self.reapply_overrides(state);
                tracing::info!(
                    display = %self.display_name,
                    session_type = %state.session_type,
                    "decoder selected"
                );
            }
            None => {
                tracing::warn!(
                    display = %self.display_name,
                    "no decoder available for {selection:?}"
                );
            }
        }
    }

    /// Push the session's stored overrides into a freshly created
    /// decoder.
    fn reapply_overrides(&self, state: &mut DecoderState) {
        match state.session_type {
            SessionType::Cc => {
                if let Some(style) = state.custom_cc_style {
                    let mut bp = PacketBuilder::new(PacketType::SetCcAttributes);
                    style.encode(&mut bp);
                    if let Ok(packet) = Packet::parse(&bp.finish()) {
                        if let Some(decoder) = state.decoder.as_mut() {
                            decoder.set_style_attributes(&packet);
                        }
                    }
                }
                if !state.preview_text.is_empty() {
                    let text = state.preview_text.clone();
                    if let Some(decoder) = state.decoder.as_mut() {
                        decoder.set_preview_text(&text);
                    }
                }
            }
            SessionType::Ttml => {
                let styling = state
                    .custom_ttml_styling
                    .clone()
                    .unwrap_or_else(|| self.config.ttml.style_overrides.clone());
                if !styling.is_empty() {
                    if let Some(decoder) = state.decoder.as_mut() {
                        decoder.apply_styling(&styling);
                    }
                }
            }
            _ => {}
        }
    }

    // ── Synchronous ingress ──────────────────────────────────────

    /// Parse and dispatch a packet built in-process, then wake the
    /// render thread in case the dispatch changed what it should do.
    fn deliver(&self, buffer: &[u8]) {
        match Packet::parse(buffer) {
            Ok(packet) => {
                self.dispatch(&packet);
                self.render_cond.notify_one();
            }
            Err(e) => {
                tracing::warn!(display = %self.display_name, "dropping malformed packet: {e}");
            }
        }
    }

    // ── Data API ─────────────────────────────────────────────────

    /// Frame media data as a packet and queue it for the render thread.
    /// Dropped unless a decoder is active.
    pub fn send_data(&self, data_type: DataType, data: &[u8], display_offset_ms: i64) {
        let mut bp = match data_type {
            DataType::Pes => {
                let mut bp = PacketBuilder::new(PacketType::PesData);
                bp.push_u32(0); // channel type
                bp
            }
            DataType::Ttml => {
                let mut bp = PacketBuilder::new(PacketType::TtmlData);
                bp.push_offset_ms(display_offset_ms);
                bp
            }
            DataType::Cc => {
                let mut bp = PacketBuilder::new(PacketType::CcData);
                bp.push_u32(3).push_u32(0).push_u32(0);
                bp
            }
            DataType::Webvtt => {
                // WebVTT offsets are carried negated on the wire.
                let mut bp = PacketBuilder::new(PacketType::WebvttData);
                bp.push_offset_ms(-display_offset_ms);
                bp
            }
        };
        bp.push_bytes(data);
        self.add_buffer(bp.finish());
    }

    /// Send a media timestamp to an active TTML or WebVTT decoder.
    /// Ignored for other session types.
    pub fn send_timestamp(&self, timestamp_ms: u64) {
        let packet_type = match self.session_type() {
            SessionType::Ttml => PacketType::TtmlTimestamp,
            SessionType::Webvtt => PacketType::WebvttTimestamp,
            other => {
                tracing::debug!(
                    display = %self.display_name,
                    session_type = %other,
                    "timestamp ignored"
                );
                return;
            }
        };
        let mut bp = PacketBuilder::new(packet_type);
        bp.push_u64(timestamp_ms);
        self.deliver(&bp.finish());
    }

    // ── Control API ──────────────────────────────────────────────

    pub fn pause(&self) {
        self.deliver(&PacketBuilder::new(PacketType::Pause).finish());
    }

    pub fn resume(&self) {
        self.deliver(&PacketBuilder::new(PacketType::Resume).finish());
    }

    pub fn mute(&self) {
        self.deliver(&PacketBuilder::new(PacketType::Mute).finish());
    }

    pub fn unmute(&self) {
        self.deliver(&PacketBuilder::new(PacketType::Unmute).finish());
    }

    /// Detach from the media source and drop the decoder if it considers
    /// itself addressed.
    pub fn reset(&self) {
        self.close();
        self.deliver(&PacketBuilder::new(PacketType::ResetChannel).finish());
    }

    // ── Selection API ────────────────────────────────────────────

    /// Select a closed-caption service by its host-facing name
    /// (`SERVICE<N>`, `CC<N>` or `TEXT<N>`). A name outside the grammar
    /// is rejected with no effect on the current decoder.
    pub fn select_cc_service(&self, service: &str) -> Result<(), TrackError> {
        let service = CcService::parse(service)?;
        let mut bp = PacketBuilder::new(PacketType::SubtitleSelection);
        bp.push_u32(SubtitleKind::Cc as u32)
            .push_u32(service.service_type as u32)
            .push_u32(service.service_id);
        self.deliver(&bp.finish());
        Ok(())
    }

    /// Select a teletext page by its 3-digit decimal number. Page 0
    /// selects the configured default page.
    pub fn select_teletext_page(&self, page: u16) {
        let page = if page == 0 {
            self.config.teletext.default_page
        } else {
            page
        };
        let ttx = TtxPage::from_decimal(page);
        let mut bp = PacketBuilder::new(PacketType::SubtitleSelection);
        bp.push_u32(SubtitleKind::Teletext as u32)
            .push_u32(ttx.magazine)
            .push_u32(ttx.page);
        self.deliver(&bp.finish());
    }

    /// DVB selection is not wired through the session API yet; DVB
    /// streams are selected by the packet source instead.
    pub fn select_dvb_service(&self, composition_page: u16, ancillary_page: u16) {
        tracing::warn!(
            display = %self.display_name,
            composition_page,
            ancillary_page,
            "DVB selection via session API is unimplemented"
        );
    }

    /// SCTE selection is not wired through the session API yet; SCTE
    /// streams are selected by the packet source instead.
    pub fn select_scte_service(&self) {
        tracing::warn!(
            display = %self.display_name,
            "SCTE selection via session API is unimplemented"
        );
    }

    /// Select TTML rendering. Zero dimensions fall back to the
    /// configured video geometry.
    pub fn select_ttml(&self, video_width: u32, video_height: u32) {
        let (w, h) = self.video_dimensions(video_width, video_height);
        let mut bp = PacketBuilder::new(PacketType::TtmlSelection);
        bp.push_u32(w).push_u32(h);
        self.deliver(&bp.finish());
    }

    /// Select WebVTT rendering. Zero dimensions fall back to the
    /// configured video geometry.
    pub fn select_webvtt(&self, video_width: u32, video_height: u32) {
        let (w, h) = self.video_dimensions(video_width, video_height);
        let mut bp = PacketBuilder::new(PacketType::WebvttSelection);
        bp.push_u32(w).push_u32(h);
        self.deliver(&bp.finish());
    }

    fn video_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        if width == 0 || height == 0 {
            (self.config.video.width, self.config.video.height)
        } else {
            (width, height)
        }
    }

    // ── Style API ────────────────────────────────────────────────

    /// Store a closed-caption style override and apply it to the active
    /// decoder. The override is re-applied whenever a new CC decoder is
    /// selected.
    pub fn set_cc_style(&self, style: CcStyle) {
        lock(&self.decoder).custom_cc_style = Some(style);
        let mut bp = PacketBuilder::new(PacketType::SetCcAttributes);
        style.encode(&mut bp);
        self.deliver(&bp.finish());
        // Re-render any preview text with the new style.
        self.refresh_preview();
    }

    /// Render a fixed preview string on an active CC decoder, instead of
    /// stream content. The text survives re-selection; empty clears it.
    pub fn set_preview_text(&self, text: &str) {
        let mut state = lock(&self.decoder);
        state.preview_text = text.to_string();
        if state.session_type == SessionType::Cc {
            if let Some(decoder) = state.decoder.as_mut() {
                decoder.set_preview_text(text);
            }
        }
        drop(state);
        self.render_cond.notify_one();
    }

    fn refresh_preview(&self) {
        let mut state = lock(&self.decoder);
        if state.preview_text.is_empty() || state.session_type != SessionType::Cc {
            return;
        }
        let text = state.preview_text.clone();
        if let Some(decoder) = state.decoder.as_mut() {
            decoder.set_preview_text(&text);
        }
    }

    /// Store a TTML styling override and apply it to the active decoder.
    /// Returns whether an active decoder accepted it; the override is
    /// kept and re-applied on the next TTML selection either way.
    pub fn set_ttml_style_overrides(&self, styling: &str) -> bool {
        let mut state = lock(&self.decoder);
        state.custom_ttml_styling = Some(styling.to_string());
        match state.decoder.as_mut() {
            Some(decoder) => decoder.apply_styling(styling),
            None => false,
        }
    }
}

impl PacketReceiver for RenderSession {
    /// Socket-side ingress: queue the buffer for the render thread. A
    /// session with no active decoder drops data at the door so the
    /// queue cannot grow while nothing would consume it.
    fn add_buffer(&self, buffer: Vec<u8>) {
        if !self.is_rendering_active() {
            return;
        }
        lock(&self.queue).push_back(buffer);
        self.render_cond.notify_one();
    }

    fn on_stream_broken(&self) {
        tracing::error!(display = %self.display_name, "subtitle data stream broken");
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        self.stop();
    }
}

// ── Selection parsing ────────────────────────────────────────────

fn parse_selection(packet: &Packet) -> Result<Selection, TrackError> {
    let mut rd = packet.reader();
    match packet.packet_type() {
        PacketType::SubtitleSelection => {
            let kind = SubtitleKind::try_from(rd.read_u32()?)?;
            let aux1 = rd.read_u32()?;
            let aux2 = rd.read_u32()?;
            Ok(match kind {
                SubtitleKind::Dvb => Selection::Dvb {
                    composition_page: aux1 as u16,
                    ancillary_page: aux2 as u16,
                },
                SubtitleKind::Scte => Selection::Scte,
                SubtitleKind::Cc => Selection::Cc {
                    service: CcService {
                        service_type: CcServiceType::try_from(aux1)?,
                        service_id: aux2,
                    },
                },
                SubtitleKind::Teletext => Selection::Teletext {
                    magazine: aux1,
                    page: aux2,
                },
            })
        }
        PacketType::TeletextSelection => Ok(Selection::Teletext {
            magazine: rd.read_u32()?,
            page: rd.read_u32()?,
        }),
        PacketType::TtmlSelection => Ok(Selection::Ttml {
            video_width: rd.read_u32()?,
            video_height: rd.read_u32()?,
        }),
        PacketType::WebvttSelection => Ok(Selection::Webvtt {
            video_width: rd.read_u32()?,
            video_height: rd.read_u32()?,
        }),
        other => Err(TrackError::UnknownVariant {
            type_name: "selection",
            value: other as u32 as u64,
        }),
    }
}

// ── Tests ────────────────────────────────────────────────────────
