//! # subtrack-core
//!
//! Core library for per-display subtitle rendering sessions.
//!
//! This crate contains:
//! - **Protocol types**: `PacketHeader`, `Packet`, `PacketType`, `CcAttributes`
//! - **Packet building**: `PacketBuilder` with process-wide sequencing, `PayloadReader`
//! - **Session**: `RenderSession` — one active decoder, an ingress queue, and a
//!   dedicated render thread driving the decoder on its own schedule
//! - **Transport**: `UnixSocketSource` feeding framed packets to a `PacketReceiver`
//! - **Decoding seams**: `Decoder`, `DecoderFactory` and `Selection` for the
//!   format decoders that live outside this crate
//! - **Graphics seams**: `GfxEngine`, `GfxWindow` and the prerendered `FontCache`
//! - **Time**: `StcProvider` for STC/media-timestamp correlation
//! - **Error**: `TrackError` — typed, `thiserror`-based error hierarchy

pub mod config;
pub mod decoder;
pub mod error;
pub mod flags;
pub mod gfx;
pub mod header;
pub mod message;
pub mod packet;
pub mod session;
pub mod stc;
pub mod style;
pub mod transport;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use config::{RenderConfig, SocketConfig, TeletextConfig, TtmlConfig, VideoConfig};
pub use decoder::{Decoder, DecoderContext, DecoderFactory, Selection};
pub use error::TrackError;
pub use flags::CcAttributes;
pub use gfx::{FontCache, FontKey, GfxEngine, GfxWindow};
pub use header::{HEADER_SIZE, PacketHeader};
pub use message::{
    CcService, CcServiceType, DataType, PacketType, SessionType, SubtitleKind, TtxPage,
};
pub use packet::{MAX_PAYLOAD_SIZE, Packet, PacketBuilder, PayloadReader};
pub use session::RenderSession;
pub use stc::{StcCorrelation, StcProvider};
pub use style::{CcStyle, STYLE_UNSET};
pub use transport::{PacketReceiver, UnixSocketSource};
