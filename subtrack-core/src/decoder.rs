//! Decoder capability interface and the selection model.
//!
//! Concrete format decoders (CC, teletext, DVB, SCTE, WebVTT, TTML) are
//! external collaborators. The session owns at most one of them at a
//! time through `Box<dyn Decoder>` and constructs replacements through
//! a [`DecoderFactory`] bound at session creation.

use std::sync::Arc;
use std::time::Duration;

use crate::config::RenderConfig;
use crate::gfx::{FontCache, GfxEngine, GfxWindow};
use crate::message::{CcService, SessionType};
use crate::packet::Packet;
use crate::stc::StcProvider;

// ── Decoder ──────────────────────────────────────────────────────

/// The contract the session needs from a format decoder.
///
/// Format-specific entry points (`process_timestamp`, `process_info`,
/// `set_style_attributes`, `set_preview_text`, `apply_styling`) default
/// to no-ops so each variant implements only what its format defines.
pub trait Decoder: Send {
    /// Consume one media data packet.
    fn add_data(&mut self, packet: &Packet);

    /// Hide (`true`) or show (`false`) rendered output.
    fn mute(&mut self, muted: bool);

    /// Pause presentation.
    fn pause(&mut self);

    /// Resume presentation.
    fn resume(&mut self);

    /// Release render resources; called exactly once before the decoder
    /// is dropped.
    fn deactivate(&mut self);

    /// Format-specific media timestamp (TTML and WebVTT variants).
    fn process_timestamp(&mut self, _packet: &Packet) {}

    /// Auxiliary content information (TTML only).
    fn process_info(&mut self, _packet: &Packet) {}

    /// Closed-caption style attributes (CC only).
    fn set_style_attributes(&mut self, _packet: &Packet) {}

    /// Whether a channel-reset packet addresses this decoder.
    fn wants_data(&self, _reset: &Packet) -> bool {
        true
    }

    /// Render a fixed preview string instead of stream content (CC only).
    fn set_preview_text(&mut self, _text: &str) {}

    /// Apply a styling override string; returns `true` if the variant
    /// supports it (TTML only).
    fn apply_styling(&mut self, _styling: &str) -> bool {
        false
    }

    /// One scheduler tick.
    fn process(&mut self);

    /// Requested interval until the next tick. Zero means "tick again
    /// immediately".
    fn wait_time(&self) -> Duration;
}

// ── Selection ────────────────────────────────────────────────────

/// A decoded format-selection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Dvb {
        composition_page: u16,
        ancillary_page: u16,
    },
    Scte,
    Cc {
        service: CcService,
    },
    Teletext {
        magazine: u32,
        page: u32,
    },
    Ttml {
        video_width: u32,
        video_height: u32,
    },
    Webvtt {
        video_width: u32,
        video_height: u32,
    },
}

impl Selection {
    /// The session type a decoder built from this selection gets tagged
    /// with.
    pub fn session_type(&self) -> SessionType {
        match self {
            Selection::Dvb { .. } => SessionType::Dvb,
            Selection::Scte => SessionType::Scte,
            Selection::Cc { .. } => SessionType::Cc,
            Selection::Teletext { .. } => SessionType::Ttx,
            Selection::Ttml { .. } => SessionType::Ttml,
            Selection::Webvtt { .. } => SessionType::Webvtt,
        }
    }
}

// ── DecoderFactory ───────────────────────────────────────────────

/// Everything a decoder needs from its owning session at construction.
pub struct DecoderContext<'a> {
    pub window: &'a Arc<dyn GfxWindow>,
    pub engine: &'a Arc<dyn GfxEngine>,
    pub stc: &'a Arc<StcProvider>,
    pub font_cache: &'a Arc<FontCache>,
    pub config: &'a RenderConfig,
}

/// Builds concrete decoders for selection requests.
///
/// Returning `None` means the variant is unavailable; the session logs
/// the anomaly and continues with no active decoder.
pub trait DecoderFactory: Send + Sync {
    fn create(&self, selection: &Selection, ctx: DecoderContext<'_>) -> Option<Box<dyn Decoder>>;
}
