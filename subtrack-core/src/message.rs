//! Protocol packet types, session/data type tags, and the small
//! closed-caption service-name grammar.
//!
//! Uses proper enums with `TryFrom` — no panics on unknown wire values.

use std::fmt;

use crate::error::TrackError;

// ── PacketType ───────────────────────────────────────────────────

/// All packet types understood by the session protocol.
///
/// Organized by category:
/// - `0x01..0x0F` — data and timestamps
/// - `0x10..0x1F` — decoder selection
/// - `0x20..0x2F` — session control
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketType {
    // ── Data / timestamps (0x0x) ─────────────────────────────────
    /// PES-wrapped subtitle data (DVB, teletext, SCTE).
    PesData = 0x01,
    /// STC/media timestamp correlation pair.
    Timestamp = 0x02,
    /// TTML document fragment with a display offset.
    TtmlData = 0x03,
    /// TTML media timestamp.
    TtmlTimestamp = 0x04,
    /// Auxiliary TTML information (content metadata).
    TtmlInfo = 0x05,
    /// CEA-608/708 caption triplets.
    CcData = 0x06,
    /// WebVTT cue data with a display offset.
    WebvttData = 0x07,
    /// WebVTT media timestamp.
    WebvttTimestamp = 0x08,

    // ── Selection (0x1x) ─────────────────────────────────────────
    /// Generic subtitle selection (kind word picks DVB/SCTE/CC/TTX).
    SubtitleSelection = 0x10,
    /// Teletext page selection.
    TeletextSelection = 0x11,
    /// TTML selection with video dimensions.
    TtmlSelection = 0x12,
    /// WebVTT selection with video dimensions.
    WebvttSelection = 0x13,

    // ── Control (0x2x) ───────────────────────────────────────────
    /// Discard the decoder and all queued data.
    ResetAll = 0x20,
    /// Discard the decoder if it matches the packet's addressing.
    ResetChannel = 0x21,
    /// Pause presentation.
    Pause = 0x22,
    /// Resume presentation.
    Resume = 0x23,
    /// Hide rendered output.
    Mute = 0x24,
    /// Show rendered output.
    Unmute = 0x25,
    /// Closed-caption style attribute set.
    SetCcAttributes = 0x26,

    /// Placeholder for packets built "from nothing" and refined later.
    Invalid = 0xFFFF_FFFF,
}

impl TryFrom<u32> for PacketType {
    type Error = TrackError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(PacketType::PesData),
            0x02 => Ok(PacketType::Timestamp),
            0x03 => Ok(PacketType::TtmlData),
            0x04 => Ok(PacketType::TtmlTimestamp),
            0x05 => Ok(PacketType::TtmlInfo),
            0x06 => Ok(PacketType::CcData),
            0x07 => Ok(PacketType::WebvttData),
            0x08 => Ok(PacketType::WebvttTimestamp),

            0x10 => Ok(PacketType::SubtitleSelection),
            0x11 => Ok(PacketType::TeletextSelection),
            0x12 => Ok(PacketType::TtmlSelection),
            0x13 => Ok(PacketType::WebvttSelection),

            0x20 => Ok(PacketType::ResetAll),
            0x21 => Ok(PacketType::ResetChannel),
            0x22 => Ok(PacketType::Pause),
            0x23 => Ok(PacketType::Resume),
            0x24 => Ok(PacketType::Mute),
            0x25 => Ok(PacketType::Unmute),
            0x26 => Ok(PacketType::SetCcAttributes),

            0xFFFF_FFFF => Ok(PacketType::Invalid),

            _ => Err(TrackError::UnknownVariant {
                type_name: "PacketType",
                value: value as u64,
            }),
        }
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl PacketType {
    /// Returns `true` for media data packets that carry a payload for
    /// the active decoder.
    pub fn is_data(&self) -> bool {
        matches!(
            self,
            PacketType::PesData
                | PacketType::TtmlData
                | PacketType::CcData
                | PacketType::WebvttData
        )
    }

    /// Returns `true` for decoder selection packets.
    pub fn is_selection(&self) -> bool {
        matches!(
            self,
            PacketType::SubtitleSelection
                | PacketType::TeletextSelection
                | PacketType::TtmlSelection
                | PacketType::WebvttSelection
        )
    }
}

// ── SessionType ──────────────────────────────────────────────────

/// Which decoder variant is currently active in a session, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionType {
    /// No active decoder.
    #[default]
    None,
    /// CEA-608/708 closed captions.
    Cc,
    /// Teletext subtitles.
    Ttx,
    /// DVB bitmap subtitles.
    Dvb,
    /// WebVTT cues.
    Webvtt,
    /// TTML documents.
    Ttml,
    /// SCTE-27 subtitles.
    Scte,
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionType::None => "NONE",
            SessionType::Cc => "CC",
            SessionType::Ttx => "TTX",
            SessionType::Dvb => "DVB",
            SessionType::Webvtt => "WEBVTT",
            SessionType::Ttml => "TTML",
            SessionType::Scte => "SCTE",
        };
        write!(f, "{name}")
    }
}

// ── DataType ─────────────────────────────────────────────────────

/// The kind of media payload handed to [`send_data`].
///
/// [`send_data`]: crate::session::RenderSession::send_data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// PES-wrapped data (DVB, teletext, SCTE).
    Pes,
    /// TTML document fragment.
    Ttml,
    /// CEA-608/708 caption triplets.
    Cc,
    /// WebVTT cue text.
    Webvtt,
}

// ── Subtitle kind (SUBTITLE_SELECTION payload word 0) ────────────

/// Sub-type carried in the first payload word of a
/// [`PacketType::SubtitleSelection`] packet.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleKind {
    Dvb = 0,
    Scte = 1,
    Cc = 2,
    Teletext = 3,
}

impl TryFrom<u32> for SubtitleKind {
    type Error = TrackError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SubtitleKind::Dvb),
            1 => Ok(SubtitleKind::Scte),
            2 => Ok(SubtitleKind::Cc),
            3 => Ok(SubtitleKind::Teletext),
            _ => Err(TrackError::UnknownVariant {
                type_name: "SubtitleKind",
                value: value as u64,
            }),
        }
    }
}

// ── Closed-caption services ──────────────────────────────────────

/// CEA caption service family.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CcServiceType {
    Cea608 = 0,
    Cea708 = 1,
}

impl TryFrom<u32> for CcServiceType {
    type Error = TrackError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CcServiceType::Cea608),
            1 => Ok(CcServiceType::Cea708),
            _ => Err(TrackError::UnknownVariant {
                type_name: "CcServiceType",
                value: value as u64,
            }),
        }
    }
}

/// A parsed closed-caption service selection.
///
/// The wire grammar is the one the host hands us:
/// - `SERVICE<N>` — CEA-708 service `N`
/// - `CC<N>` — CEA-608 caption channel, renumbered to `1000 + (N-1)`
/// - `TEXT<N>` — CEA-608 text channel, renumbered to `1004 + (N-1)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CcService {
    pub service_type: CcServiceType,
    pub service_id: u32,
}

impl CcService {
    /// Parse a service-name string. Anything outside the grammar is
    /// rejected without side effects.
    pub fn parse(service: &str) -> Result<Self, TrackError> {
        let reject = || TrackError::InvalidServiceString(service.to_string());
        if let Some(digits) = service.strip_prefix("SERVICE") {
            let n: u32 = digits.parse().map_err(|_| reject())?;
            Ok(CcService {
                service_type: CcServiceType::Cea708,
                service_id: n,
            })
        } else if let Some(digits) = service.strip_prefix("CC") {
            let n: u32 = digits.parse().map_err(|_| reject())?;
            Ok(CcService {
                service_type: CcServiceType::Cea608,
                service_id: 1000 + n.saturating_sub(1),
            })
        } else if let Some(digits) = service.strip_prefix("TEXT") {
            let n: u32 = digits.parse().map_err(|_| reject())?;
            Ok(CcService {
                service_type: CcServiceType::Cea608,
                service_id: 1004 + n.saturating_sub(1),
            })
        } else {
            Err(reject())
        }
    }
}

impl std::str::FromStr for CcService {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CcService::parse(s)
    }
}

// ── Teletext page addressing ─────────────────────────────────────

/// A teletext page split into (magazine, page-within-magazine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtxPage {
    pub magazine: u32,
    pub page: u32,
}

impl TtxPage {
    /// Map a 3-digit decimal page number to its magazine/page pair.
    /// Magazine 8 is transmitted as 0.
    pub fn from_decimal(page: u16) -> Self {
        TtxPage {
            magazine: if page >= 800 { 0 } else { u32::from(page) / 100 },
            page: u32::from(page) % 100,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
