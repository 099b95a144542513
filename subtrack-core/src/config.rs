//! Configuration for rendering sessions.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Video geometry defaults.
    pub video: VideoConfig,
    /// Unix socket transport settings.
    pub socket: SocketConfig,
    /// Teletext settings.
    pub teletext: TeletextConfig,
    /// TTML settings.
    pub ttml: TtmlConfig,
}

/// Video geometry defaults used when a selection carries no dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Default video width in pixels.
    pub width: u32,
    /// Default video height in pixels.
    pub height: u32,
}

/// Unix socket transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SocketConfig {
    /// Permission bits applied to the socket file after bind (octal).
    pub permissions: u32,
    /// How many times to retry the permission adjustment.
    pub permission_retries: u32,
    /// Delay between permission retries, in milliseconds.
    pub permission_retry_delay_ms: u64,
}

/// Teletext settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TeletextConfig {
    /// Page selected when the host gives none.
    pub default_page: u16,
}

/// TTML settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TtmlConfig {
    /// Style-override preset applied to TTML sessions that carry no
    /// custom styling. Empty means no preset.
    pub style_overrides: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            permissions: 0o666,
            permission_retries: 20,
            permission_retry_delay_ms: 10,
        }
    }
}

impl Default for TeletextConfig {
    fn default() -> Self {
        Self { default_page: 888 }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl RenderConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
