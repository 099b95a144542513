//! System-time-clock / media-timestamp correlation.
//!
//! Timestamp packets carry (STC, media-timestamp) pairs. The provider
//! stores the most recent correlation and is shared by `Arc` between
//! the session and whichever decoder is active, so decoders created
//! across re-selections observe one consistent timeline.

use std::sync::{Mutex, PoisonError};

/// One clock/timestamp correlation pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StcCorrelation {
    /// System time clock value at the correlation point.
    pub stc: u32,
    /// Media timestamp in milliseconds at the same point.
    pub timestamp_ms: u64,
}

/// Shared time-reference provider.
#[derive(Debug, Default)]
pub struct StcProvider {
    latest: Mutex<Option<StcCorrelation>>,
}

impl StcProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a correlation pair from a timestamp packet.
    pub fn process_timestamp(&self, stc: u32, timestamp_ms: u64) {
        let mut latest = self
            .latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *latest = Some(StcCorrelation { stc, timestamp_ms });
    }

    /// The most recent correlation, if any timestamp arrived yet.
    pub fn latest(&self) -> Option<StcCorrelation> {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Media time for an STC reading, extrapolated from the latest
    /// correlation at 90 kHz. `None` until a correlation exists.
    pub fn media_time_ms(&self, stc: u32) -> Option<u64> {
        self.latest().map(|corr| {
            let delta_ticks = stc.wrapping_sub(corr.stc);
            corr.timestamp_ms + u64::from(delta_ticks) / 90
        })
    }
}
