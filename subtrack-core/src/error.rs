//! Domain-specific error types for the subtrack protocol core.
//!
//! All fallible operations return `Result<T, TrackError>`.
//! Protocol anomalies are recoverable by design: a malformed packet is
//! logged and dropped by the caller, never propagated across the render
//! thread as a panic.

use thiserror::Error;

/// The canonical error type for the subtrack session core.
#[derive(Debug, Error)]
pub enum TrackError {
    // ── Protocol Errors ──────────────────────────────────────────
    /// The buffer is too short to hold a packet header.
    #[error("header truncated: need {expected} bytes, have {actual}")]
    HeaderTruncated { expected: usize, actual: usize },

    /// The declared payload length does not match the bytes that follow
    /// the header.
    #[error("payload length mismatch: declared {declared}, remaining {remaining}")]
    PayloadLengthMismatch { declared: usize, remaining: usize },

    /// A payload field could not be read because the payload ended early.
    #[error("payload truncated: need {expected} more bytes, have {actual}")]
    PayloadTruncated { expected: usize, actual: usize },

    /// The declared payload exceeds the configured maximum size.
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// A numeric value did not map to any known enum variant.
    #[error("unknown {type_name} discriminant: {value:#x}")]
    UnknownVariant { type_name: &'static str, value: u64 },

    /// A closed-caption service string did not match the
    /// `SERVICE<N>` / `CC<N>` / `TEXT<N>` grammar.
    #[error("invalid closed-caption service string: {0:?}")]
    InvalidServiceString(String),

    // ── Transport Errors ─────────────────────────────────────────
    /// The socket transport failed; fatal to session start.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// The session has no socket path, so no transport can be created.
    #[error("session has no socket path")]
    NoSocketPath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = TrackError::HeaderTruncated {
            expected: 16,
            actual: 3,
        };
        assert!(e.to_string().contains("16"));
        assert!(e.to_string().contains("3"));

        let e = TrackError::InvalidServiceString("BOGUS".into());
        assert!(e.to_string().contains("BOGUS"));
    }

    #[test]
    fn from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "taken");
        let e: TrackError = io_err.into();
        assert!(matches!(e, TrackError::Transport(_)));
    }
}
