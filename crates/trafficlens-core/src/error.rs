// ── Core error types ──
//
// User-facing errors from trafficlens-core. Transport details from
// trafficlens-api are folded into a small set of domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach detection server: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Telemetry channel is closed")]
    ChannelClosed,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Malformed '{event}' event: {message}")]
    Decode { event: String, message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn decode(event: &str, message: impl Into<String>) -> Self {
        Self::Decode {
            event: event.to_owned(),
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<trafficlens_api::Error> for CoreError {
    fn from(err: trafficlens_api::Error) -> Self {
        match err {
            trafficlens_api::Error::ChannelClosed => CoreError::ChannelClosed,
            trafficlens_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid server URL: {e}"),
            },
            trafficlens_api::Error::UnsupportedScheme(scheme) => CoreError::Config {
                message: format!("unsupported server URL scheme '{scheme}'"),
            },
            other => CoreError::ConnectionFailed {
                reason: other.to_string(),
            },
        }
    }
}
