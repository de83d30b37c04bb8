use thiserror::Error;

/// Top-level error type for the `trafficlens-api` crate.
///
/// Covers URL handling, the WebSocket transport and the Engine.IO /
/// Socket.IO handshake. `trafficlens-core` maps these into its own
/// diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── URL ─────────────────────────────────────────────────────────
    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Scheme that cannot be mapped onto a WebSocket endpoint.
    #[error("Unsupported URL scheme '{0}' (expected http, https, ws or wss)")]
    UnsupportedScheme(String),

    // ── Transport ───────────────────────────────────────────────────
    /// WebSocket connection failed or broke mid-stream.
    #[error("WebSocket connection failed: {0}")]
    WebSocketConnect(String),

    /// No Engine.IO open / Socket.IO connect within the allotted time.
    #[error("Handshake timed out after {timeout_secs}s")]
    HandshakeTimeout { timeout_secs: u64 },

    // ── Protocol ────────────────────────────────────────────────────
    /// The server answered the namespace connect with a connect error.
    #[error("Server refused the connection: {message}")]
    ConnectRefused { message: String },

    /// A frame that does not follow Engine.IO v4 / Socket.IO v5 framing.
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    // ── Handle ──────────────────────────────────────────────────────
    /// The background channel task is gone; nothing can be emitted.
    #[error("Channel task has shut down")]
    ChannelClosed,
}

impl Error {
    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::WebSocketConnect(_) | Self::HandshakeTimeout { .. }
        )
    }
}
