use thiserror::Error;

/// Top-level error type for the `fleetwatch-api` crate.
///
/// Covers every failure mode across both vendor surfaces: authentication,
/// transport, API-level rejections, and payload decoding. `fleetwatch-core`
/// maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong credentials, account locked, malformed login
    /// response, etc.). Fatal during setup; recoverable by re-auth later.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The stored session was rejected by the vendor. The client has
    /// already cleared it; the next `ensure_valid()` re-authenticates.
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request exceeded its per-call deadline.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── API ─────────────────────────────────────────────────────────
    /// Vendor rejected the request at the API level (non-ok status in the
    /// response envelope, unexpected HTTP status, etc.)
    #[error("API error: {message}")]
    Api { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// Response body could not be decoded, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates auth has expired
    /// and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    /// Returns `true` if this is a transient error worth retrying on the
    /// caller's schedule (the poll coordinator's next tick).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } | Self::SessionExpired => true,
            _ => false,
        }
    }
}
