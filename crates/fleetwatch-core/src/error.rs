// ── Core error types ──
//
// User-facing errors from fleetwatch-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<fleetwatch_api::Error>` impl translates transport-layer
// errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Cannot reach the tracking service: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Unit not found: {identifier}")]
    UnitNotFound { identifier: String },

    #[error("Update failed: {message}")]
    UpdateFailed { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<fleetwatch_api::Error> for CoreError {
    fn from(err: fleetwatch_api::Error) -> Self {
        match err {
            fleetwatch_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            fleetwatch_api::Error::SessionExpired => CoreError::AuthenticationFailed {
                message: "Session expired -- re-authentication required".into(),
            },
            fleetwatch_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::UpdateFailed {
                        message: e.to_string(),
                    }
                }
            }
            fleetwatch_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            fleetwatch_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            fleetwatch_api::Error::Api { message } => CoreError::UpdateFailed { message },
            fleetwatch_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
