//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use fleetwatch_config::ConfigError;
use fleetwatch_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Could not reach the tracking service")]
    #[diagnostic(
        code(fleetwatch::connection_failed),
        help("Check your network connection and the service status.\nReason: {reason}")
    )]
    ConnectionFailed { reason: String },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(fleetwatch::auth_failed),
        help(
            "Verify the username and password for your account.\n\
             Run: fleetwatch config show"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured")]
    #[diagnostic(
        code(fleetwatch::no_credentials),
        help(
            "Create a config file with: fleetwatch config init\n\
             Or set FLEETWATCH_USERNAME and FLEETWATCH_PASSWORD."
        )
    )]
    NoCredentials,

    #[error("Unit '{identifier}' not found")]
    #[diagnostic(
        code(fleetwatch::not_found),
        help("Run: fleetwatch units to see available units")
    )]
    UnitNotFound { identifier: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(fleetwatch::timeout),
        help("Increase the timeout with --timeout or check the service status.")
    )]
    Timeout { seconds: u64 },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(fleetwatch::validation))]
    Validation { field: String, reason: String },

    #[error("Update failed: {message}")]
    #[diagnostic(code(fleetwatch::update_failed))]
    UpdateFailed { message: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(fleetwatch::config),
        help("Check the config file with: fleetwatch config show")
    )]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(fleetwatch::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials => exit_code::AUTH,
            Self::UnitNotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::UnitNotFound { identifier } => CliError::UnitNotFound { identifier },
            CoreError::UpdateFailed { message } => CliError::UpdateFailed { message },
            CoreError::Config { message } => CliError::Config { message },
            CoreError::Internal(message) => CliError::UpdateFailed { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials => CliError::NoCredentials,
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
