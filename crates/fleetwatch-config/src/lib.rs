//! Shared configuration for the fleetwatch CLI.
//!
//! TOML config file, `FLEETWATCH_*` environment overrides, and credential
//! resolution (env var + plaintext). The CLI layers its flag overrides on
//! top of what this crate loads.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Poll interval bounds; values outside are clamped, not rejected, so a
/// typo'd config degrades instead of refusing to start.
pub const MIN_POLL_INTERVAL_SECS: u64 = 10;
pub const MAX_POLL_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured -- set username/password in the config file or FLEETWATCH_USERNAME/FLEETWATCH_PASSWORD")]
    NoCredentials,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config structs ──────────────────────────────────────────────────

/// Which vendor surface the account belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    /// REST API with explicit session tokens.
    Tracking,
    /// Web portal with a cookie session and JSON/HTML hybrid payloads.
    Mobility,
}

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub vendor: Vendor,

    pub username: Option<String>,

    /// Plaintext password (prefer `FLEETWATCH_PASSWORD`).
    pub password: Option<String>,

    /// Override the vendor's default base URL (mainly for testing).
    pub base_url: Option<String>,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vendor: Vendor::Tracking,
            username: None,
            password: None,
            base_url: None,
            poll_interval_secs: default_poll_interval(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}
fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Poll interval clamped to the supported range.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(
            self.poll_interval_secs
                .clamp(MIN_POLL_INTERVAL_SECS, MAX_POLL_INTERVAL_SECS),
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the base URL override, when present.
    pub fn base_url(&self) -> Result<Option<url::Url>, ConfigError> {
        self.base_url
            .as_deref()
            .map(|raw| {
                raw.parse().map_err(|_| ConfigError::Validation {
                    field: "base_url".into(),
                    reason: format!("invalid URL: {raw}"),
                })
            })
            .transpose()
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "fleetwatch", "fleetwatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("fleetwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from file + environment. `FLEETWATCH_*` variables
/// override file values.
pub fn load_config() -> Result<Config, ConfigError> {
    load_from(Toml::file(config_path()))
}

fn load_from<P>(file: P) -> Result<Config, ConfigError>
where
    P: figment::Provider,
{
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(file)
        .merge(Env::prefixed("FLEETWATCH_"))
        .extract()?;
    Ok(config)
}

/// Serialize config to TOML and write it to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve account credentials: config file values win only when the
/// corresponding environment variable is absent (figment already merged
/// `FLEETWATCH_USERNAME`/`FLEETWATCH_PASSWORD` into the config).
pub fn resolve_credentials(config: &Config) -> Result<(String, SecretString), ConfigError> {
    let username = config.username.clone().ok_or(ConfigError::NoCredentials)?;
    let password = config
        .password
        .clone()
        .map(SecretString::from)
        .ok_or(ConfigError::NoCredentials)?;
    Ok((username, password))
}
