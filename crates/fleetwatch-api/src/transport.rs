// Shared transport configuration for building reqwest::Client instances.
//
// Both vendor clients share timeout and cookie settings through this
// module. The scraping vendor needs a cookie jar (its session lives in a
// cookie set by the login form); the REST vendor passes its session as
// query parameters and runs without one.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;

/// Deadline for authentication calls.
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Deadline for data-retrieval calls.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Client-wide fallback timeout; individual calls set tighter
    /// per-request deadlines.
    pub timeout: Duration,
    pub cookie_jar: Option<Arc<Jar>>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            cookie_jar: None,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("fleetwatch/", env!("CARGO_PKG_VERSION")));

        if let Some(ref jar) = self.cookie_jar {
            builder = builder.cookie_provider(Arc::clone(jar));
        }

        builder.build().map_err(crate::error::Error::Transport)
    }

    /// Create a config with a fresh cookie jar (for form-session auth).
    pub fn with_cookie_jar(mut self) -> Self {
        self.cookie_jar = Some(Arc::new(Jar::default()));
        self
    }
}

/// Map a reqwest error to the crate error, turning per-request deadline
/// hits into the dedicated `Timeout` variant so callers can tell a slow
/// vendor apart from a broken one.
pub(crate) fn classify(err: reqwest::Error, deadline: Duration) -> crate::error::Error {
    if err.is_timeout() {
        crate::error::Error::Timeout {
            timeout_secs: deadline.as_secs(),
        }
    } else {
        crate::error::Error::Transport(err)
    }
}
