// Scraping vendor HTTP client
//
// Cookie-based session: the login form POST sets a session cookie in the
// client's jar and returns the user's display preferences as JSON. There
// is no expiry signal; session validity is inferred from subsequent calls.
// A units response that fails to decode as JSON (the portal serves an
// HTML login page once the cookie dies) invalidates the session so the
// next call re-authenticates.

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::mobility::models::{LoginResponse, RawMobilityUnit, UnitsResponse};
use crate::mobility::prefs::UserPreferences;
use crate::transport::{AUTH_TIMEOUT, FETCH_TIMEOUT, TransportConfig, classify};

/// Production portal root.
pub const DEFAULT_BASE_URL: &str = "https://g4smobility.com";

/// Client for the scraping vendor portal.
pub struct MobilityClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: SecretString,
    /// Parsed preferences double as the "logged in" marker. Guarded by an
    /// async mutex so concurrent callers can't stack login requests.
    prefs: Mutex<Option<UserPreferences>>,
}

impl MobilityClient {
    /// Create a client against the production portal.
    pub fn new(
        username: String,
        password: SecretString,
        transport: TransportConfig,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(DEFAULT_BASE_URL)?;
        Self::with_base_url(base_url, username, password, transport)
    }

    /// Create a client against an arbitrary portal root (tests, proxies).
    ///
    /// A cookie jar is added if the transport config lacks one; the
    /// session cannot work without it.
    pub fn with_base_url(
        base_url: Url,
        username: String,
        password: SecretString,
        transport: TransportConfig,
    ) -> Result<Self, Error> {
        let transport = if transport.cookie_jar.is_some() {
            transport
        } else {
            transport.with_cookie_jar()
        };
        Ok(Self {
            http: transport.build_client()?,
            base_url,
            username,
            password,
            prefs: Mutex::new(None),
        })
    }

    /// The portal root this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Log in and parse the account preferences from the response.
    pub async fn authenticate(&self) -> Result<UserPreferences, Error> {
        let mut guard = self.prefs.lock().await;
        let prefs = self.login().await?;
        *guard = Some(prefs.clone());
        Ok(prefs)
    }

    /// Make sure the client is logged in, returning the account
    /// preferences. There is no expiry to check; only a missing session
    /// triggers a login. Holds the preference lock across login so at
    /// most one authentication is in flight.
    pub async fn ensure_valid(&self) -> Result<UserPreferences, Error> {
        let mut guard = self.prefs.lock().await;
        if let Some(prefs) = guard.as_ref() {
            return Ok(prefs.clone());
        }
        let prefs = self.login().await?;
        *guard = Some(prefs.clone());
        Ok(prefs)
    }

    async fn login(&self) -> Result<UserPreferences, Error> {
        let url = self.base_url.join("/Account/LogOnV3")?;
        debug!("logging in at {}", url);

        let resp = self
            .http
            .post(url)
            .form(&[
                ("username", self.username.as_str()),
                ("password", self.password.expose_secret()),
                ("action", "log on"),
                ("ReturnUrl", "/User/Fetch"),
            ])
            .timeout(AUTH_TIMEOUT)
            .send()
            .await
            .map_err(|e| classify(e, AUTH_TIMEOUT))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status})"),
            });
        }

        // A failed login serves the HTML login page instead of JSON.
        let body = resp.text().await.map_err(Error::Transport)?;
        let login: LoginResponse =
            serde_json::from_str(&body).map_err(|_| Error::Authentication {
                message: "login response is not JSON -- wrong credentials?".into(),
            })?;

        debug!("login successful");
        Ok(UserPreferences::from_login(&login))
    }

    /// Fetch the full unit list (the portal is always asked to reset its
    /// incremental-request cursor, so every poll carries complete state).
    ///
    /// Returns the preferences alongside the raw units; normalization
    /// needs both. A non-JSON body means the session cookie died: the
    /// stored session is cleared and [`Error::SessionExpired`] surfaces
    /// for the poll loop to retry on its own schedule.
    pub async fn units(&self) -> Result<(UserPreferences, Vec<RawMobilityUnit>), Error> {
        let prefs = self.ensure_valid().await?;

        let url = self.base_url.join("/Live/Unit/Units")?;
        debug!("requesting unit list");
        let resp = self
            .http
            .get(url)
            .query(&[("ResetRequestDate", "true")])
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| classify(e, FETCH_TIMEOUT))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Api {
                message: format!("unit list request failed (HTTP {status})"),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        match serde_json::from_str::<UnitsResponse>(&body) {
            Ok(parsed) => Ok((prefs, parsed.units)),
            Err(_) => {
                warn!("unit list response is not JSON, invalidating session");
                self.prefs.lock().await.take();
                Err(Error::SessionExpired)
            }
        }
    }

    /// Drop the stored session. The next call re-authenticates.
    pub async fn invalidate_session(&self) {
        self.prefs.lock().await.take();
    }

    /// Whether the client currently considers itself logged in.
    pub async fn has_session(&self) -> bool {
        self.prefs.lock().await.is_some()
    }
}
