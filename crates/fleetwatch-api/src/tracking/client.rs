// REST vendor HTTP client
//
// Session lifecycle: `UserAuthenticate` exchanges credentials for a
// `UserIdGuid` + `SessionId` pair valid for 24 hours; both ride along as
// query parameters on every data call. A data response whose envelope
// reports a session/authentication problem clears the stored session so
// the next call re-authenticates.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::tracking::models::{AuthResult, Envelope};
use crate::transport::{AUTH_TIMEOUT, FETCH_TIMEOUT, TransportConfig, classify};

/// Production endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://api.3dtracking.net/api/v1.0";

/// Sessions are valid for 24 hours; renew slightly early so an in-flight
/// request never straddles the cutoff.
const SESSION_LIFETIME_MINUTES: i64 = 23 * 60 + 50;

/// How far back the positions request reaches.
const POSITION_WINDOW_DAYS: i64 = 30;

/// The vendor's query-string timestamp format, e.g. `03 Jan 2026 14:05:00`.
const VENDOR_DATE_FORMAT: &str = "%d %b %Y %H:%M:%S";

#[derive(Debug, Clone)]
struct Session {
    user_id_guid: String,
    session_id: String,
    expires_at: DateTime<Utc>,
}

impl Session {
    fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Client for the REST vendor API.
pub struct TrackingClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: SecretString,
    /// Session state behind an async mutex: `ensure_valid()` holds the
    /// lock across re-authentication, so concurrent callers discovering
    /// an expired session cannot stack auth requests.
    session: Mutex<Option<Session>>,
}

impl TrackingClient {
    /// Create a client against the production endpoint.
    pub fn new(
        username: String,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(DEFAULT_BASE_URL)?;
        Self::with_base_url(base_url, username, password, transport)
    }

    /// Create a client against an arbitrary endpoint root (tests, proxies).
    pub fn with_base_url(
        base_url: Url,
        username: String,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            base_url,
            username,
            password,
            session: Mutex::new(None),
        })
    }

    /// The endpoint root this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Exchange credentials for a fresh session.
    ///
    /// Callers normally go through [`ensure_valid`](Self::ensure_valid);
    /// this is public so setup can fail fast on bad credentials.
    pub async fn authenticate(&self) -> Result<(), Error> {
        let mut guard = self.session.lock().await;
        *guard = Some(self.login().await?);
        Ok(())
    }

    /// Make sure a usable session exists, re-authenticating if the stored
    /// one is absent or expired. Returns the active identifiers.
    ///
    /// Single-flight: the session lock is held across the login call, so
    /// at most one authentication is in flight per client. Waiters re-check
    /// validity after acquiring the lock and reuse the fresh session.
    pub async fn ensure_valid(&self) -> Result<(String, String), Error> {
        let mut guard = self.session.lock().await;
        if let Some(session) = guard.as_ref() {
            if session.is_valid(Utc::now()) {
                return Ok((session.user_id_guid.clone(), session.session_id.clone()));
            }
            debug!("session expired, re-authenticating");
        }

        let session = self.login().await?;
        let ids = (session.user_id_guid.clone(), session.session_id.clone());
        *guard = Some(session);
        Ok(ids)
    }

    async fn login(&self) -> Result<Session, Error> {
        let url = self.endpoint("Authentication/UserAuthenticate")?;
        debug!("authenticating at {}", url);

        let resp = self
            .http
            .get(url)
            .query(&[
                ("UserName", self.username.as_str()),
                ("Password", self.password.expose_secret()),
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

        let envelope: Envelope<AuthResult> =
            resp.json().await.map_err(|e| Error::Authentication {
                message: format!("malformed login response: {e}"),
            })?;

        if !envelope.status.is_ok() {
            let message = envelope.status.message_or("unknown authentication error");
            warn!("authentication rejected: {message}");
            return Err(Error::Authentication { message });
        }

        let result = envelope.result.ok_or_else(|| Error::Authentication {
            message: "login response missing Result data".into(),
        })?;
        let (Some(user_id_guid), Some(session_id)) = (result.user_id_guid, result.session_id)
        else {
            return Err(Error::Authentication {
                message: "login response missing session identifiers".into(),
            });
        };

        let expires_at = Utc::now() + ChronoDuration::minutes(SESSION_LIFETIME_MINUTES);
        debug!("authenticated, session valid until {expires_at}");
        Ok(Session {
            user_id_guid,
            session_id,
            expires_at,
        })
    }

    /// Fetch the latest position payload for every unit on the account.
    ///
    /// Requests data newer than 30 days back and returns the raw unit list
    /// verbatim; normalization happens downstream. A session-related error
    /// in the envelope clears the stored session and surfaces as
    /// [`Error::SessionExpired`] so the poll loop retries next tick.
    pub async fn latest_positions(&self) -> Result<Vec<Value>, Error> {
        let (user_id_guid, session_id) = self.ensure_valid().await?;

        let url = self.endpoint("Units/LatestPositionsList")?;
        let window_start = Utc::now() - ChronoDuration::days(POSITION_WINDOW_DAYS);

        debug!("requesting latest positions");
        let resp = self
            .http
            .get(url)
            .query(&[
                ("UserIdGuid", user_id_guid.as_str()),
                ("SessionId", session_id.as_str()),
                (
                    "LastDateReceivedUtc",
                    &window_start.format(VENDOR_DATE_FORMAT).to_string(),
                ),
            ])
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| classify(e, FETCH_TIMEOUT))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Api {
                message: format!("positions request failed (HTTP {status})"),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let envelope: Envelope<Vec<Value>> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })?;

        if !envelope.status.is_ok() {
            let message = envelope.status.message_or("unknown error getting positions");
            let lowered = message.to_lowercase();
            if lowered.contains("session") || lowered.contains("authentication") {
                warn!("session rejected by vendor: {message}");
                self.session.lock().await.take();
                return Err(Error::SessionExpired);
            }
            return Err(Error::Api { message });
        }

        Ok(envelope.result.unwrap_or_default())
    }

    /// Drop the stored session. The next call re-authenticates.
    pub async fn invalidate_session(&self) {
        self.session.lock().await.take();
    }

    /// Whether a session is currently stored (regardless of expiry).
    pub async fn has_session(&self) -> bool {
        self.session.lock().await.is_some()
    }
}
