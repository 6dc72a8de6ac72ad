// Wire types for the REST vendor's response envelope.

use serde::Deserialize;

/// Outer envelope on every response: `{ Status: {...}, Result: ... }`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(rename = "Status")]
    pub status: EnvelopeStatus,
    #[serde(rename = "Result")]
    pub result: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct EnvelopeStatus {
    #[serde(rename = "Result")]
    pub result: Option<String>,
    #[serde(rename = "Message")]
    pub message: Option<String>,
}

impl EnvelopeStatus {
    pub fn is_ok(&self) -> bool {
        self.result.as_deref() == Some("ok")
    }

    /// The vendor's error message, or a fixed fallback when absent.
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| fallback.to_owned())
    }
}

/// Payload of a successful authentication call.
#[derive(Debug, Deserialize)]
pub struct AuthResult {
    #[serde(rename = "UserIdGuid")]
    pub user_id_guid: Option<String>,
    #[serde(rename = "SessionId")]
    pub session_id: Option<String>,
}
