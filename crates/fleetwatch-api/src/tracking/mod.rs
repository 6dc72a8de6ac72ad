//! REST/JSON vendor surface.
//!
//! Query-string session auth plus a "latest positions" poll endpoint.
//! Responses use a `{ Status: { Result, Message }, Result: ... }` envelope.

mod client;
mod models;

pub use client::TrackingClient;
pub use models::{AuthResult, Envelope, EnvelopeStatus};
