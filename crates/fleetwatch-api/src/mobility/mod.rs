//! Scraping vendor surface.
//!
//! Form-POST login whose JSON response carries per-user display
//! preferences (units, timezone, date format) instead of an explicit
//! session token; the session itself lives in a cookie. The units
//! endpoint returns a JSON/HTML hybrid: structured position fields plus
//! an embedded HTML fragment listing boolean indicators.

mod client;
mod models;
mod prefs;

pub use client::MobilityClient;
pub use models::{MobilitySensorInput, MobilityUnit, RawId, RawMobilityUnit, UnitsResponse};
pub use prefs::UserPreferences;
