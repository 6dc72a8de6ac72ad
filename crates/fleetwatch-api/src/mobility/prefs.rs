// Per-user preference parsing.
//
// The login response carries a flat list of `{ Value, Text }` options.
// Which option means what is inferred from its content: recognized speed
// and temperature unit values, a "(GMT ±H:MM" text, and a text containing
// "dateformat." with the pattern in `Value`. Unrecognized options are
// ignored.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use regex::Regex;
use tracing::debug;

use crate::mobility::models::{LoginResponse, PreferenceOption};

static GMT_OFFSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(GMT ([-+]?\d+):(\d+)").expect("GMT offset pattern is valid")
});

const SPEED_UNITS: [&str; 3] = ["Km/h", "Miles/h", "Knots"];
const TEMP_UNITS: [&str; 2] = ["celsius", "fahrenheit"];

/// Display preferences attached to a scraping-vendor account.
///
/// These drive normalization: the speed and temperature units label the
/// corresponding readings, and the timezone + date format decode the
/// unit's last-report timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPreferences {
    pub user_id: Option<String>,
    pub speed_unit: Option<String>,
    pub temperature_unit: Option<String>,
    /// Minutes east of UTC, computed as `hours * 60 - minutes` exactly as
    /// the vendor portal does. For offsets with a minutes component this
    /// subtracts rather than adds; kept verbatim pending clarification.
    pub utc_offset_minutes: Option<i32>,
    /// strftime-style pattern for `LatestPointReceivedDateTimeFormatted`.
    pub date_format: Option<String>,
}

impl UserPreferences {
    pub(crate) fn from_login(login: &LoginResponse) -> Self {
        let mut prefs = Self {
            user_id: login.id.as_ref().map(ToString::to_string),
            ..Self::default()
        };
        for option in &login.preferences {
            prefs.absorb(option);
        }
        debug!(?prefs, "parsed user preferences");
        prefs
    }

    fn absorb(&mut self, option: &PreferenceOption) {
        if SPEED_UNITS.contains(&option.value.as_str()) {
            self.speed_unit = Some(option.value.clone());
        } else if TEMP_UNITS.contains(&option.value.as_str()) {
            self.temperature_unit = Some(option.text.clone());
        } else if let Some(caps) = GMT_OFFSET.captures(&option.text) {
            let hours: i32 = caps[1].parse().unwrap_or(0);
            let minutes: i32 = caps[2].parse().unwrap_or(0);
            self.utc_offset_minutes = Some(hours * 60 - minutes);
        } else if option.text.contains("dateformat.") {
            self.date_format = Some(convert_date_format(&option.value));
        }
    }

    /// Parse a vendor-formatted local timestamp into UTC using the
    /// account's date format and timezone offset. Returns `None` when
    /// either preference is missing or the string doesn't match.
    pub fn parse_timestamp(&self, raw: &str) -> Option<DateTime<Utc>> {
        let format = self.date_format.as_deref()?;
        let offset_minutes = self.utc_offset_minutes.unwrap_or(0);
        let naive = NaiveDateTime::parse_from_str(raw, format).ok()?;
        let offset = FixedOffset::east_opt(offset_minutes * 60)?;
        naive
            .and_local_timezone(offset)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Translate the vendor's date-format tokens (`dd MMM yyyy`, `mm/dd/yyyy`,
/// ...) into a strftime pattern, with the time component appended.
fn convert_date_format(vendor_pattern: &str) -> String {
    format!("{vendor_pattern} %H:%M:%S")
        .replace("dd", "%d")
        .replace("MMM", "%b")
        .replace("mm", "%m")
        .replace("yyyy", "%Y")
}
