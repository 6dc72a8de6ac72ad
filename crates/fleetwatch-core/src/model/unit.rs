// ── Unit domain types ──
//
// One `UnitRecord` per tracked vehicle, normalized from either vendor
// surface. Every positional field is optional: a missing key in the raw
// payload yields an absent value, never an error.

use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Stable vendor-assigned unit identifier.
///
/// Correlates records across polls; the wire representation varies
/// (GUID strings on one vendor, numeric ids on the other) so it is kept
/// as opaque text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(String);

impl UnitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Last known position and motion state of a unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub heading: Option<f64>,
    pub speed: Option<f64>,
    pub speed_unit: Option<String>,
    pub address: Option<String>,
    /// Free-text ignition state as reported by the vendor.
    pub ignition: Option<String>,
    pub engine_status: Option<String>,
    pub odometer: Option<f64>,
    pub gps_time: Option<DateTime<Utc>>,
}

impl Position {
    /// Whether the position carries usable coordinates.
    pub fn has_fix(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Device-class hint for a numeric reading (presentation only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SensorClass {
    Speed,
    Distance,
    Temperature,
    Voltage,
    Battery,
    Humidity,
    Duration,
    Timestamp,
}

/// Whether a reading is a point-in-time measurement or a monotonically
/// increasing counter (odometer, engine hours).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateClass {
    #[default]
    Measurement,
    TotalIncreasing,
}

/// Diagnostic readings are secondary telemetry about the tracker itself
/// (battery, signal); everything else is primary vehicle telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityCategory {
    Diagnostic,
}

/// Value of a named sensor reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReadingValue {
    Number(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl ReadingValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for ReadingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
        }
    }
}

/// A named numeric/text telemetry value with unit and presentation hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub name: String,
    pub value: ReadingValue,
    pub unit: Option<String>,
    pub device_class: Option<SensorClass>,
    pub state_class: StateClass,
    pub category: Option<EntityCategory>,
}

/// Semantic category for a boolean indicator (presentation only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum IndicatorClass {
    Door,
    Window,
    Motion,
    Safety,
    Power,
    Sound,
    Tamper,
    Vibration,
    Lock,
    Light,
}

/// A named boolean state derived from vendor color/state coding.
///
/// `active == None` means the vendor's encoding was unrecognized and the
/// state is indeterminate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryIndicator {
    pub name: String,
    pub active: Option<bool>,
    pub device_class: Option<IndicatorClass>,
    /// Stable position of the indicator within the vendor's list; part of
    /// the identity because labels repeat across physical inputs.
    pub slot: usize,
}

/// Full normalized record for one tracked vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub id: UnitId,
    pub name: String,
    /// Cleared when the vendor stops reporting the unit or its data goes
    /// stale; last-known values are retained either way.
    pub available: bool,
    pub position: Option<Position>,
    /// Keyed by reading name; insertion order preserved for stable output.
    pub sensors: IndexMap<String, SensorReading>,
    /// Keyed by `{label}_{slot}`.
    pub indicators: IndexMap<String, BinaryIndicator>,
    /// When the vendor last heard from the unit.
    pub last_reported: Option<DateTime<Utc>>,
    /// When this record was produced locally.
    pub updated_at: DateTime<Utc>,
}
