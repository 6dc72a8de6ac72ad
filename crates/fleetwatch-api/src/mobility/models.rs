// Wire types for the scraping vendor's units endpoint.

use std::fmt;

use serde::Deserialize;

/// Login response body: user id plus free-form preference options.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "Id")]
    pub id: Option<RawId>,
    #[serde(rename = "Preferences", default)]
    pub preferences: Vec<PreferenceOption>,
}

/// One `{ Value, Text }` preference pair from the login response.
#[derive(Debug, Deserialize)]
pub struct PreferenceOption {
    #[serde(rename = "Value", default)]
    pub value: String,
    #[serde(rename = "Text", default)]
    pub text: String,
}

/// Response of `/Live/Unit/Units`.
#[derive(Debug, Deserialize)]
pub struct UnitsResponse {
    #[serde(rename = "Units", default)]
    pub units: Vec<RawMobilityUnit>,
}

/// One unit entry: availability flag, indicator HTML, structured fields.
#[derive(Debug, Deserialize)]
pub struct RawMobilityUnit {
    #[serde(rename = "HasData", default)]
    pub has_data: bool,
    /// HTML fragment holding the boolean indicator list.
    #[serde(rename = "HtmlControl", default)]
    pub html_control: String,
    #[serde(rename = "Unit")]
    pub unit: MobilityUnit,
}

/// Structured per-unit telemetry fields.
#[derive(Debug, Deserialize)]
pub struct MobilityUnit {
    #[serde(rename = "UnitId")]
    pub unit_id: RawId,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
    #[serde(rename = "Speed")]
    pub speed: Option<f64>,
    #[serde(rename = "Heading")]
    pub heading: Option<f64>,
    /// Free-text vehicle state, e.g. "Parked" or "Moving".
    #[serde(rename = "StatusFixed")]
    pub status_fixed: Option<String>,
    /// Odometer with unit baked into the string, e.g. `"128534 km"`.
    #[serde(rename = "OdometerFormatted")]
    pub odometer_formatted: Option<String>,
    /// Last-report timestamp in the user's preferred date format.
    #[serde(rename = "LatestPointReceivedDateTimeFormatted")]
    pub latest_point_received: Option<String>,
    #[serde(rename = "SensorInputs", default)]
    pub sensor_inputs: Vec<MobilitySensorInput>,
}

/// One named numeric reading attached to a unit.
#[derive(Debug, Deserialize)]
pub struct MobilitySensorInput {
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Value", default)]
    pub value: String,
    #[serde(rename = "MeasurementSign", default)]
    pub measurement_sign: String,
}

/// Vendor identifiers arrive as either numbers or strings depending on
/// the endpoint; normalize to text at the edge.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}
