// ── Static presentation catalogs ──
//
// Data-driven dispatch tables mapping vendor reading names and indicator
// labels to device classes, units, and categories. Ordered slices with
// first-match-wins precedence and an explicit default entry -- lookups
// never fail, they fall through to the neutral profile.

use crate::model::{EntityCategory, IndicatorClass, SensorClass, StateClass};

/// Presentation profile for a named numeric reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorProfile {
    pub device_class: Option<SensorClass>,
    /// Overrides the vendor's unit string when set.
    pub unit: Option<&'static str>,
    pub state_class: StateClass,
    pub category: Option<EntityCategory>,
}

/// Neutral default: no device class, plain measurement, primary category.
pub const DEFAULT_SENSOR_PROFILE: SensorProfile = SensorProfile {
    device_class: None,
    unit: None,
    state_class: StateClass::Measurement,
    category: None,
};

const SENSOR_PROFILES: &[(&str, SensorProfile)] = &[
    (
        "Satellite Count",
        SensorProfile {
            device_class: None,
            unit: None,
            state_class: StateClass::Measurement,
            category: Some(EntityCategory::Diagnostic),
        },
    ),
    (
        "GSM Signal Strength",
        SensorProfile {
            device_class: None,
            unit: None,
            state_class: StateClass::Measurement,
            category: Some(EntityCategory::Diagnostic),
        },
    ),
    (
        "External Battery",
        SensorProfile {
            device_class: Some(SensorClass::Voltage),
            unit: Some("V"),
            state_class: StateClass::Measurement,
            category: None,
        },
    ),
    (
        "Battery",
        SensorProfile {
            device_class: Some(SensorClass::Battery),
            unit: Some("%"),
            state_class: StateClass::Measurement,
            category: None,
        },
    ),
    (
        "Temp",
        SensorProfile {
            device_class: Some(SensorClass::Temperature),
            unit: Some("°C"),
            state_class: StateClass::Measurement,
            category: None,
        },
    ),
    (
        "Voltage (Generic)",
        SensorProfile {
            device_class: Some(SensorClass::Voltage),
            unit: Some("V"),
            state_class: StateClass::Measurement,
            category: None,
        },
    ),
    (
        "Humidity",
        SensorProfile {
            device_class: Some(SensorClass::Humidity),
            unit: Some("%"),
            state_class: StateClass::Measurement,
            category: None,
        },
    ),
];

/// Look up the presentation profile for a reading name. First match wins;
/// unknown names get the neutral default.
pub fn sensor_profile(name: &str) -> SensorProfile {
    SENSOR_PROFILES
        .iter()
        .find(|(key, _)| *key == name)
        .map_or(DEFAULT_SENSOR_PROFILE, |(_, profile)| *profile)
}

/// Reading names the scraping vendor reports that describe the tracker
/// hardware rather than the vehicle.
const DIAGNOSTIC_READING_NAMES: &[&str] = &[
    "Signal Strength",
    "Satellite Count",
    "Internal Battery",
    "External Battery",
];

/// Whether a scraping-vendor reading belongs in the diagnostic category.
pub fn is_diagnostic_reading(name: &str) -> bool {
    DIAGNOSTIC_READING_NAMES.contains(&name)
}

/// Keyword → indicator class table. Order matters: the first keyword
/// contained in the (lowercased) label wins.
const INDICATOR_KEYWORDS: &[(&str, IndicatorClass)] = &[
    ("door", IndicatorClass::Door),
    ("window", IndicatorClass::Window),
    ("motion", IndicatorClass::Motion),
    ("movement", IndicatorClass::Motion),
    ("alarm", IndicatorClass::Safety),
    ("safety", IndicatorClass::Safety),
    ("ignition", IndicatorClass::Power),
    ("power", IndicatorClass::Power),
    ("siren", IndicatorClass::Sound),
    ("towing", IndicatorClass::Tamper),
    ("tamper", IndicatorClass::Tamper),
    ("vibration", IndicatorClass::Vibration),
    ("lock", IndicatorClass::Lock),
    ("light", IndicatorClass::Light),
];

/// Derive the semantic class of a boolean indicator from its label.
/// Unmatched labels get no class.
pub fn indicator_class(label: &str) -> Option<IndicatorClass> {
    let lowered = label.to_lowercase();
    INDICATOR_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, class)| *class)
}
