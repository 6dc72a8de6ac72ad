// ── REST vendor normalization ──
//
// Field extraction is table-driven: each static descriptor names a value
// path into the raw unit JSON plus presentation hints. Dynamic
// `SensorReadings` and `InputOutputs` entries are mapped through the
// catalog. Units missing their identity fields are skipped.

use chrono::Utc;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::catalog::{sensor_profile, indicator_class};
use crate::model::{
    BinaryIndicator, EntityCategory, Position, ReadingValue, SensorClass, SensorReading,
    StateClass, UnitId, UnitRecord, slugify,
};
use crate::normalize::{f64_at, parse_api_datetime, str_at, value_at_path};

enum FieldKind {
    Number,
    Text,
    Timestamp,
}

/// A statically-known reading extracted by path lookup.
struct FieldDescriptor {
    name: &'static str,
    path: &'static [&'static str],
    kind: FieldKind,
    device_class: Option<SensorClass>,
    unit: Option<&'static str>,
    state_class: StateClass,
    category: Option<EntityCategory>,
}

const FIELD_DESCRIPTORS: &[FieldDescriptor] = &[
    FieldDescriptor {
        name: "Heading",
        path: &["Position", "Heading"],
        kind: FieldKind::Number,
        device_class: None,
        unit: Some("°"),
        state_class: StateClass::Measurement,
        category: None,
    },
    FieldDescriptor {
        name: "Address",
        path: &["Position", "Address"],
        kind: FieldKind::Text,
        device_class: None,
        unit: None,
        state_class: StateClass::Measurement,
        category: None,
    },
    FieldDescriptor {
        name: "Ignition Status",
        path: &["Position", "Ignition"],
        kind: FieldKind::Text,
        device_class: None,
        unit: None,
        state_class: StateClass::Measurement,
        category: None,
    },
    FieldDescriptor {
        name: "Odometer",
        path: &["Position", "Odometer"],
        kind: FieldKind::Number,
        device_class: Some(SensorClass::Distance),
        unit: Some("km"),
        state_class: StateClass::TotalIncreasing,
        category: None,
    },
    FieldDescriptor {
        name: "Engine Status",
        path: &["Position", "EngineStatus"],
        kind: FieldKind::Text,
        device_class: None,
        unit: None,
        state_class: StateClass::Measurement,
        category: None,
    },
    FieldDescriptor {
        name: "Engine Time",
        path: &["Position", "EngineTime"],
        kind: FieldKind::Number,
        device_class: Some(SensorClass::Duration),
        unit: Some("s"),
        state_class: StateClass::TotalIncreasing,
        category: None,
    },
    FieldDescriptor {
        name: "Last GPS Time",
        path: &["Position", "GPSTimeUtc"],
        kind: FieldKind::Timestamp,
        device_class: Some(SensorClass::Timestamp),
        unit: None,
        state_class: StateClass::Measurement,
        category: Some(EntityCategory::Diagnostic),
    },
    FieldDescriptor {
        name: "Last Reported Time",
        path: &["LastReportedTimeUTC"],
        kind: FieldKind::Timestamp,
        device_class: Some(SensorClass::Timestamp),
        unit: None,
        state_class: StateClass::Measurement,
        category: Some(EntityCategory::Diagnostic),
    },
    FieldDescriptor {
        name: "IMEI",
        path: &["Imei"],
        kind: FieldKind::Text,
        device_class: None,
        unit: None,
        state_class: StateClass::Measurement,
        category: Some(EntityCategory::Diagnostic),
    },
];

/// Normalize one raw unit payload from the REST vendor.
///
/// Returns `None` when the payload lacks a `Uid` or `Name` -- such
/// entries can't be correlated and are skipped, not fatal.
pub fn normalize_tracking(raw: &Value) -> Option<UnitRecord> {
    let id = identity_at(raw, "Uid")?;
    let name = str_at(raw, &["Name"])?;

    let position = raw.get("Position").map(|_| Position {
        latitude: f64_at(raw, &["Position", "Latitude"]),
        longitude: f64_at(raw, &["Position", "Longitude"]),
        heading: f64_at(raw, &["Position", "Heading"]),
        speed: f64_at(raw, &["Position", "Speed"]),
        speed_unit: str_at(raw, &["Position", "SpeedMeasure"]).map(|u| normalize_speed_unit(&u)),
        address: str_at(raw, &["Position", "Address"]),
        ignition: str_at(raw, &["Position", "Ignition"]),
        engine_status: str_at(raw, &["Position", "EngineStatus"]),
        odometer: f64_at(raw, &["Position", "Odometer"]),
        gps_time: str_at(raw, &["Position", "GPSTimeUtc"])
            .and_then(|s| parse_api_datetime(&s)),
    });

    let mut sensors = IndexMap::new();

    // Speed carries its unit from a sibling key, so it's built by hand
    // rather than through the descriptor table.
    if let Some(speed) = f64_at(raw, &["Position", "Speed"]) {
        sensors.insert(
            "Speed".to_owned(),
            SensorReading {
                name: "Speed".to_owned(),
                value: ReadingValue::Number(speed),
                unit: str_at(raw, &["Position", "SpeedMeasure"])
                    .map(|u| normalize_speed_unit(&u)),
                device_class: Some(SensorClass::Speed),
                state_class: StateClass::Measurement,
                category: None,
            },
        );
    }

    for desc in FIELD_DESCRIPTORS {
        let Some(value) = extract(raw, desc) else {
            continue;
        };
        sensors.insert(
            desc.name.to_owned(),
            SensorReading {
                name: desc.name.to_owned(),
                value,
                unit: desc.unit.map(str::to_owned),
                device_class: desc.device_class,
                state_class: desc.state_class,
                category: desc.category,
            },
        );
    }

    if let Some(Value::Array(readings)) = value_at_path(raw, &["SensorReadings"]) {
        for reading in readings {
            let Some(sensor) = dynamic_reading(reading) else {
                continue;
            };
            sensors.insert(sensor.name.clone(), sensor);
        }
    }

    let indicators = input_output_indicators(raw);

    let last_reported = str_at(raw, &["LastReportedTimeUTC"])
        .and_then(|s| parse_api_datetime(&s));

    Some(UnitRecord {
        available: position.is_some(),
        id,
        name,
        position,
        sensors,
        indicators,
        last_reported,
        updated_at: Utc::now(),
    })
}

/// Unit identity may arrive as a string or a number.
fn identity_at(raw: &Value, key: &str) -> Option<UnitId> {
    match raw.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(UnitId::new(s.trim())),
        Value::Number(n) => Some(UnitId::new(n.to_string())),
        _ => None,
    }
}

fn extract(raw: &Value, desc: &FieldDescriptor) -> Option<ReadingValue> {
    match desc.kind {
        FieldKind::Number => f64_at(raw, desc.path).map(ReadingValue::Number),
        FieldKind::Text => str_at(raw, desc.path).map(ReadingValue::Text),
        FieldKind::Timestamp => str_at(raw, desc.path)
            .and_then(|s| parse_api_datetime(&s))
            .map(ReadingValue::Timestamp),
    }
}

/// Map the vendor's speed unit spellings onto conventional ones.
fn normalize_speed_unit(raw: &str) -> String {
    match raw.to_lowercase().as_str() {
        "kph" => "km/h".to_owned(),
        "mph" => "mph".to_owned(),
        _ => raw.to_owned(),
    }
}

/// Build a reading from a dynamic `SensorReadings` entry, consulting the
/// catalog by `SensorType` first and `Name` as fallback.
fn dynamic_reading(reading: &Value) -> Option<SensorReading> {
    let name = str_at(reading, &["Name"])?;

    let profile = str_at(reading, &["SensorType"])
        .map(|t| sensor_profile(&t))
        .filter(|p| *p != crate::catalog::DEFAULT_SENSOR_PROFILE)
        .unwrap_or_else(|| sensor_profile(&name));

    let value = match value_at_path(reading, &["Value"]) {
        Some(Value::Number(n)) => ReadingValue::Number(n.as_f64()?),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_or_else(|_| ReadingValue::Text(s.trim().to_owned()), ReadingValue::Number),
        _ => return None,
    };

    // Catalog unit wins; otherwise fall back to the vendor's sign with
    // spelling fixes for the classes that care.
    let unit = profile.unit.map(str::to_owned).or_else(|| {
        str_at(reading, &["MeasurementSign"]).map(|sign| {
            match (profile.device_class, sign.to_lowercase().as_str()) {
                (Some(SensorClass::Voltage), "v") => "V".to_owned(),
                (Some(SensorClass::Speed), "kph") => "km/h".to_owned(),
                (Some(SensorClass::Temperature), "c" | "°c" | "celsius") => "°C".to_owned(),
                (Some(SensorClass::Temperature), "f" | "°f" | "fahrenheit") => "°F".to_owned(),
                _ => sign,
            }
        })
    });

    Some(SensorReading {
        name: name.clone(),
        value,
        unit,
        device_class: profile.device_class,
        state_class: profile.state_class,
        category: profile.category,
    })
}

/// Map `Position.InputOutputs` entries to boolean indicators.
///
/// Identity is the slugified system name plus display name; the vendor
/// repeats both for separate physical inputs, so colliding keys get an
/// index suffix.
fn input_output_indicators(raw: &Value) -> IndexMap<String, BinaryIndicator> {
    let mut indicators = IndexMap::new();
    let Some(Value::Array(items)) = value_at_path(raw, &["Position", "InputOutputs"]) else {
        return indicators;
    };

    for (slot, item) in items.iter().enumerate() {
        let Some(system_name) = str_at(item, &["SystemName"]) else {
            debug!("skipping IO item without SystemName at slot {slot}");
            continue;
        };
        let display_name = str_at(item, &["UserDescription"])
            .or_else(|| str_at(item, &["Description"]))
            .unwrap_or_else(|| system_name.clone());

        let base_key = format!("{}_{}", slugify(&system_name), slugify(&display_name));
        let mut key = base_key.clone();
        let mut counter = 0;
        while indicators.contains_key(&key) {
            counter += 1;
            key = format!("{base_key}_{counter}");
        }

        let active = value_at_path(item, &["Active"])
            .and_then(Value::as_bool)
            .unwrap_or(false);

        indicators.insert(
            key,
            BinaryIndicator {
                device_class: indicator_class(&display_name),
                name: display_name,
                active: Some(active),
                slot,
            },
        );
    }

    indicators
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IndicatorClass;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_unit() -> Value {
        json!({
            "Uid": "V-100",
            "Name": "Van 1",
            "Imei": "358000000000001",
            "LastReportedTimeUTC": "2026-06-15T10:05:00Z",
            "Position": {
                "Latitude": 37.97,
                "Longitude": 23.72,
                "Speed": 54.0,
                "SpeedMeasure": "kph",
                "Heading": 180,
                "Address": "Syntagma Square",
                "Ignition": "On",
                "EngineStatus": "Running",
                "Odometer": 128534,
                "GPSTimeUtc": "2026-06-15T10:04:58",
                "InputOutputs": [
                    { "SystemName": "aux10", "Description": "Siren", "Active": true },
                    { "SystemName": "aux10", "Description": "Siren", "Active": false },
                    { "SystemName": "din1", "UserDescription": "Driver door", "Active": false }
                ]
            },
            "SensorReadings": [
                { "Name": "External Battery", "Value": "12.4", "MeasurementSign": "v" },
                { "Name": "Cabin Temp", "SensorType": "Temp", "Value": 21.5 },
                { "Name": "Fuel Note", "Value": "reserve" }
            ]
        })
    }

    #[test]
    fn normalizes_identity_and_position() {
        let record = normalize_tracking(&sample_unit()).expect("normalizes");
        assert_eq!(record.id.as_str(), "V-100");
        assert_eq!(record.name, "Van 1");
        assert!(record.available);

        let position = record.position.expect("has position");
        assert_eq!(position.latitude, Some(37.97));
        assert_eq!(position.speed_unit.as_deref(), Some("km/h"));
        assert_eq!(position.ignition.as_deref(), Some("On"));
    }

    #[test]
    fn missing_identity_is_skipped() {
        assert!(normalize_tracking(&json!({ "Name": "anonymous" })).is_none());
        assert!(normalize_tracking(&json!({ "Uid": "V-1" })).is_none());
    }

    #[test]
    fn unit_without_position_is_unavailable_but_normalized() {
        let record =
            normalize_tracking(&json!({ "Uid": "V-2", "Name": "Parked" })).expect("normalizes");
        assert!(!record.available);
        assert!(record.position.is_none());
        // Position-scoped readings are absent, not errors.
        assert!(!record.sensors.contains_key("Speed"));
        assert!(!record.sensors.contains_key("Odometer"));
    }

    #[test]
    fn static_descriptors_extracted() {
        let record = normalize_tracking(&sample_unit()).expect("normalizes");
        assert_eq!(
            record.sensors["Odometer"].value,
            ReadingValue::Number(128534.0)
        );
        assert_eq!(record.sensors["Odometer"].state_class, StateClass::TotalIncreasing);
        assert_eq!(record.sensors["Heading"].unit.as_deref(), Some("°"));
        assert_eq!(
            record.sensors["IMEI"].category,
            Some(EntityCategory::Diagnostic)
        );
        assert!(matches!(
            record.sensors["Last GPS Time"].value,
            ReadingValue::Timestamp(_)
        ));
    }

    #[test]
    fn dynamic_readings_use_catalog_and_sign_fixes() {
        let record = normalize_tracking(&sample_unit()).expect("normalizes");

        let battery = &record.sensors["External Battery"];
        assert_eq!(battery.device_class, Some(SensorClass::Voltage));
        assert_eq!(battery.unit.as_deref(), Some("V"));
        assert_eq!(battery.value, ReadingValue::Number(12.4));

        // SensorType takes precedence over the (unknown) name.
        let temp = &record.sensors["Cabin Temp"];
        assert_eq!(temp.device_class, Some(SensorClass::Temperature));
        assert_eq!(temp.unit.as_deref(), Some("°C"));

        // Non-numeric values stay textual.
        assert_eq!(
            record.sensors["Fuel Note"].value,
            ReadingValue::Text("reserve".into())
        );
    }

    #[test]
    fn indicator_keys_disambiguate_collisions() {
        let record = normalize_tracking(&sample_unit()).expect("normalizes");
        assert_eq!(record.indicators.len(), 3);

        let first = &record.indicators["aux10_siren"];
        assert_eq!(first.active, Some(true));
        assert_eq!(first.device_class, Some(IndicatorClass::Sound));

        let second = &record.indicators["aux10_siren_1"];
        assert_eq!(second.active, Some(false));

        let door = &record.indicators["din1_driver_door"];
        assert_eq!(door.device_class, Some(IndicatorClass::Door));
    }
}
