// ── Portal vendor normalization ──
//
// The scraping vendor's units payload mixes structured fields, formatted
// strings ("128534 km", a timestamp in the user's display format), and an
// HTML fragment holding the boolean indicators. Account preferences are
// required context: they supply the speed/temperature units and decode
// the last-report timestamp.

use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use tracing::debug;

use fleetwatch_api::mobility::{RawMobilityUnit, UserPreferences};

use crate::catalog::is_diagnostic_reading;
use crate::model::{
    EntityCategory, Position, ReadingValue, SensorClass, SensorReading, StateClass, UnitId,
    UnitRecord,
};
use crate::normalize::scrape_indicators;

/// A unit whose last report is older than this is considered offline.
const STALE_AFTER_HOURS: i64 = 13;

/// Normalize one unit entry from the portal vendor.
///
/// Entries flagged `HasData: false` carry no usable state and are
/// skipped. `now` is injected so staleness is testable.
pub fn normalize_mobility(
    raw: &RawMobilityUnit,
    prefs: &UserPreferences,
    now: DateTime<Utc>,
) -> Option<UnitRecord> {
    if !raw.has_data {
        debug!(unit_id = %raw.unit.unit_id, "skipping unit without data");
        return None;
    }

    let unit = &raw.unit;
    let id = UnitId::new(unit.unit_id.to_string());
    let name = if unit.name.trim().is_empty() {
        format!("Unit {id}")
    } else {
        unit.name.trim().to_owned()
    };

    let (odometer, odometer_unit) = unit
        .odometer_formatted
        .as_deref()
        .and_then(split_formatted_odometer)
        .map_or((None, None), |(value, unit)| (Some(value), unit));

    let last_reported = unit
        .latest_point_received
        .as_deref()
        .and_then(|raw| prefs.parse_timestamp(raw));

    // The portal keeps listing units long after they stop reporting;
    // treat anything past the staleness window as offline.
    let available = last_reported
        .is_some_and(|reported| now - reported <= Duration::hours(STALE_AFTER_HOURS));

    let position = Position {
        latitude: unit.latitude,
        longitude: unit.longitude,
        heading: unit.heading,
        speed: unit.speed,
        speed_unit: prefs.speed_unit.clone(),
        address: None,
        ignition: None,
        engine_status: unit.status_fixed.clone(),
        odometer,
        gps_time: last_reported,
    };

    let mut sensors = IndexMap::new();

    if let Some(speed) = unit.speed {
        sensors.insert(
            "Speed".to_owned(),
            SensorReading {
                name: "Speed".to_owned(),
                value: ReadingValue::Number(speed),
                unit: prefs.speed_unit.clone(),
                device_class: Some(SensorClass::Speed),
                state_class: StateClass::Measurement,
                category: None,
            },
        );
    }
    if let Some(heading) = unit.heading {
        sensors.insert(
            "Heading".to_owned(),
            SensorReading {
                name: "Heading".to_owned(),
                value: ReadingValue::Number(heading),
                unit: Some("°".to_owned()),
                device_class: None,
                state_class: StateClass::Measurement,
                category: None,
            },
        );
    }
    if let Some(value) = odometer {
        sensors.insert(
            "Odometer".to_owned(),
            SensorReading {
                name: "Odometer".to_owned(),
                value: ReadingValue::Number(value),
                unit: odometer_unit,
                device_class: Some(SensorClass::Distance),
                state_class: StateClass::TotalIncreasing,
                category: None,
            },
        );
    }
    if let Some(state) = unit.status_fixed.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        sensors.insert(
            "State".to_owned(),
            SensorReading {
                name: "State".to_owned(),
                value: ReadingValue::Text(state.to_owned()),
                unit: None,
                device_class: None,
                state_class: StateClass::Measurement,
                category: None,
            },
        );
    }
    if let Some(reported) = last_reported {
        sensors.insert(
            "Last Sent".to_owned(),
            SensorReading {
                name: "Last Sent".to_owned(),
                value: ReadingValue::Timestamp(reported),
                unit: None,
                device_class: Some(SensorClass::Timestamp),
                state_class: StateClass::Measurement,
                category: Some(EntityCategory::Diagnostic),
            },
        );
    }

    for input in &unit.sensor_inputs {
        let name = input.description.trim();
        if name.is_empty() {
            continue;
        }
        let value = match input.value.trim().parse::<f64>() {
            Ok(n) => ReadingValue::Number(n),
            Err(_) if input.value.trim().is_empty() => continue,
            Err(_) => ReadingValue::Text(input.value.trim().to_owned()),
        };

        // A bare degree sign means "in the account's temperature unit".
        let sign = input.measurement_sign.trim();
        let (unit, device_class) = if sign == "°" {
            (prefs.temperature_unit.clone(), Some(SensorClass::Temperature))
        } else if sign.is_empty() {
            (None, None)
        } else {
            (Some(sign.to_owned()), None)
        };

        let category = is_diagnostic_reading(name).then_some(EntityCategory::Diagnostic);

        sensors.insert(
            name.to_owned(),
            SensorReading {
                name: name.to_owned(),
                value,
                unit,
                device_class,
                state_class: StateClass::Measurement,
                category,
            },
        );
    }

    let indicators = scrape_indicators(&raw.html_control);

    Some(UnitRecord {
        id,
        name,
        available,
        position: Some(position),
        sensors,
        indicators,
        last_reported,
        updated_at: now,
    })
}

/// Split a formatted odometer string ("128534 km") into value and unit.
fn split_formatted_odometer(formatted: &str) -> Option<(f64, Option<String>)> {
    let mut parts = formatted.split_whitespace();
    let value: f64 = parts.next()?.replace(',', "").parse().ok()?;
    Some((value, parts.next().map(str::to_owned)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetwatch_api::mobility::{MobilitySensorInput, MobilityUnit, RawId};
    use pretty_assertions::assert_eq;

    fn prefs() -> UserPreferences {
        UserPreferences {
            user_id: Some("42".into()),
            speed_unit: Some("Km/h".into()),
            temperature_unit: Some("°C".into()),
            utc_offset_minutes: Some(120),
            date_format: Some("%d %b %Y %H:%M:%S".into()),
        }
    }

    fn sample_unit() -> RawMobilityUnit {
        RawMobilityUnit {
            has_data: true,
            html_control: r#"
                <ul class="curraux-details">
                  <li title="Driver door open">
                    <div class="io-icon t-io-door i-c-red io-state sep"></div>
                  </li>
                </ul>
            "#
            .to_owned(),
            unit: MobilityUnit {
                unit_id: RawId::Int(7),
                name: "Van 7".to_owned(),
                latitude: Some(37.97),
                longitude: Some(23.72),
                speed: Some(54.0),
                heading: Some(270.0),
                status_fixed: Some("Moving".to_owned()),
                odometer_formatted: Some("128534 km".to_owned()),
                // Local time, GMT+2 → 10:00 UTC.
                latest_point_received: Some("15 Jun 2026 12:00:00".to_owned()),
                sensor_inputs: vec![
                    MobilitySensorInput {
                        description: "Cabin Temp".to_owned(),
                        value: "21.5".to_owned(),
                        measurement_sign: "°".to_owned(),
                    },
                    MobilitySensorInput {
                        description: "External Battery".to_owned(),
                        value: "12.4".to_owned(),
                        measurement_sign: "V".to_owned(),
                    },
                ],
            },
        }
    }

    fn noon_utc() -> DateTime<Utc> {
        "2026-06-15T12:00:00Z".parse().expect("valid timestamp")
    }

    #[test]
    fn normalizes_structured_fields() {
        let record = normalize_mobility(&sample_unit(), &prefs(), noon_utc()).expect("normalizes");

        assert_eq!(record.id.as_str(), "7");
        assert_eq!(record.name, "Van 7");
        assert!(record.available);

        let position = record.position.expect("has position");
        assert_eq!(position.latitude, Some(37.97));
        assert_eq!(position.speed_unit.as_deref(), Some("Km/h"));
        assert_eq!(position.odometer, Some(128534.0));

        assert_eq!(
            record.last_reported,
            Some("2026-06-15T10:00:00Z".parse().expect("valid"))
        );
    }

    #[test]
    fn unit_without_data_is_skipped() {
        let mut raw = sample_unit();
        raw.has_data = false;
        assert!(normalize_mobility(&raw, &prefs(), noon_utc()).is_none());
    }

    #[test]
    fn stale_report_marks_unit_unavailable() {
        let raw = sample_unit();
        // Last report was 10:00 UTC; 14 hours later is past the window.
        let later = "2026-06-16T00:00:01Z".parse().expect("valid");
        let record = normalize_mobility(&raw, &prefs(), later).expect("normalizes");
        assert!(!record.available);
        // Last-known values are retained.
        assert!(record.position.is_some());
    }

    #[test]
    fn unparseable_timestamp_means_unavailable() {
        let mut raw = sample_unit();
        raw.unit.latest_point_received = Some("not a date".to_owned());
        let record = normalize_mobility(&raw, &prefs(), noon_utc()).expect("normalizes");
        assert!(!record.available);
        assert!(record.last_reported.is_none());
        assert!(!record.sensors.contains_key("Last Sent"));
    }

    #[test]
    fn odometer_string_is_split_into_value_and_unit() {
        let record = normalize_mobility(&sample_unit(), &prefs(), noon_utc()).expect("normalizes");
        let odometer = &record.sensors["Odometer"];
        assert_eq!(odometer.value, ReadingValue::Number(128534.0));
        assert_eq!(odometer.unit.as_deref(), Some("km"));
        assert_eq!(odometer.state_class, StateClass::TotalIncreasing);
    }

    #[test]
    fn degree_sign_resolves_to_preferred_temperature_unit() {
        let record = normalize_mobility(&sample_unit(), &prefs(), noon_utc()).expect("normalizes");
        let temp = &record.sensors["Cabin Temp"];
        assert_eq!(temp.unit.as_deref(), Some("°C"));
        assert_eq!(temp.device_class, Some(SensorClass::Temperature));

        // Diagnostic reading names land in the diagnostic category.
        let battery = &record.sensors["External Battery"];
        assert_eq!(battery.category, Some(EntityCategory::Diagnostic));
        assert_eq!(battery.unit.as_deref(), Some("V"));
    }

    #[test]
    fn indicators_come_from_the_html_fragment() {
        let record = normalize_mobility(&sample_unit(), &prefs(), noon_utc()).expect("normalizes");
        let door = &record.indicators["driver door_0"];
        assert_eq!(door.active, Some(true));
    }

    #[test]
    fn blank_name_falls_back_to_unit_id() {
        let mut raw = sample_unit();
        raw.unit.name = "  ".to_owned();
        let record = normalize_mobility(&raw, &prefs(), noon_utc()).expect("normalizes");
        assert_eq!(record.name, "Unit 7");
    }
}
