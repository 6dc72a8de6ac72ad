// ── Entity projection ──
//
// Flattens a `UnitRecord` into the per-value entity list a consumer
// (CLI table, exporter) presents: one location entity per unit, one
// sensor entity per reading, one binary entity per indicator. Entity
// ids are stable slugs derived from the unit id and value name.

use serde::Serialize;

use crate::model::{EntityCategory, ReadingValue, UnitRecord, slugify};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Location,
    Sensor,
    BinarySensor,
}

/// One presentable value derived from a unit record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityState {
    /// Stable identifier: `{unit_slug}_{value_slug}`.
    pub id: String,
    pub unit_name: String,
    pub name: String,
    pub kind: EntityKind,
    /// Rendered value; `None` when the underlying state is indeterminate.
    pub value: Option<String>,
    pub unit: Option<String>,
    pub available: bool,
    pub diagnostic: bool,
}

/// Project a unit record into its entity list.
///
/// The location entity is always present, even without a fix, so a unit
/// never disappears from the entity list between polls.
pub fn entities_for(record: &UnitRecord) -> Vec<EntityState> {
    let unit_slug = slugify(record.id.as_str());
    let mut entities = Vec::with_capacity(1 + record.sensors.len() + record.indicators.len());

    let location_value = record.position.as_ref().and_then(|p| {
        p.has_fix()
            .then(|| format!("{:.6}, {:.6}", p.latitude.unwrap_or(0.0), p.longitude.unwrap_or(0.0)))
    });
    entities.push(EntityState {
        id: format!("{unit_slug}_location"),
        unit_name: record.name.clone(),
        name: "Location".to_owned(),
        kind: EntityKind::Location,
        value: location_value,
        unit: None,
        available: record.available,
        diagnostic: false,
    });

    for reading in record.sensors.values() {
        entities.push(EntityState {
            id: format!("{unit_slug}_{}", slugify(&reading.name)),
            unit_name: record.name.clone(),
            name: reading.name.clone(),
            kind: EntityKind::Sensor,
            value: Some(render_reading(&reading.value)),
            unit: reading.unit.clone(),
            available: record.available,
            diagnostic: reading.category == Some(EntityCategory::Diagnostic),
        });
    }

    for (key, indicator) in &record.indicators {
        entities.push(EntityState {
            id: format!("{unit_slug}_{}", slugify(key)),
            unit_name: record.name.clone(),
            name: indicator.name.clone(),
            kind: EntityKind::BinarySensor,
            value: indicator.active.map(|active| {
                if active { "on".to_owned() } else { "off".to_owned() }
            }),
            unit: None,
            available: record.available,
            diagnostic: false,
        });
    }

    entities
}

fn render_reading(value: &ReadingValue) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        BinaryIndicator, Position, SensorClass, SensorReading, StateClass, UnitId,
    };
    use chrono::Utc;
    use indexmap::IndexMap;

    fn sample_record() -> UnitRecord {
        let mut sensors = IndexMap::new();
        sensors.insert(
            "Speed".to_owned(),
            SensorReading {
                name: "Speed".to_owned(),
                value: ReadingValue::Number(54.0),
                unit: Some("km/h".to_owned()),
                device_class: Some(SensorClass::Speed),
                state_class: StateClass::Measurement,
                category: None,
            },
        );
        sensors.insert(
            "External Battery".to_owned(),
            SensorReading {
                name: "External Battery".to_owned(),
                value: ReadingValue::Number(12.4),
                unit: Some("V".to_owned()),
                device_class: Some(SensorClass::Voltage),
                state_class: StateClass::Measurement,
                category: Some(EntityCategory::Diagnostic),
            },
        );

        let mut indicators = IndexMap::new();
        indicators.insert(
            "driver door_0".to_owned(),
            BinaryIndicator {
                name: "driver door".to_owned(),
                active: Some(true),
                device_class: None,
                slot: 0,
            },
        );
        indicators.insert(
            "aux_1".to_owned(),
            BinaryIndicator {
                name: "aux".to_owned(),
                active: None,
                device_class: None,
                slot: 1,
            },
        );

        UnitRecord {
            id: UnitId::new("V-100"),
            name: "Van 1".to_owned(),
            available: true,
            position: Some(Position {
                latitude: Some(37.97),
                longitude: Some(23.72),
                ..Position::default()
            }),
            sensors,
            indicators,
            last_reported: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn projects_location_sensors_and_indicators() {
        let entities = entities_for(&sample_record());
        assert_eq!(entities.len(), 5);

        let location = &entities[0];
        assert_eq!(location.kind, EntityKind::Location);
        assert_eq!(location.id, "v_100_location");
        assert_eq!(location.value.as_deref(), Some("37.970000, 23.720000"));

        let speed = entities.iter().find(|e| e.name == "Speed").expect("speed");
        assert_eq!(speed.id, "v_100_speed");
        assert_eq!(speed.unit.as_deref(), Some("km/h"));
        assert!(!speed.diagnostic);

        let battery = entities
            .iter()
            .find(|e| e.name == "External Battery")
            .expect("battery");
        assert!(battery.diagnostic);
    }

    #[test]
    fn indicator_states_render_on_off_or_unknown() {
        let entities = entities_for(&sample_record());
        let door = entities
            .iter()
            .find(|e| e.id == "v_100_driver_door_0")
            .expect("door");
        assert_eq!(door.kind, EntityKind::BinarySensor);
        assert_eq!(door.value.as_deref(), Some("on"));

        let aux = entities.iter().find(|e| e.id == "v_100_aux_1").expect("aux");
        assert_eq!(aux.value, None);
    }

    #[test]
    fn location_without_fix_has_no_value_but_exists() {
        let mut record = sample_record();
        record.position = None;
        let entities = entities_for(&record);
        assert_eq!(entities[0].kind, EntityKind::Location);
        assert_eq!(entities[0].value, None);
    }
}
