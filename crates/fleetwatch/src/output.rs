//! Table and JSON rendering for command output.

use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use fleetwatch_core::{EntityKind, EntityState, UnitRecord};

use crate::cli::OutputFormat;
use crate::error::CliError;

#[derive(Tabled)]
struct UnitRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "POSITION")]
    position: String,
    #[tabled(rename = "SPEED")]
    speed: String,
    #[tabled(rename = "LAST REPORT")]
    last_report: String,
}

pub fn print_units(units: &[std::sync::Arc<UnitRecord>], format: OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let records: Vec<&UnitRecord> = units.iter().map(AsRef::as_ref).collect();
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        OutputFormat::Table => {
            let rows: Vec<UnitRow> = units.iter().map(|unit| unit_row(unit)).collect();
            println!("{}", Table::new(rows).with(Style::blank()));
        }
    }
    Ok(())
}

fn unit_row(unit: &UnitRecord) -> UnitRow {
    let status = if unit.available {
        "online".green().to_string()
    } else {
        "offline".red().to_string()
    };

    let position = unit
        .position
        .as_ref()
        .filter(|p| p.has_fix())
        .map_or_else(
            || "-".to_owned(),
            |p| {
                format!(
                    "{:.5}, {:.5}",
                    p.latitude.unwrap_or(0.0),
                    p.longitude.unwrap_or(0.0)
                )
            },
        );

    let speed = unit
        .position
        .as_ref()
        .and_then(|p| p.speed)
        .map_or_else(
            || "-".to_owned(),
            |s| {
                let unit_label = unit
                    .position
                    .as_ref()
                    .and_then(|p| p.speed_unit.as_deref())
                    .unwrap_or("");
                format!("{s:.0} {unit_label}").trim_end().to_owned()
            },
        );

    let last_report = unit.last_reported.map_or_else(
        || "-".to_owned(),
        |ts| {
            let age = chrono::Utc::now().signed_duration_since(ts);
            age.to_std().map_or_else(
                |_| ts.to_rfc3339(),
                |age| format!("{} ago", humantime::format_duration(truncate_to_secs(age))),
            )
        },
    );

    UnitRow {
        name: unit.name.clone(),
        id: unit.id.to_string(),
        status,
        position,
        speed,
        last_report,
    }
}

fn truncate_to_secs(d: std::time::Duration) -> std::time::Duration {
    std::time::Duration::from_secs(d.as_secs())
}

fn kind_label(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Location => "location",
        EntityKind::Sensor => "sensor",
        EntityKind::BinarySensor => "binary_sensor",
    }
}

#[derive(Tabled)]
struct EntityRow {
    #[tabled(rename = "UNIT")]
    unit: String,
    #[tabled(rename = "ENTITY")]
    id: String,
    #[tabled(rename = "KIND")]
    kind: String,
    #[tabled(rename = "VALUE")]
    value: String,
}

pub fn print_entities(entities: &[EntityState], format: OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entities)?);
        }
        OutputFormat::Table => {
            let rows: Vec<EntityRow> = entities
                .iter()
                .map(|entity| {
                    let value = match &entity.value {
                        Some(v) => match &entity.unit {
                            Some(u) => format!("{v} {u}"),
                            None => v.clone(),
                        },
                        None => "unknown".dimmed().to_string(),
                    };
                    EntityRow {
                        unit: entity.unit_name.clone(),
                        id: entity.id.clone(),
                        kind: kind_label(entity.kind).to_owned(),
                        value,
                    }
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::blank()));
        }
    }
    Ok(())
}
