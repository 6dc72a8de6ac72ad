//! Command handlers: CLI args -> tracker operations -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod entities;
pub mod units;
pub mod watch;

use std::sync::Arc;

use fleetwatch_core::{AnySource, Tracker, UnitRecord};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Connect a one-shot tracker (no background polling) and return it with
/// its initial snapshot applied.
pub async fn connect_oneshot(global: &GlobalOpts) -> Result<Tracker<AnySource>, CliError> {
    let config = crate::setup::effective_config(global)?;
    let tracker = crate::setup::build_tracker(&config, std::time::Duration::ZERO)?;
    tracker.connect().await?;
    Ok(tracker)
}

/// Filter a snapshot by unit id or (case-insensitive) name.
pub fn select_units(
    snapshot: &[Arc<UnitRecord>],
    selector: Option<&str>,
) -> Result<Vec<Arc<UnitRecord>>, CliError> {
    let Some(selector) = selector else {
        return Ok(snapshot.to_vec());
    };

    let matched: Vec<Arc<UnitRecord>> = snapshot
        .iter()
        .filter(|unit| {
            unit.id.as_str() == selector || unit.name.eq_ignore_ascii_case(selector)
        })
        .cloned()
        .collect();

    if matched.is_empty() {
        return Err(CliError::UnitNotFound {
            identifier: selector.to_owned(),
        });
    }
    Ok(matched)
}
