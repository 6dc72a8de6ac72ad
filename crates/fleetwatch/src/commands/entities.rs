//! `fleetwatch entities` -- per-value entity listing.

use fleetwatch_core::entities_for;

use crate::cli::{EntitiesArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub async fn handle(args: EntitiesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let tracker = super::connect_oneshot(global).await?;
    let snapshot = tracker.store().snapshot();
    tracker.shutdown().await;

    let units = super::select_units(&snapshot, args.unit.as_deref())?;

    let entities: Vec<_> = units
        .iter()
        .flat_map(|unit| entities_for(unit))
        .filter(|entity| args.diagnostics || !entity.diagnostic)
        .collect();

    output::print_entities(&entities, global.output)
}
