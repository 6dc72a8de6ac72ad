//! `fleetwatch units` -- fleet listing.

use crate::cli::{GlobalOpts, UnitsArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(args: UnitsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let tracker = super::connect_oneshot(global).await?;
    let snapshot = tracker.store().snapshot();
    tracker.shutdown().await;

    let units = super::select_units(&snapshot, args.unit.as_deref())?;
    output::print_units(&units, global.output)
}
