//! `fleetwatch auth` -- credential verification.

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let tracker = super::connect_oneshot(global).await?;
    let units = tracker.store().len();
    tracker.shutdown().await;

    if !global.quiet {
        println!("Authentication OK ({units} units visible)");
    }
    Ok(())
}
