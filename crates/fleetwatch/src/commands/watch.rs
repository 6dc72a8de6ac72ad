//! `fleetwatch watch` -- continuous polling with live output.

use owo_colors::OwoColorize;

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut config = crate::setup::effective_config(global)?;
    if let Some(interval) = args.interval {
        config.poll_interval_secs = interval;
    }
    let interval = config.poll_interval();

    let tracker = crate::setup::build_tracker(&config, interval)?;
    tracker.connect().await?;

    if !global.quiet {
        eprintln!(
            "Watching {} units (poll every {}s, Ctrl-C to stop)",
            tracker.store().len(),
            interval.as_secs()
        );
    }

    let mut snapshots = tracker.store().subscribe();
    let mut errors = tracker.last_error();

    // Print the initial state, then every applied poll until Ctrl-C.
    output::print_units(&tracker.store().snapshot(), global.output)?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                if !global.quiet {
                    println!();
                }
                output::print_units(&snapshot, global.output)?;
            }
            changed = errors.changed() => {
                if changed.is_err() {
                    break;
                }
                let message = errors.borrow_and_update().clone();
                if let Some(message) = message {
                    eprintln!("{} {message}", "poll failed:".yellow());
                }
            }
        }
    }

    tracker.shutdown().await;
    Ok(())
}
