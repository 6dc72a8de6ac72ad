//! Config + flag merging and tracker construction.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use fleetwatch_api::mobility::MobilityClient;
use fleetwatch_api::tracking::TrackingClient;
use fleetwatch_api::transport::TransportConfig;
use fleetwatch_config::{Config, Vendor};
use fleetwatch_core::{AnySource, MobilitySource, Tracker, TrackerConfig, TrackingSource};

use crate::cli::{GlobalOpts, VendorArg};
use crate::error::CliError;

/// Load the config file and apply CLI flag overrides on top.
pub fn effective_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut config = fleetwatch_config::load_config()?;

    if let Some(vendor) = global.vendor {
        config.vendor = match vendor {
            VendorArg::Tracking => Vendor::Tracking,
            VendorArg::Mobility => Vendor::Mobility,
        };
    }
    if let Some(ref username) = global.username {
        config.username = Some(username.clone());
    }
    if let Some(ref password) = global.password {
        config.password = Some(password.clone());
    }
    if let Some(ref base_url) = global.base_url {
        config.base_url = Some(base_url.clone());
    }
    if let Some(timeout) = global.timeout {
        config.timeout_secs = timeout;
    }

    tracing::debug!(vendor = ?config.vendor, "effective configuration assembled");
    Ok(config)
}

/// Build a tracker from the effective config. `poll_interval` zero means
/// no background task -- one-shot commands refresh explicitly.
pub fn build_tracker(
    config: &Config,
    poll_interval: Duration,
) -> Result<Tracker<AnySource>, CliError> {
    let (username, password) = fleetwatch_config::resolve_credentials(config)?;
    let base_url = config.base_url()?;
    let transport = TransportConfig {
        timeout: config.timeout(),
        ..TransportConfig::default()
    };

    let source = match config.vendor {
        Vendor::Tracking => AnySource::Tracking(TrackingSource::new(build_tracking_client(
            base_url, username, password, &transport,
        )?)),
        Vendor::Mobility => AnySource::Mobility(MobilitySource::new(build_mobility_client(
            base_url, username, password, &transport,
        )?)),
    };

    Ok(Tracker::new(source, TrackerConfig { poll_interval }))
}

fn build_tracking_client(
    base_url: Option<Url>,
    username: String,
    password: SecretString,
    transport: &TransportConfig,
) -> Result<TrackingClient, CliError> {
    let client = match base_url {
        Some(url) => TrackingClient::with_base_url(url, username, password, transport),
        None => TrackingClient::new(username, password, transport),
    };
    client.map_err(|err| CliError::from(fleetwatch_core::CoreError::from(err)))
}

fn build_mobility_client(
    base_url: Option<Url>,
    username: String,
    password: SecretString,
    transport: &TransportConfig,
) -> Result<MobilityClient, CliError> {
    let client = match base_url {
        Some(url) => MobilityClient::with_base_url(url, username, password, transport.clone()),
        None => MobilityClient::new(username, password, transport.clone()),
    };
    client.map_err(|err| CliError::from(fleetwatch_core::CoreError::from(err)))
}
