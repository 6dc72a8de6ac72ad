// ── Vendor data sources ──
//
// One `TrackerSource` per vendor surface. The tracker is generic over
// the source, so it never cares which vendor it polls or how the raw
// payload looked; it receives normalized records plus the merge policy
// the vendor's listing semantics require.

use chrono::Utc;
use tracing::debug;

use fleetwatch_api::mobility::MobilityClient;
use fleetwatch_api::tracking::TrackingClient;

use crate::model::UnitRecord;
use crate::normalize::{normalize_mobility, normalize_tracking};

/// How a poll result relates to the fleet as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// The poll lists every unit; absent units were deleted upstream.
    Replace,
    /// The poll omits units with no fresh data; absent units are kept
    /// with last-known values and marked unavailable.
    RetainMissing,
}

/// A pollable vendor surface producing normalized unit records.
pub trait TrackerSource: Send + Sync + 'static {
    /// Short name for log lines.
    fn name(&self) -> &'static str;

    fn merge_policy(&self) -> MergePolicy;

    /// Establish a session eagerly. Called once on connect so credential
    /// problems surface immediately instead of on the first poll.
    fn authenticate(
        &self,
    ) -> impl std::future::Future<Output = Result<(), fleetwatch_api::Error>> + Send;

    /// Fetch and normalize the current fleet state.
    fn poll(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<UnitRecord>, fleetwatch_api::Error>> + Send;
}

/// REST vendor source.
pub struct TrackingSource {
    client: TrackingClient,
}

impl TrackingSource {
    pub fn new(client: TrackingClient) -> Self {
        Self { client }
    }
}

impl TrackerSource for TrackingSource {
    fn name(&self) -> &'static str {
        "tracking"
    }

    fn merge_policy(&self) -> MergePolicy {
        MergePolicy::Replace
    }

    async fn authenticate(&self) -> Result<(), fleetwatch_api::Error> {
        self.client.authenticate().await
    }

    async fn poll(&self) -> Result<Vec<UnitRecord>, fleetwatch_api::Error> {
        let raw_units = self.client.latest_positions().await?;
        let total = raw_units.len();
        let records: Vec<UnitRecord> = raw_units
            .iter()
            .filter_map(normalize_tracking)
            .collect();
        if records.len() < total {
            debug!(
                skipped = total - records.len(),
                "dropped unit entries without identity fields"
            );
        }
        Ok(records)
    }
}

/// Source chosen at runtime from configuration.
pub enum AnySource {
    Tracking(TrackingSource),
    Mobility(MobilitySource),
}

impl TrackerSource for AnySource {
    fn name(&self) -> &'static str {
        match self {
            Self::Tracking(s) => s.name(),
            Self::Mobility(s) => s.name(),
        }
    }

    fn merge_policy(&self) -> MergePolicy {
        match self {
            Self::Tracking(s) => s.merge_policy(),
            Self::Mobility(s) => s.merge_policy(),
        }
    }

    async fn authenticate(&self) -> Result<(), fleetwatch_api::Error> {
        match self {
            Self::Tracking(s) => s.authenticate().await,
            Self::Mobility(s) => s.authenticate().await,
        }
    }

    async fn poll(&self) -> Result<Vec<UnitRecord>, fleetwatch_api::Error> {
        match self {
            Self::Tracking(s) => s.poll().await,
            Self::Mobility(s) => s.poll().await,
        }
    }
}

/// Portal vendor source.
pub struct MobilitySource {
    client: MobilityClient,
}

impl MobilitySource {
    pub fn new(client: MobilityClient) -> Self {
        Self { client }
    }
}

impl TrackerSource for MobilitySource {
    fn name(&self) -> &'static str {
        "mobility"
    }

    fn merge_policy(&self) -> MergePolicy {
        MergePolicy::RetainMissing
    }

    async fn authenticate(&self) -> Result<(), fleetwatch_api::Error> {
        self.client.authenticate().await.map(|_| ())
    }

    async fn poll(&self) -> Result<Vec<UnitRecord>, fleetwatch_api::Error> {
        let (prefs, raw_units) = self.client.units().await?;
        let now = Utc::now();
        Ok(raw_units
            .iter()
            .filter_map(|raw| normalize_mobility(raw, &prefs, now))
            .collect())
    }
}
