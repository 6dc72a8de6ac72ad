// ── Tracker lifecycle ──
//
// Owns one vendor source, authenticates it, performs the initial fetch,
// and keeps the store current with a periodic poll task. Poll failures
// after connect are non-fatal: the last good snapshot stays in the
// store and the error is published on a `watch` channel. Session expiry
// heals on the next tick because the clients re-login on demand.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::source::{MergePolicy, TrackerSource};
use crate::store::UnitStore;

/// Connection lifecycle state, observable via [`Tracker::state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Tracker configuration.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Interval between polls. Zero disables the background task; the
    /// store then only changes through explicit [`Tracker::refresh`].
    pub poll_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
        }
    }
}

/// Handle to a running tracker. Cheap to clone; all clones share state.
pub struct Tracker<S: TrackerSource> {
    inner: Arc<TrackerInner<S>>,
}

impl<S: TrackerSource> Clone for Tracker<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct TrackerInner<S> {
    source: S,
    config: TrackerConfig,
    store: Arc<UnitStore>,
    state: watch::Sender<TrackerState>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
    /// Message of the most recent failed poll; cleared on success.
    last_error: watch::Sender<Option<String>>,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<S: TrackerSource> Tracker<S> {
    pub fn new(source: S, config: TrackerConfig) -> Self {
        let (state, _) = watch::channel(TrackerState::Disconnected);
        let (last_refresh, _) = watch::channel(None);
        let (last_error, _) = watch::channel(None);

        Self {
            inner: Arc::new(TrackerInner {
                source,
                config,
                store: Arc::new(UnitStore::new()),
                state,
                last_refresh,
                last_error,
                cancel: CancellationToken::new(),
                task: Mutex::new(None),
            }),
        }
    }

    pub fn store(&self) -> &Arc<UnitStore> {
        &self.inner.store
    }

    pub fn state(&self) -> watch::Receiver<TrackerState> {
        self.inner.state.subscribe()
    }

    pub fn last_refresh(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.inner.last_refresh.subscribe()
    }

    pub fn last_error(&self) -> watch::Receiver<Option<String>> {
        self.inner.last_error.subscribe()
    }

    /// Authenticate, load the initial fleet state, and start the poll
    /// task. Credential and first-fetch failures are fatal here so a
    /// misconfigured account surfaces immediately.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let _ = self.inner.state.send(TrackerState::Connecting);

        if let Err(err) = self.inner.source.authenticate().await {
            let _ = self.inner.state.send(TrackerState::Disconnected);
            return Err(err.into());
        }
        debug!(source = self.inner.source.name(), "authenticated");

        if let Err(err) = self.refresh().await {
            let _ = self.inner.state.send(TrackerState::Disconnected);
            return Err(err);
        }

        let _ = self.inner.state.send(TrackerState::Connected);

        if !self.inner.config.poll_interval.is_zero() {
            let tracker = self.clone();
            let cancel = self.inner.cancel.clone();
            let period = self.inner.config.poll_interval;
            let handle = tokio::spawn(poll_task(tracker, period, cancel));
            *self.inner.task.lock().await = Some(handle);
        }

        info!(
            source = self.inner.source.name(),
            units = self.inner.store.len(),
            "tracker connected"
        );
        Ok(())
    }

    /// Perform one poll and apply it to the store.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        match self.inner.source.poll().await {
            Err(err) if err.is_transient() => {
                debug!(
                    source = self.inner.source.name(),
                    error = %err,
                    "transient poll failure"
                );
                let core_err = CoreError::from(err);
                let _ = self.inner.last_error.send(Some(core_err.to_string()));
                Err(core_err)
            }
            Ok(records) => {
                debug!(
                    source = self.inner.source.name(),
                    units = records.len(),
                    "poll succeeded"
                );
                match self.inner.source.merge_policy() {
                    MergePolicy::Replace => self.inner.store.apply_replace(records),
                    MergePolicy::RetainMissing => self.inner.store.apply_retain_missing(records),
                }
                let _ = self.inner.last_refresh.send(Some(Utc::now()));
                let _ = self.inner.last_error.send(None);
                Ok(())
            }
            Err(err) => {
                let core_err = CoreError::from(err);
                let _ = self.inner.last_error.send(Some(core_err.to_string()));
                Err(core_err)
            }
        }
    }

    /// Stop the poll task. The store keeps its last snapshot.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        if let Some(handle) = self.inner.task.lock().await.take() {
            let _ = handle.await;
        }
        let _ = self.inner.state.send(TrackerState::Disconnected);
        info!(source = self.inner.source.name(), "tracker stopped");
    }
}

async fn poll_task<S: TrackerSource>(
    tracker: Tracker<S>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(err) = tracker.refresh().await {
                    // Non-fatal: the last good snapshot stays in place and
                    // an expired session re-logins on the next tick.
                    warn!(
                        source = tracker.inner.source.name(),
                        error = %err,
                        "poll failed"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{UnitId, UnitRecord};
    use indexmap::IndexMap;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    fn record(id: &str) -> UnitRecord {
        UnitRecord {
            id: UnitId::new(id),
            name: format!("Unit {id}"),
            available: true,
            position: None,
            sensors: IndexMap::new(),
            indicators: IndexMap::new(),
            last_reported: None,
            updated_at: Utc::now(),
        }
    }

    struct StubSource {
        auth_result: StdMutex<Option<fleetwatch_api::Error>>,
        polls: StdMutex<VecDeque<Result<Vec<UnitRecord>, fleetwatch_api::Error>>>,
        policy: MergePolicy,
    }

    impl StubSource {
        fn new(polls: Vec<Result<Vec<UnitRecord>, fleetwatch_api::Error>>) -> Self {
            Self {
                auth_result: StdMutex::new(None),
                polls: StdMutex::new(polls.into()),
                policy: MergePolicy::Replace,
            }
        }

        fn failing_auth(message: &str) -> Self {
            let stub = Self::new(Vec::new());
            *stub.auth_result.lock().unwrap() = Some(fleetwatch_api::Error::Authentication {
                message: message.to_owned(),
            });
            stub
        }
    }

    impl TrackerSource for StubSource {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn merge_policy(&self) -> MergePolicy {
            self.policy
        }

        async fn authenticate(&self) -> Result<(), fleetwatch_api::Error> {
            match self.auth_result.lock().unwrap().take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        async fn poll(&self) -> Result<Vec<UnitRecord>, fleetwatch_api::Error> {
            self.polls
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn manual_config() -> TrackerConfig {
        // Zero interval: no background task, polls only via refresh().
        TrackerConfig {
            poll_interval: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn connect_applies_the_initial_poll() {
        let source = StubSource::new(vec![Ok(vec![record("a"), record("b")])]);
        let tracker = Tracker::new(source, manual_config());

        tracker.connect().await.unwrap();
        assert_eq!(*tracker.state().borrow(), TrackerState::Connected);
        assert_eq!(tracker.store().len(), 2);
        assert!(tracker.last_refresh().borrow().is_some());
    }

    #[tokio::test]
    async fn bad_credentials_fail_connect() {
        let source = StubSource::failing_auth("invalid credentials");
        let tracker = Tracker::new(source, manual_config());

        let err = tracker.connect().await.unwrap_err();
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
        assert_eq!(*tracker.state().borrow(), TrackerState::Disconnected);
    }

    #[tokio::test]
    async fn failed_first_fetch_fails_connect() {
        let source = StubSource::new(vec![Err(fleetwatch_api::Error::Api {
            message: "backend down".into(),
        })]);
        let tracker = Tracker::new(source, manual_config());

        assert!(tracker.connect().await.is_err());
        assert_eq!(*tracker.state().borrow(), TrackerState::Disconnected);
    }

    #[tokio::test]
    async fn failed_poll_keeps_last_snapshot_and_reports_error() {
        let source = StubSource::new(vec![
            Ok(vec![record("a")]),
            Err(fleetwatch_api::Error::SessionExpired),
            Ok(vec![record("a"), record("b")]),
        ]);
        let tracker = Tracker::new(source, manual_config());
        tracker.connect().await.unwrap();

        // Poll 2 fails; the store is untouched and the error is published.
        assert!(tracker.refresh().await.is_err());
        assert_eq!(tracker.store().len(), 1);
        assert!(tracker.last_error().borrow().is_some());

        // Poll 3 recovers and clears the error.
        tracker.refresh().await.unwrap();
        assert_eq!(tracker.store().len(), 2);
        assert!(tracker.last_error().borrow().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn poll_task_ticks_and_stops_on_shutdown() {
        let source = StubSource::new(vec![
            Ok(vec![record("a")]),
            Ok(vec![record("a"), record("b")]),
        ]);
        let tracker = Tracker::new(
            source,
            TrackerConfig {
                poll_interval: Duration::from_secs(60),
            },
        );
        tracker.connect().await.unwrap();
        assert_eq!(tracker.store().len(), 1);

        tokio::time::sleep(Duration::from_secs(61)).await;
        tokio::task::yield_now().await;
        assert_eq!(tracker.store().len(), 2);

        tracker.shutdown().await;
        assert_eq!(*tracker.state().borrow(), TrackerState::Disconnected);
    }
}
