// ── Reactive unit store ──
//
// Lock-free concurrent storage for normalized unit records with
// push-based change notification via `watch` channels. Every applied
// poll bumps a version counter and rebuilds the snapshot subscribers
// receive.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::watch;

use crate::model::{UnitId, UnitRecord};

/// Shared store of the latest normalized record per unit.
pub struct UnitStore {
    by_id: DashMap<UnitId, Arc<UnitRecord>>,

    /// Version counter, bumped on every applied poll.
    version: watch::Sender<u64>,

    /// Full snapshot, rebuilt on mutation for cheap subscription.
    snapshot: watch::Sender<Arc<Vec<Arc<UnitRecord>>>>,
}

impl UnitStore {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            by_id: DashMap::new(),
            version,
            snapshot,
        }
    }

    /// Apply a poll result that is authoritative for the whole fleet:
    /// incoming records are upserted, then units absent from the incoming
    /// set are removed. Upsert-then-prune avoids the brief empty state a
    /// clear-then-insert approach would cause.
    pub fn apply_replace(&self, records: Vec<UnitRecord>) {
        let incoming: HashSet<UnitId> = records.iter().map(|r| r.id.clone()).collect();
        for record in records {
            self.by_id.insert(record.id.clone(), Arc::new(record));
        }
        let stale: Vec<UnitId> = self
            .by_id
            .iter()
            .map(|r| r.key().clone())
            .filter(|id| !incoming.contains(id))
            .collect();
        for id in stale {
            self.by_id.remove(&id);
        }

        self.rebuild_snapshot();
        self.bump_version();
    }

    /// Apply a poll result from a vendor that silently drops units it has
    /// no fresh data for: incoming records are upserted, and known units
    /// missing from the incoming set are kept with their last values but
    /// marked unavailable.
    pub fn apply_retain_missing(&self, records: Vec<UnitRecord>) {
        let incoming: HashSet<UnitId> = records.iter().map(|r| r.id.clone()).collect();
        for record in records {
            self.by_id.insert(record.id.clone(), Arc::new(record));
        }
        let missing: Vec<UnitId> = self
            .by_id
            .iter()
            .filter(|r| !incoming.contains(r.key()) && r.value().available)
            .map(|r| r.key().clone())
            .collect();
        for id in missing {
            if let Some(mut entry) = self.by_id.get_mut(&id) {
                let mut record = (**entry.value()).clone();
                record.available = false;
                record.updated_at = Utc::now();
                *entry.value_mut() = Arc::new(record);
            }
        }

        self.rebuild_snapshot();
        self.bump_version();
    }

    pub fn get(&self, id: &UnitId) -> Option<Arc<UnitRecord>> {
        self.by_id.get(id).map(|r| Arc::clone(r.value()))
    }

    /// Current snapshot (cheap `Arc` clone), sorted by unit name for
    /// stable presentation.
    pub fn snapshot(&self) -> Arc<Vec<Arc<UnitRecord>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<UnitRecord>>>> {
        self.snapshot.subscribe()
    }

    /// Subscribe to the version counter; every applied poll bumps it even
    /// when no record changed.
    pub fn subscribe_version(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    fn rebuild_snapshot(&self) {
        let mut values: Vec<Arc<UnitRecord>> =
            self.by_id.iter().map(|r| Arc::clone(r.value())).collect();
        values.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.as_str().cmp(b.id.as_str())));
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

impl Default for UnitStore {
    fn default() -> Self {
        Self::new()
    }
}
