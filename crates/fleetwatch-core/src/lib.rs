//! Reactive data layer between `fleetwatch-api` and its consumers.
//!
//! This crate owns the business logic, domain model, and reactive data
//! infrastructure for the fleetwatch workspace:
//!
//! - **[`Tracker`]** — Central facade managing the full lifecycle:
//!   [`connect()`](Tracker::connect) authenticates the vendor source,
//!   fetches an initial fleet snapshot, then keeps the store current with
//!   a periodic poll task. Poll failures after connect are non-fatal.
//!
//! - **[`UnitStore`]** — Lock-free reactive storage (`DashMap` +
//!   `tokio::sync::watch` channels) holding the latest normalized record
//!   per unit, with two merge policies matching the two vendors' listing
//!   semantics.
//!
//! - **[`TrackerSource`]** — The seam between the tracker and the vendor
//!   surfaces: each source polls its API and emits normalized
//!   [`UnitRecord`]s.
//!
//! - **Normalization** ([`normalize`]) — Tolerant converters from raw
//!   vendor payloads (JSON trees, formatted strings, embedded HTML) into
//!   the canonical model.
//!
//! - **Entity projection** ([`entity`]) — Flattens unit records into the
//!   per-value entity list presentation layers render.

pub mod catalog;
pub mod entity;
pub mod error;
pub mod model;
pub mod normalize;
pub mod source;
pub mod store;
pub mod tracker;

// ── Primary re-exports ──────────────────────────────────────────────
pub use entity::{EntityKind, EntityState, entities_for};
pub use error::CoreError;
pub use model::{
    BinaryIndicator, Position, ReadingValue, SensorReading, UnitId, UnitRecord,
};
pub use source::{AnySource, MergePolicy, MobilitySource, TrackerSource, TrackingSource};
pub use store::UnitStore;
pub use tracker::{Tracker, TrackerConfig, TrackerState};
