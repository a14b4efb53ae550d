//! # Synchronization
//!
//! Merges fetched facts and rates into the stored record set.
//!
//! ## Contained Modules:
//! - **`gdp`**: the estimated GDP derivation, with an injectable RNG.
//! - **`engine`**: `SyncEngine`, which runs a refresh end to end: fetch,
//!   merge, persist as one batch, hand a snapshot to the render queue.

/// Synchronization engine.
pub mod engine;
/// Estimated GDP.
pub mod gdp;

pub use engine::{merge_facts, MergeOutcome, SyncEngine};
pub use gdp::{estimate_gdp, estimate_gdp_with, GDP_FACTOR_RANGE};
