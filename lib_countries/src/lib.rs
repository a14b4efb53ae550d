//! # lib_countries
//!
//! Country reference data synchronization with a background summary renderer.
//!
//! A refresh pulls country facts and exchange rates from two remote sources
//! concurrently, merges them into the stored record set keyed by
//! case-insensitive country name, derives an estimated GDP per record and
//! hands an immutable snapshot of the merged set to a bounded queue. A single
//! long-lived worker drains that queue and renders a PNG summary.
//!
//! ## Modules:
//! - **`models`**: records, facts, rate snapshots and summaries.
//! - **`retrieve`**: the JSON HTTP client shared by both remote sources.
//! - **`sources`**: the `CountrySource` seam and its HTTP implementation.
//! - **`sync`**: the GDP estimate and the synchronization engine.
//! - **`store`**: the `CountryStore` seam with in-memory and Postgres backends.
//! - **`query`**: read-side filtering, lookup, deletion and status.
//! - **`render`**: the bounded queue, the worker loop and the PNG renderer.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications)]

pub mod error;
pub mod models;
pub mod query;
pub mod render;
pub mod retrieve;
pub mod sources;
pub mod store;
pub mod sync;

// --- Public API Re-exports ---
pub use error::{RenderError, SourceError, StoreError, SyncError};
pub use models::{
    CountryFact, CountryRecord, CurrencyFact, RateSnapshot, RefreshSummary, RenderSnapshot,
    StatusSummary,
};
pub use query::{ListQuery, QueryEngine, SortOrder};
pub use render::{
    load_artifact, render_queue, PngSummaryRenderer, RenderReceiver, RenderSender, RenderWorker,
    SummaryRenderer, SummaryReport, RENDER_QUEUE_CAPACITY,
};
pub use sources::{CountrySource, HttpCountrySource, SourceEndpoints};
pub use store::{CountryFilter, CountryStore, MemoryStore};
pub use sync::{estimate_gdp, SyncEngine};

#[cfg(feature = "postgres")]
pub use store::PgStore;
