//! # Storage Module
//!
//! The persisted record set behind a narrow async interface.
//!
//! ## Purpose:
//! The sync engine and the query engine never see a database directly. They
//! consume `CountryStore`: create-or-update by key as one batch, delete by
//! key, filtered and sorted reads, count, and a max-timestamp aggregate. The
//! store owns its own isolation; this crate adds no locking of its own.
//!
//! ## Contained Modules:
//! - **`memory`**: `MemoryStore`, a `RwLock<Vec<_>>` used by tests and by the
//!   server when no database URL is configured.
//! - **`postgres`** (feature `postgres`): `PgStore` on a `deadpool-postgres` pool.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::CountryRecord;

/// In-memory store.
pub mod memory;
/// PostgreSQL store.
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PgStore;

/// Ordering by estimated GDP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    GdpAsc,
    GdpDesc,
}

impl SortOrder {
    /// Parses `gdp_asc` / `gdp_desc`, ignoring case. Anything else is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gdp_asc" => Some(Self::GdpAsc),
            "gdp_desc" => Some(Self::GdpDesc),
            _ => None,
        }
    }
}

/// Read-side filter. `None` fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryFilter {
    /// Case-insensitive equality on `region`.
    pub region: Option<String>,
    /// Case-insensitive equality on `currency_code`.
    pub currency: Option<String>,
    pub sort: Option<SortOrder>,
}

impl CountryFilter {
    pub fn matches(&self, record: &CountryRecord) -> bool {
        let region_ok = self
            .region
            .as_deref()
            .is_none_or(|region| eq_ignore_case(&record.region, region));
        let currency_ok = self.currency.as_deref().is_none_or(|currency| {
            record
                .currency_code
                .as_deref()
                .is_some_and(|code| eq_ignore_case(code, currency))
        });
        region_ok && currency_ok
    }

    /// Filters then sorts `records`. The sort is stable, so ties keep storage order.
    pub fn apply(&self, records: impl IntoIterator<Item = CountryRecord>) -> Vec<CountryRecord> {
        let mut selected: Vec<CountryRecord> =
            records.into_iter().filter(|r| self.matches(r)).collect();
        match self.sort {
            Some(SortOrder::GdpAsc) => {
                selected.sort_by(|a, b| a.estimated_gdp.total_cmp(&b.estimated_gdp))
            }
            Some(SortOrder::GdpDesc) => {
                selected.sort_by(|a, b| b.estimated_gdp.total_cmp(&a.estimated_gdp))
            }
            None => {}
        }
        selected
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// # Country Store
///
/// The storage surface consumed by the sync and query engines. Name arguments
/// match case-insensitively everywhere.
#[async_trait]
pub trait CountryStore: Send + Sync {
    /// Creates or updates every record, keyed by case-insensitive name, as one
    /// all-or-nothing batch.
    async fn upsert_batch(&self, records: &[CountryRecord]) -> Result<(), StoreError>;

    /// Every stored record, in storage order.
    async fn all(&self) -> Result<Vec<CountryRecord>, StoreError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<CountryRecord>, StoreError>;

    /// Returns whether a record was actually removed.
    async fn delete_by_name(&self, name: &str) -> Result<bool, StoreError>;

    async fn list(&self, filter: &CountryFilter) -> Result<Vec<CountryRecord>, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;

    /// Latest `last_refreshed_at` across all records, `None` when empty.
    async fn max_refreshed_at(&self) -> Result<Option<DateTime<Utc>>, StoreError>;
}
