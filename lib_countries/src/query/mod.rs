//! # Query Engine
//!
//! The read side over already-stored records: filtered listing, lookup and
//! deletion by name, and the status aggregate. It never touches the render
//! queue or the remote sources.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::error::StoreError;
use crate::models::{CountryRecord, StatusSummary};
use crate::store::{CountryFilter, CountryStore};

pub use crate::store::SortOrder;

/// Minutes before "now" the status timestamp falls back to when nothing is
/// stored yet.
pub const EMPTY_STATUS_LOOKBACK_MINUTES: i64 = 5;

/// # List Query
///
/// Raw list parameters as callers supply them, e.g. from a query string.
/// Empty or whitespace-only values count as absent. An unrecognised `sort`
/// leaves the store's own order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub region: Option<String>,
    pub currency: Option<String>,
    pub sort: Option<String>,
}

impl ListQuery {
    pub fn to_filter(&self) -> CountryFilter {
        CountryFilter {
            region: non_blank(self.region.as_deref()),
            currency: non_blank(self.currency.as_deref()),
            sort: self.sort.as_deref().and_then(SortOrder::parse),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// # Query Engine
#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<dyn CountryStore>,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn CountryStore>) -> Self {
        Self { store }
    }

    /// Records matching every supplied filter, optionally sorted by GDP.
    pub async fn list(&self, query: &ListQuery) -> Result<Vec<CountryRecord>, StoreError> {
        let filter = query.to_filter();
        let records = self.store.list(&filter).await?;
        tracing::debug!(?filter, matched = records.len(), "listed countries");
        Ok(records)
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<CountryRecord>, StoreError> {
        self.store.find_by_name(name.trim()).await
    }

    /// `false` when no record matched; nothing is changed in that case.
    pub async fn delete_by_name(&self, name: &str) -> Result<bool, StoreError> {
        let removed = self.store.delete_by_name(name.trim()).await?;
        if removed {
            tracing::info!(name, "country deleted");
        } else {
            tracing::debug!(name, "delete matched no country");
        }
        Ok(removed)
    }

    /// Total count and latest refresh time. With an empty store the time is
    /// five minutes before now.
    pub async fn status(&self) -> Result<StatusSummary, StoreError> {
        let (total_countries, latest) =
            tokio::try_join!(self.store.count(), self.store.max_refreshed_at())?;
        Ok(StatusSummary {
            total_countries,
            last_refreshed_at: latest.unwrap_or_else(|| {
                Utc::now() - Duration::minutes(EMPTY_STATUS_LOOKBACK_MINUTES)
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn record(name: &str, region: &str, currency: &str, gdp: f64) -> CountryRecord {
        let mut r = CountryRecord::new(name, Utc.with_ymd_and_hms(2025, 10, 25, 9, 0, 0).unwrap());
        r.region = region.to_string();
        r.currency_code = Some(currency.to_string());
        r.estimated_gdp = gdp;
        r
    }

    fn engine(records: Vec<CountryRecord>) -> QueryEngine {
        QueryEngine::new(Arc::new(MemoryStore::with_records(records)))
    }

    fn names(records: &[CountryRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[tokio::test]
    async fn gdp_desc_orders_highest_first() {
        let engine = engine(vec![
            record("Ten", "Africa", "A", 10.0),
            record("Thirty", "Africa", "B", 30.0),
            record("Twenty", "Africa", "C", 20.0),
        ]);
        let query = ListQuery {
            sort: Some("gdp_desc".into()),
            ..Default::default()
        };
        let out = engine.list(&query).await.unwrap();
        let gdps: Vec<f64> = out.iter().map(|r| r.estimated_gdp).collect();
        assert_eq!(gdps, [30.0, 20.0, 10.0]);
    }

    #[tokio::test]
    async fn blank_params_are_ignored_and_unknown_sort_keeps_order() {
        let engine = engine(vec![
            record("B", "Asia", "X", 2.0),
            record("A", "Europe", "Y", 1.0),
        ]);
        let query = ListQuery {
            region: Some("".into()),
            currency: Some("  ".into()),
            sort: Some("population".into()),
        };
        let out = engine.list(&query).await.unwrap();
        assert_eq!(names(&out), ["B", "A"]);
    }

    #[tokio::test]
    async fn filters_and_sort_compose() {
        let engine = engine(vec![
            record("Ghana", "Africa", "GHS", 5.0),
            record("Togo", "Africa", "XOF", 9.0),
            record("Benin", "africa", "XOF", 12.0),
            record("France", "Europe", "EUR", 50.0),
        ]);
        let query = ListQuery {
            region: Some("AFRICA".into()),
            currency: Some("xof".into()),
            sort: Some("GDP_ASC".into()),
        };
        let out = engine.list(&query).await.unwrap();
        assert_eq!(names(&out), ["Togo", "Benin"]);
    }

    #[tokio::test]
    async fn lookup_and_delete_ignore_case() {
        let engine = engine(vec![record("Nigeria", "Africa", "NGN", 1.0)]);
        assert!(engine.get_by_name("NIGERIA").await.unwrap().is_some());
        assert!(engine.get_by_name("Niger").await.unwrap().is_none());

        assert!(!engine.delete_by_name("Atlantis").await.unwrap());
        assert_eq!(engine.status().await.unwrap().total_countries, 1);

        assert!(engine.delete_by_name("nigeria").await.unwrap());
        assert!(engine.get_by_name("Nigeria").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn status_reports_latest_refresh() {
        let mut newer = record("B", "", "X", 0.0);
        newer.last_refreshed_at = Utc.with_ymd_and_hms(2025, 10, 26, 9, 0, 0).unwrap();
        let engine = engine(vec![record("A", "", "X", 0.0), newer.clone()]);

        let status = engine.status().await.unwrap();
        assert_eq!(status.total_countries, 2);
        assert_eq!(status.last_refreshed_at, newer.last_refreshed_at);
    }

    #[tokio::test]
    async fn empty_status_falls_back_to_recent_past() {
        let lookback = Duration::minutes(EMPTY_STATUS_LOOKBACK_MINUTES);
        let before = Utc::now();
        let status = engine(Vec::new()).status().await.unwrap();
        let after = Utc::now();

        assert_eq!(status.total_countries, 0);
        assert!(status.last_refreshed_at >= before - lookback);
        assert!(status.last_refreshed_at <= after - lookback);
    }
}
