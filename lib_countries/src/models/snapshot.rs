use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::country::CountryRecord;

/// # Rate Snapshot
///
/// Currency code to exchange rate for the duration of one refresh.
/// Code lookups are case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateSnapshot(HashMap<String, f64>);

impl RateSnapshot {
    pub fn new(rates: HashMap<String, f64>) -> Self {
        Self(rates)
    }

    pub fn rate_for(&self, code: &str) -> Option<f64> {
        self.0.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, f64)> for RateSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// # Render Snapshot
///
/// The full record set at the end of one merge plus the refresh timestamp.
/// Created once by the sync engine, consumed once by the render worker.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    countries: Vec<CountryRecord>,
    refreshed_at: DateTime<Utc>,
}

impl RenderSnapshot {
    pub fn new(countries: Vec<CountryRecord>, refreshed_at: DateTime<Utc>) -> Self {
        Self { countries, refreshed_at }
    }

    /// Records in storage order.
    pub fn countries(&self) -> &[CountryRecord] {
        &self.countries
    }

    pub fn refreshed_at(&self) -> DateTime<Utc> {
        self.refreshed_at
    }
}

/// Result of a successful refresh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RefreshSummary {
    /// Number of facts the country source returned.
    pub countries_processed: usize,
    pub refreshed_at: DateTime<Utc>,
}

/// Aggregate over the stored record set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusSummary {
    pub total_countries: usize,
    pub last_refreshed_at: DateTime<Utc>,
}
