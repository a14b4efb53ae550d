//! # Synchronization Engine
//!
//! One refresh, start to finish:
//!
//! 1. Fetch facts and rates concurrently. Either failing aborts the refresh
//!    before anything is written.
//! 2. Merge the facts into the current record set by case-insensitive name,
//!    stamping every touched record with one shared timestamp.
//! 3. Persist every touched record as a single batch.
//! 4. Push a snapshot of the full merged set onto the render queue, waiting
//!    for a free slot when the queue is full.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;

use super::gdp::estimate_gdp_with;
use crate::error::SyncError;
use crate::models::{
    name_key, CountryFact, CountryRecord, RateSnapshot, RefreshSummary, RenderSnapshot,
};
use crate::render::RenderSender;
use crate::sources::{fetch_all, CountrySource};
use crate::store::CountryStore;

/// Result of merging one fetched batch into an existing record set.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// Every record after the merge, in storage order. New names are appended.
    pub merged: Vec<CountryRecord>,
    /// Created or updated records, once each, in first-touched order.
    pub touched: Vec<CountryRecord>,
}

/// Merges `facts` into `existing`.
///
/// Pure apart from the draws on `rng`. Two facts whose names differ only in
/// case update the same record, the later one winning. Facts with a blank
/// name are skipped.
pub fn merge_facts<R: Rng>(
    existing: Vec<CountryRecord>,
    facts: &[CountryFact],
    rates: &RateSnapshot,
    refreshed_at: DateTime<Utc>,
    rng: &mut R,
) -> MergeOutcome {
    let mut merged = existing;
    let mut index: HashMap<String, usize> = merged
        .iter()
        .enumerate()
        .map(|(pos, record)| (name_key(&record.name), pos))
        .collect();
    let mut touched_order: Vec<usize> = Vec::new();
    let mut touched_set: HashSet<usize> = HashSet::new();

    for fact in facts {
        let name = fact.name.trim();
        if name.is_empty() {
            tracing::warn!(population = fact.population, "skipping country fact without a name");
            continue;
        }

        let pos = *index.entry(name_key(name)).or_insert_with(|| {
            merged.push(CountryRecord::new(name, refreshed_at));
            merged.len() - 1
        });
        let record = &mut merged[pos];

        record.name = name.to_string();
        record.capital = fact.capital.clone();
        record.region = fact.region.clone();
        record.population = fact.population;
        record.flag_url = fact.flag.clone();

        record.currency_code = fact.primary_currency().map(str::to_string);
        record.exchange_rate = record
            .currency_code
            .as_deref()
            .and_then(|code| rates.rate_for(code));
        record.estimated_gdp = estimate_gdp_with(rng, record.population, record.exchange_rate);
        record.last_refreshed_at = refreshed_at;

        if touched_set.insert(pos) {
            touched_order.push(pos);
        }
    }

    let touched = touched_order.iter().map(|&pos| merged[pos].clone()).collect();
    MergeOutcome { merged, touched }
}

/// # Sync Engine
///
/// Owns the producer end of the render queue. Cheap to clone; every clone
/// shares the same source, store and queue.
#[derive(Clone)]
pub struct SyncEngine {
    source: Arc<dyn CountrySource>,
    store: Arc<dyn CountryStore>,
    render_tx: RenderSender,
}

impl SyncEngine {
    pub fn new(
        source: Arc<dyn CountrySource>,
        store: Arc<dyn CountryStore>,
        render_tx: RenderSender,
    ) -> Self {
        Self {
            source,
            store,
            render_tx,
        }
    }

    /// Fetches both feeds and synchronizes them.
    ///
    /// # Errors
    /// `SyncError::SourceUnavailable` when either fetch fails; storage is
    /// untouched in that case.
    pub async fn refresh(&self) -> Result<RefreshSummary, SyncError> {
        tracing::info!("refresh started");
        let (facts, rates) = fetch_all(self.source.as_ref()).await.map_err(|e| {
            tracing::error!(error = %e, "refresh aborted: source unavailable");
            SyncError::from(e)
        })?;
        tracing::debug!(facts = facts.len(), rates = rates.len(), "sources fetched");
        self.synchronize(facts, rates).await
    }

    /// Merges already-fetched data, persists it and enqueues a render snapshot.
    ///
    /// Returns only after the snapshot is on the queue.
    pub async fn synchronize(
        &self,
        facts: Vec<CountryFact>,
        rates: RateSnapshot,
    ) -> Result<RefreshSummary, SyncError> {
        let refreshed_at = Utc::now();
        let existing = self.store.all().await?;

        // The thread-local RNG is not `Send`; keep it out of any await.
        let MergeOutcome { merged, touched } = {
            let mut rng = rand::rng();
            merge_facts(existing, &facts, &rates, refreshed_at, &mut rng)
        };

        self.store.upsert_batch(&touched).await?;
        tracing::info!(
            countries = touched.len(),
            total = merged.len(),
            %refreshed_at,
            "country batch persisted"
        );

        self.render_tx
            .push(RenderSnapshot::new(merged, refreshed_at))
            .await?;
        tracing::debug!(pending = self.render_tx.pending(), "render snapshot queued");

        Ok(RefreshSummary {
            countries_processed: facts.len(),
            refreshed_at,
        })
    }
}
