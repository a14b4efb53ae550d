//! # In-Memory Store
//!
//! Keeps records in a `Vec` behind a `tokio` `RwLock`. Storage order is
//! insertion order. A batch upsert holds the write lock for the whole batch,
//! so readers never observe half of one.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{CountryFilter, CountryStore};
use crate::error::StoreError;
use crate::models::CountryRecord;

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<CountryRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `records`, in the given order.
    pub fn with_records(records: Vec<CountryRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl CountryStore for MemoryStore {
    async fn upsert_batch(&self, batch: &[CountryRecord]) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        for incoming in batch {
            match records.iter_mut().find(|r| r.same_name(&incoming.name)) {
                Some(existing) => *existing = incoming.clone(),
                None => records.push(incoming.clone()),
            }
        }
        Ok(())
    }

    async fn all(&self) -> Result<Vec<CountryRecord>, StoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<CountryRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.same_name(name)).cloned())
    }

    async fn delete_by_name(&self, name: &str) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| !r.same_name(name));
        Ok(records.len() < before)
    }

    async fn list(&self, filter: &CountryFilter) -> Result<Vec<CountryRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(filter.apply(records.iter().cloned()))
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.records.read().await.len())
    }

    async fn max_refreshed_at(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().map(|r| r.last_refreshed_at).max())
    }
}
