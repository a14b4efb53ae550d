//! # External Data Sources
//!
//! The boundary to the two remote, read-only feeds a refresh depends on: a
//! list of country facts and a currency-to-rate mapping.
//!
//! ## Purpose:
//! `CountrySource` is the seam the sync engine talks to. Production wiring
//! uses `HttpCountrySource`; tests substitute in-memory fakes. Both calls are
//! pure I/O without local side effects, and a failure of either one is a
//! source-unavailable condition for the whole refresh.
//!
//! ## Contained Modules:
//! - **`http`**: `HttpCountrySource`, backed by the shared `ApiClient`.

use async_trait::async_trait;

use crate::error::SourceError;
use crate::models::{CountryFact, RateSnapshot};

/// `reqwest`-backed implementation of `CountrySource`.
pub mod http;

pub use http::{HttpCountrySource, SourceEndpoints};

/// The two remote calls a refresh needs.
#[async_trait]
pub trait CountrySource: Send + Sync {
    async fn fetch_countries(&self) -> Result<Vec<CountryFact>, SourceError>;

    async fn fetch_exchange_rates(&self) -> Result<RateSnapshot, SourceError>;
}

/// Issues both fetches concurrently and waits for both.
///
/// Fails fast with the first error; a partial result is dropped so nothing
/// downstream ever sees facts without rates or the other way round.
pub async fn fetch_all(
    source: &dyn CountrySource,
) -> Result<(Vec<CountryFact>, RateSnapshot), SourceError> {
    tokio::try_join!(source.fetch_countries(), source.fetch_exchange_rates())
}
