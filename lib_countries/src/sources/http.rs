//! # HTTP Country Source
//!
//! Fetches country facts (restcountries v2 shape) and USD-based exchange
//! rates (open.er-api shape) over HTTP.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::CountrySource;
use crate::error::SourceError;
use crate::models::{CountryFact, RateSnapshot};
use crate::retrieve::ApiClient;

pub const DEFAULT_COUNTRIES_URL: &str =
    "https://restcountries.com/v2/all?fields=name,capital,region,population,flag,currencies";
pub const DEFAULT_RATES_URL: &str = "https://open.er-api.com/v6/latest/USD";

/// Where the two feeds live and how long to wait for them.
#[derive(Debug, Clone)]
pub struct SourceEndpoints {
    pub countries_url: String,
    pub rates_url: String,
    pub timeout: Duration,
}

impl Default for SourceEndpoints {
    fn default() -> Self {
        Self {
            countries_url: DEFAULT_COUNTRIES_URL.to_string(),
            rates_url: DEFAULT_RATES_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Wire shape of the rates feed.
#[derive(Debug, Deserialize)]
struct RatesPayload {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    rates: Option<HashMap<String, f64>>,
}

/// # HTTP Country Source
///
/// Production `CountrySource`. Holds one `ApiClient` for both feeds so they
/// share a connection pool.
#[derive(Debug, Clone)]
pub struct HttpCountrySource {
    client: ApiClient,
    endpoints: SourceEndpoints,
}

impl HttpCountrySource {
    pub fn new(endpoints: SourceEndpoints) -> Result<Self, SourceError> {
        Ok(Self {
            client: ApiClient::new(endpoints.timeout)?,
            endpoints,
        })
    }

    /// GET `url` and insist on a 2xx JSON body.
    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        let response = self.client.get_json::<T>(url).await?;
        match response.data {
            Some(data) if response.success => Ok(data),
            _ => {
                tracing::warn!(
                    url,
                    status = response.status,
                    body = response.error_body.as_deref().unwrap_or_default(),
                    "source returned a non-success response"
                );
                Err(SourceError::Status {
                    url: url.to_string(),
                    status: response.status,
                })
            }
        }
    }
}

#[async_trait]
impl CountrySource for HttpCountrySource {
    async fn fetch_countries(&self) -> Result<Vec<CountryFact>, SourceError> {
        let facts: Vec<CountryFact> = self.fetch(&self.endpoints.countries_url).await?;
        tracing::debug!(count = facts.len(), "fetched country facts");
        Ok(facts)
    }

    async fn fetch_exchange_rates(&self) -> Result<RateSnapshot, SourceError> {
        let url = &self.endpoints.rates_url;
        let payload: RatesPayload = self.fetch(url).await?;

        if let Some(result) = payload.result.as_deref() {
            if !result.eq_ignore_ascii_case("success") {
                return Err(SourceError::Upstream {
                    url: url.clone(),
                    result: result.to_string(),
                });
            }
        }

        let rates = payload.rates.ok_or_else(|| SourceError::Upstream {
            url: url.clone(),
            result: "missing rates".to_string(),
        })?;
        tracing::debug!(count = rates.len(), "fetched exchange rates");
        Ok(RateSnapshot::new(rates))
    }
}
