//! # HTTP Retrieval Utilities
//!
//! A thin asynchronous wrapper around `reqwest` that performs a GET, captures
//! the status line and decodes a JSON body on success. Non-2xx responses are
//! returned as data, not as errors, so callers decide how to treat them.

use std::time::Duration;

use reqwest::{Method, Url};
use serde::de::DeserializeOwned;

use crate::error::SourceError;

const USER_AGENT: &str = "lib_countries/0.1";

/// A standardized container for API responses.
#[derive(Debug)]
pub struct ApiResponse<T> {
    /// The successfully deserialized response body, if any.
    pub data: Option<T>,
    /// The raw error body returned by the server if the request failed.
    pub error_body: Option<String>,
    /// The numeric HTTP status code.
    pub status: u16,
    /// Indicates if the status code was in the 2xx range.
    pub success: bool,
}

/// A reusable asynchronous HTTP client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: reqwest::Client,
}

impl ApiClient {
    /// Creates a new `ApiClient` with the given request timeout.
    ///
    /// # Errors
    /// `Client` if the TLS backend or resolver cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(SourceError::Client)?;
        Ok(Self { inner })
    }

    /// Performs a GET against an absolute URL and decodes a JSON body.
    ///
    /// # Errors
    /// `InvalidUrl` if `url` does not parse, `Transport` if the request never
    /// produced a response, `Decode` if a 2xx body is not valid JSON for `T`.
    pub async fn get_json<T>(&self, url: &str) -> Result<ApiResponse<T>, SourceError>
    where
        T: DeserializeOwned,
    {
        // 1. Validate the URL up front so a typo is not reported as a network error
        let full_url = Url::parse(url).map_err(|_| SourceError::InvalidUrl(url.to_string()))?;

        // 2. Execute the request and capture response metadata
        let response = self
            .inner
            .request(Method::GET, full_url)
            .send()
            .await
            .map_err(|source| SourceError::Transport {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();

        // 3. Decode on success, keep the raw body otherwise
        if status.is_success() {
            let data = response
                .json::<T>()
                .await
                .map_err(|source| SourceError::Decode {
                    url: url.to_string(),
                    source,
                })?;
            Ok(ApiResponse {
                data: Some(data),
                error_body: None,
                status: status.as_u16(),
                success: true,
            })
        } else {
            let error_text = response.text().await.ok();
            Ok(ApiResponse {
                data: None,
                error_body: error_text,
                status: status.as_u16(),
                success: false,
            })
        }
    }
}
