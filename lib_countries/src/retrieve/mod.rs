//! # Data Retrieval Module
//!
//! A single JSON-over-HTTP client shared by every remote source in this crate.
//!
//! ## Contained Modules:
//!
//! - **`api_client`**: an `ApiClient` built on `reqwest` with a request timeout
//!   and a fixed user agent. It does not retry; a refresh either sees both
//!   sources answer or fails as a whole.

/// JSON HTTP client returning status metadata alongside the decoded body.
pub mod api_client;

pub use api_client::{ApiClient, ApiResponse};
