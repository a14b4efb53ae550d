//! # Error Types
//!
//! One error enum per seam. Absence of a record is not an error anywhere in
//! this crate: lookups return `Option` and deletions return `bool`.

use thiserror::Error;

/// Failure of either remote source. Every variant means "source unavailable".
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} reported failure: {result}")]
    Upstream { url: String, result: String },

    #[error("invalid source URL {0}")]
    InvalidUrl(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Custom error types for storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to connect to database: {0}")]
    ConnectionError(String),

    #[error("Query execution failed: {0}")]
    QueryError(String),

    #[error("Value out of range for column {column}: {value}")]
    Conversion { column: &'static str, value: String },
}

/// Reasons a refresh can fail. No storage write happens for the first variant.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("External data source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),

    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),

    #[error(transparent)]
    QueueClosed(#[from] QueueClosed),
}

/// The render worker side of the queue is gone (shutdown, or the worker exited).
#[derive(Debug, Error)]
#[error("render queue is closed")]
pub struct QueueClosed;

/// Failure to produce one summary artifact. Contained inside the render worker.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error occurred: {0}")]
    Io(#[from] std::io::Error),

    #[error("render task panicked: {0}")]
    Panicked(String),
}
