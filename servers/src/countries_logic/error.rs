use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lib_countries::{StoreError, SyncError};
use serde_json::json;
use tracing::error;

/// # Application Error
///
/// Everything a handler can fail with, mapped to a status code and a JSON body.
#[derive(Debug)]
pub enum AppError {
    /// A refresh failed.
    Sync(SyncError),
    /// A read or delete failed in the store.
    Store(StoreError),
    /// Nothing matched; the message goes to the client as is.
    NotFound(&'static str),
}

impl AppError {
    pub fn country_not_found() -> Self {
        AppError::NotFound("Country not found")
    }
}

impl From<SyncError> for AppError {
    fn from(e: SyncError) -> Self {
        AppError::Sync(e)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_json) = match self {
            AppError::Sync(SyncError::SourceUnavailable(e)) => {
                error!("Refresh failed, source unavailable: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({
                        "error": "External data source unavailable",
                        "details": e.to_string(),
                    }),
                )
            }
            AppError::Sync(e) => {
                error!("Refresh failed: {}", e);
                internal_error()
            }
            AppError::Store(e) => {
                error!("Storage error: {}", e);
                internal_error()
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "error": message })),
        };

        (status, Json(error_json)).into_response()
    }
}

fn internal_error() -> (StatusCode, serde_json::Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "Internal server error" }),
    )
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Sync(e) => write!(f, "Refresh error: {}", e),
            AppError::Store(e) => write!(f, "Storage error: {}", e),
            AppError::NotFound(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Sync(e) => Some(e),
            AppError::Store(e) => Some(e),
            AppError::NotFound(_) => None,
        }
    }
}
