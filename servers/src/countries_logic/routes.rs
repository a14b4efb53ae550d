use crate::countries_logic::error::AppError;
use crate::countries_logic::state::AppState;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use lib_countries::{CountryRecord, ListQuery, StatusSummary, load_artifact};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

pub const BANNER: &str = "Country Currency & Exchange API is running";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/status", get(status_handler))
        .route("/countries", get(list_handler))
        .route("/countries/refresh", post(refresh_handler))
        .route("/countries/image", get(image_handler))
        .route("/countries/{name}", get(get_handler).delete(delete_handler))
        .with_state(state)
}

/// Serves the API on `listener` until the shutdown channel fires.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    mut shutdown: broadcast::Receiver<()>,
) -> std::io::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            shutdown.recv().await.ok();
            tracing::info!("HTTP server shutting down.");
        })
        .await
}

async fn root_handler() -> &'static str {
    BANNER
}

async fn refresh_handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let summary = state.sync.refresh().await?;
    tracing::info!(
        countries = summary.countries_processed,
        refreshed_at = %summary.refreshed_at,
        "Refresh completed"
    );
    Ok(Json(json!({
        "status": "success",
        "message": "Data refreshed successfully.",
        "countries_processed": summary.countries_processed,
        "refreshed_at": summary.refreshed_at,
    })))
}

async fn list_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CountryRecord>>, AppError> {
    Ok(Json(state.query.list(&query).await?))
}

async fn get_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CountryRecord>, AppError> {
    state
        .query
        .get_by_name(&name)
        .await?
        .map(Json)
        .ok_or_else(AppError::country_not_found)
}

async fn delete_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.query.delete_by_name(&name).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::country_not_found())
    }
}

async fn status_handler(State(state): State<AppState>) -> Result<Json<StatusSummary>, AppError> {
    Ok(Json(state.query.status().await?))
}

async fn image_handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    match load_artifact(state.artifact_path.as_path()).await {
        Some(bytes) => Ok(([(header::CONTENT_TYPE, "image/png")], bytes)),
        None => Err(AppError::NotFound("Summary image not found")),
    }
}
