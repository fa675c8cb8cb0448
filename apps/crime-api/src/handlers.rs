//! HTTP handlers for the Crimes API

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crime_core::query;
use crime_types::ResultPage;

use crate::error::ApiError;
use crate::models::*;
use crate::state::AppState;

/// Liveness message
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Crimes API running. Use /v1/crimes".to_string(),
    })
}

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "crime-api",
        version: env!("CARGO_PKG_VERSION"),
        records: state.dataset.len(),
    })
}

/// List offenses with filtering, sorting and pagination
pub async fn list_crimes(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<ResultPage> {
    let params = params_from_pairs(pairs);
    tracing::debug!("Listing crimes with {:?}", params);

    let page = query(&state.dataset, &params);

    tracing::debug!(
        "Returning {} of {} records (page {}/{})",
        page.data.len(),
        page.meta.total,
        page.meta.page,
        page.meta.total_pages
    );

    Json(page)
}

/// Get a single offense by id
pub async fn get_crime(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RecordResponse>, ApiError> {
    let record = parse_record_id(&id)
        .and_then(|id| state.dataset.get(id))
        .ok_or(ApiError::NotFound)?;

    Ok(Json(RecordResponse {
        data: record.clone(),
    }))
}
