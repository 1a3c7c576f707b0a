//! Request handlers for `/api/corporations`

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::ApiError;
use crate::models::Corporation;
use crate::service::HEALTH_MESSAGE;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Free text, may be absent or blank
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// GET /api/corporations/search?q=
pub async fn search_corporations(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Corporation>>, ApiError> {
    let corporations = state.service.search_by_name(query.q.as_deref()).await?;
    Ok(Json(corporations))
}

/// GET /api/corporations/:corp_code
pub async fn get_corporation(
    State(state): State<AppState>,
    Path(corp_code): Path<String>,
) -> Result<Json<Corporation>, ApiError> {
    state
        .service
        .get_by_code(&corp_code)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Corporation not found: {corp_code}")))
}

/// GET /api/corporations/stock/:stock_code
pub async fn get_by_stock_code(
    State(state): State<AppState>,
    Path(stock_code): Path<String>,
) -> Result<Json<Vec<Corporation>>, ApiError> {
    let corporations = state.service.search_by_stock_code(&stock_code).await?;
    Ok(Json(corporations))
}

/// GET /api/corporations/count
pub async fn count_corporations(State(state): State<AppState>) -> Result<Json<i64>, ApiError> {
    Ok(Json(state.service.count().await?))
}

/// GET /api/corporations/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HEALTH_MESSAGE.to_string(),
    })
}
