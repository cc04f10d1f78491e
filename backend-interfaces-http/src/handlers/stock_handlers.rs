use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use backend_application::commands::stock_commands;
use backend_application::queries::stock_queries;
use backend_application::AppState;
use backend_domain::{
    AdjustmentRequest, EntryLogQuery, GodownEntry, GodownRegistryPayload, KajliEntry,
    KajliEntryRequest, StockAdjustment, StockSummary,
};

use crate::error::HttpError;
use crate::middleware::{authorize, authorize_admin};

pub async fn create_entry(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<KajliEntryRequest>,
) -> Result<(StatusCode, Json<KajliEntry>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let entry = stock_commands::record_entry(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn entry_log(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<EntryLogQuery>,
) -> Result<Json<Vec<KajliEntry>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let entries = stock_queries::entry_log(&state, query).await?;
    Ok(Json(entries))
}

pub async fn stock_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StockSummary>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let summary = stock_queries::stock_summary(&state).await?;
    Ok(Json(summary))
}

pub async fn submit_adjustment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<AdjustmentRequest>,
) -> Result<(StatusCode, Json<StockAdjustment>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let adjustment = stock_commands::submit_adjustment(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(adjustment)))
}

pub async fn list_godowns(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<GodownEntry>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let godowns = state.godowns.read().await.clone();
    Ok(Json(godowns))
}

pub async fn update_godowns(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<GodownRegistryPayload>,
) -> Result<StatusCode, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    stock_commands::update_godown_registry(&state, payload.godowns).await?;
    Ok(StatusCode::NO_CONTENT)
}
