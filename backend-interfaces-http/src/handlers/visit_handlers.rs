use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use backend_application::commands::visit_commands;
use backend_application::queries::visit_queries;
use backend_application::AppState;
use backend_domain::{
    CheckInRequest, ManualExitRequest, VisitQuery, VisitReportQuery, VisitUpdateRequest,
    VisitView,
};

use crate::error::HttpError;
use crate::middleware::{authorize, authorize_admin};

pub async fn check_in(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CheckInRequest>,
) -> Result<(StatusCode, Json<VisitView>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let visit = visit_commands::check_in(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(visit_queries::view_of(visit))))
}

pub async fn list_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<VisitQuery>,
) -> Result<Json<Vec<VisitView>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let results = visit_queries::list_dashboard(&state, query).await?;
    Ok(Json(results))
}

pub async fn mark_exit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<VisitView>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let visit = visit_commands::mark_exit(&state, &id).await?;
    Ok(Json(visit_queries::view_of(visit)))
}

pub async fn set_manual_exit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<ManualExitRequest>,
) -> Result<Json<VisitView>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let visit = visit_commands::set_manual_exit(&state, &id, payload).await?;
    Ok(Json(visit_queries::view_of(visit)))
}

pub async fn admin_list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<VisitQuery>,
) -> Result<Json<Vec<VisitView>>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let results = visit_queries::list_admin(&state, query).await?;
    Ok(Json(results))
}

pub async fn admin_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<VisitUpdateRequest>,
) -> Result<Json<VisitView>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let visit = visit_commands::admin_update(&state, &id, payload).await?;
    Ok(Json(visit_queries::view_of(visit)))
}

pub async fn report_rows(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<VisitReportQuery>,
) -> Result<Json<Vec<VisitView>>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let results = visit_queries::report_rows(&state, query).await?;
    Ok(Json(results))
}
