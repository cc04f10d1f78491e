use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use tokio::time::{timeout, Duration};
use tracing::error;

use backend_application::commands::gate_token_commands;
use backend_application::AppState;
use backend_domain::{GateTokenRequest, GateTokenResponse};

use crate::error::HttpError;
use crate::middleware::authorize_admin;

#[derive(serde::Serialize)]
pub struct HealthStatus {
    status: String,
}

#[derive(serde::Serialize)]
struct AlertStatus {
    status: String,
}

pub async fn issue_gate_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<GateTokenRequest>,
) -> Result<Json<GateTokenResponse>, HttpError> {
    if !authorize_admin(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let response = gate_token_commands::issue_gate_token(&state, payload).await?;
    Ok(Json(response))
}

pub async fn alert_target_check(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !authorize_admin(&state.config, &headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(AlertStatus {
                status: "unauthorized".to_string(),
            }),
        )
            .into_response();
    }

    let timeout_secs = state.config.request_timeout_seconds.max(1);
    match timeout(
        Duration::from_secs(timeout_secs),
        state.alert_service.check_alert_target(&state.config),
    )
    .await
    {
        Ok(Ok(_)) => (
            StatusCode::OK,
            Json(AlertStatus {
                status: "ok".to_string(),
            }),
        )
            .into_response(),
        Ok(Err(err)) => {
            error!("alert target check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(AlertStatus {
                    status: "error".to_string(),
                }),
            )
                .into_response()
        }
        Err(_) => {
            error!("alert target check timeout after {}s", timeout_secs);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(AlertStatus {
                    status: "timeout".to_string(),
                }),
            )
                .into_response()
        }
    }
}

pub async fn health_live() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
    })
}

pub async fn health_ready(State(state): State<AppState>) -> impl IntoResponse {
    match state.visit_repo.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthStatus {
                status: "ok".to_string(),
            }),
        )
            .into_response(),
        Err(err) => {
            error!("readiness check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus {
                    status: "unavailable".to_string(),
                }),
            )
                .into_response()
        }
    }
}

pub async fn metrics_prometheus(State(state): State<AppState>) -> String {
    state.metrics.render_prometheus()
}
