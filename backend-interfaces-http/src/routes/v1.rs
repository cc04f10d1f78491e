use axum::Router;

use backend_application::AppState;

use crate::handlers::{ops_handlers, stock_handlers, visit_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/visits",
            axum::routing::post(visit_handlers::check_in).get(visit_handlers::list_dashboard),
        )
        .route(
            "/v1/visits/:id/exit",
            axum::routing::post(visit_handlers::mark_exit),
        )
        .route(
            "/v1/visits/:id/exit-time",
            axum::routing::put(visit_handlers::set_manual_exit),
        )
        .route(
            "/v1/admin/visits",
            axum::routing::get(visit_handlers::admin_list),
        )
        .route(
            "/v1/admin/visits/report",
            axum::routing::get(visit_handlers::report_rows),
        )
        .route(
            "/v1/admin/visits/:id",
            axum::routing::put(visit_handlers::admin_update),
        )
        .route(
            "/v1/kajli/entries",
            axum::routing::post(stock_handlers::create_entry).get(stock_handlers::entry_log),
        )
        .route(
            "/v1/kajli/stock-summary",
            axum::routing::get(stock_handlers::stock_summary),
        )
        .route(
            "/v1/kajli/adjustments",
            axum::routing::post(stock_handlers::submit_adjustment),
        )
        .route(
            "/v1/kajli/godowns",
            axum::routing::get(stock_handlers::list_godowns).put(stock_handlers::update_godowns),
        )
        .route(
            "/v1/ops/gate-token",
            axum::routing::post(ops_handlers::issue_gate_token),
        )
        .route(
            "/v1/ops/alert-target/check",
            axum::routing::get(ops_handlers::alert_target_check),
        )
        .route(
            "/v1/ops/health/live",
            axum::routing::get(ops_handlers::health_live),
        )
        .route(
            "/v1/ops/health/ready",
            axum::routing::get(ops_handlers::health_ready),
        )
        .route(
            "/v1/ops/metrics/prometheus",
            axum::routing::get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
