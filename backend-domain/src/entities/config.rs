// Runtime configuration entities
// Built by the infrastructure config loader and carried in AppState

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub gate_token_secret: Option<String>,
    pub gate_admin_ids: Vec<String>,
    pub gate_operator_ids: Vec<String>,
    pub report_dir: String,
    pub public_base_url: String,
    pub webhook_url: Option<String>,
    pub webhook_template: Option<String>,
    pub alert_webhook_url: Option<String>,
    pub alert_webhook_template: Option<String>,
    pub godowns_path: String,
    /// Metric tonnes per bag; the fixed linear conversion for display mass.
    pub mass_per_bag: f64,
    /// Cap on each event log fetched for aggregation.
    pub summary_fetch_limit: usize,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub report_hour: u32,
    pub report_minute: u32,
}

#[derive(Debug, Clone, Default)]
pub struct DbConfig {
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
}
