use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{DbConfig, RuntimeConfig};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub gate_token_secret: Option<String>,
    pub gate_admin_ids: Vec<String>,
    pub gate_operator_ids: Vec<String>,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
    pub report_dir: String,
    pub public_base_url: String,
    pub webhook_url: Option<String>,
    pub webhook_template: Option<String>,
    pub alert_webhook_url: Option<String>,
    pub alert_webhook_template: Option<String>,
    pub godowns_path: String,
    pub mass_per_bag: f64,
    pub summary_fetch_limit: usize,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub report_hour: u32,
    pub report_minute: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3410".to_string(),
            api_token: None,
            gate_token_secret: None,
            gate_admin_ids: Vec::new(),
            gate_operator_ids: Vec::new(),
            clickhouse_url: "http://127.0.0.1:8123".to_string(),
            clickhouse_database: "yardgate".to_string(),
            clickhouse_user: None,
            clickhouse_password: None,
            report_dir: "./reports".to_string(),
            public_base_url: "http://127.0.0.1:3410".to_string(),
            webhook_url: None,
            webhook_template: None,
            alert_webhook_url: None,
            alert_webhook_template: None,
            godowns_path: "./godowns.yaml".to_string(),
            mass_per_bag: 0.05,
            summary_fetch_limit: 5000,
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
            report_hour: 0,
            report_minute: 5,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("YARDGATE_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        if !file_path.exists() {
            warn!("config.toml not found, using defaults");
            let mut config = AppConfig::default();
            config.apply_env_overrides();
            config.resolve_paths(base_dir);
            config.normalize();
            config.validate()?;
            return Ok(config);
        }
        let content = fs::read_to_string(file_path).await?;
        let mut config: AppConfig = toml::from_str(&content)?;
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        if let Some(api_token) = &self.api_token {
            if api_token.trim().is_empty() {
                self.api_token = None;
            }
        }
        if let Some(secret) = &self.gate_token_secret {
            if secret.trim().is_empty() {
                self.gate_token_secret = None;
            }
        }
        if let Some(user) = &self.clickhouse_user {
            if user.trim().is_empty() {
                self.clickhouse_user = None;
            }
        }
        if let Some(password) = &self.clickhouse_password {
            if password.trim().is_empty() {
                self.clickhouse_password = None;
            }
        }
        if let Some(webhook_url) = &self.webhook_url {
            if webhook_url.trim().is_empty() {
                self.webhook_url = None;
            }
        }
        if let Some(template) = &self.webhook_template {
            if template.trim().is_empty() {
                self.webhook_template = None;
            }
        }
        if let Some(alert_url) = &self.alert_webhook_url {
            if alert_url.trim().is_empty() {
                self.alert_webhook_url = None;
            }
        }
        if let Some(template) = &self.alert_webhook_template {
            if template.trim().is_empty() {
                self.alert_webhook_template = None;
            }
        }
        self.gate_admin_ids = normalize_id_list(std::mem::take(&mut self.gate_admin_ids));
        self.gate_operator_ids = normalize_id_list(std::mem::take(&mut self.gate_operator_ids));
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.report_dir = resolve_path(base, &self.report_dir);
        self.godowns_path = resolve_path(base, &self.godowns_path);
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.public_base_url.trim().is_empty() {
            return Err(anyhow!("public_base_url must not be empty"));
        }
        if !(self.mass_per_bag.is_finite() && self.mass_per_bag > 0.0) {
            return Err(anyhow!("mass_per_bag must be a positive number"));
        }
        if self.summary_fetch_limit == 0 {
            return Err(anyhow!("summary_fetch_limit must be greater than 0"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.report_hour > 23 || self.report_minute > 59 {
            return Err(anyhow!("report_hour or report_minute out of range"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            gate_token_secret: self.gate_token_secret.clone(),
            gate_admin_ids: self.gate_admin_ids.clone(),
            gate_operator_ids: self.gate_operator_ids.clone(),
            report_dir: self.report_dir.clone(),
            public_base_url: self.public_base_url.clone(),
            webhook_url: self.webhook_url.clone(),
            webhook_template: self.webhook_template.clone(),
            alert_webhook_url: self.alert_webhook_url.clone(),
            alert_webhook_template: self.alert_webhook_template.clone(),
            godowns_path: self.godowns_path.clone(),
            mass_per_bag: self.mass_per_bag,
            summary_fetch_limit: self.summary_fetch_limit,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
            report_hour: self.report_hour,
            report_minute: self.report_minute,
        }
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            clickhouse_url: self.clickhouse_url.clone(),
            clickhouse_database: self.clickhouse_database.clone(),
            clickhouse_user: self.clickhouse_user.clone(),
            clickhouse_password: self.clickhouse_password.clone(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("YARDGATE_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("YARDGATE_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("YARDGATE_GATE_TOKEN_SECRET") {
            self.gate_token_secret = Some(value);
        }
        if let Ok(value) = env::var("YARDGATE_GATE_ADMIN_IDS") {
            self.gate_admin_ids = parse_env_id_list(&value);
        }
        if let Ok(value) = env::var("YARDGATE_GATE_OPERATOR_IDS") {
            self.gate_operator_ids = parse_env_id_list(&value);
        }
        if let Ok(value) = env::var("YARDGATE_CLICKHOUSE_URL") {
            self.clickhouse_url = value;
        }
        if let Ok(value) = env::var("YARDGATE_CLICKHOUSE_DATABASE") {
            self.clickhouse_database = value;
        }
        if let Ok(value) = env::var("YARDGATE_CLICKHOUSE_USER") {
            self.clickhouse_user = Some(value);
        }
        if let Ok(value) = env::var("YARDGATE_CLICKHOUSE_PASSWORD") {
            self.clickhouse_password = Some(value);
        }
        if let Ok(value) = env::var("YARDGATE_REPORT_DIR") {
            self.report_dir = value;
        }
        if let Ok(value) = env::var("YARDGATE_PUBLIC_BASE_URL") {
            self.public_base_url = value;
        }
        if let Ok(value) = env::var("YARDGATE_WEBHOOK_URL") {
            self.webhook_url = Some(value);
        }
        if let Ok(value) = env::var("YARDGATE_ALERT_WEBHOOK_URL") {
            self.alert_webhook_url = Some(value);
        }
        if let Ok(value) = env::var("YARDGATE_GODOWNS_PATH") {
            self.godowns_path = value;
        }
        if let Ok(value) = env::var("YARDGATE_MASS_PER_BAG") {
            if let Ok(parsed) = value.parse() {
                self.mass_per_bag = parsed;
            }
        }
        if let Ok(value) = env::var("YARDGATE_SUMMARY_FETCH_LIMIT") {
            if let Ok(parsed) = value.parse() {
                self.summary_fetch_limit = parsed;
            }
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let path = Path::new(value);
    if path.is_absolute() {
        return value.to_string();
    }
    base.join(path).to_string_lossy().to_string()
}

fn normalize_id_list(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = values
        .into_iter()
        .filter_map(|value| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect();
    out.sort();
    out.dedup();
    out
}

fn parse_env_id_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        AppConfig::default().validate().expect("defaults valid");
    }

    #[test]
    fn validation_rejects_bad_bind_addr_and_factors() {
        let mut config = AppConfig::default();
        config.bind_addr = "not-an-addr".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.mass_per_bag = 0.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.summary_fetch_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn normalize_drops_blank_secrets_and_ids() {
        let mut config = AppConfig::default();
        config.api_token = Some("   ".to_string());
        config.gate_token_secret = Some("".to_string());
        config.gate_admin_ids = vec![" a ".to_string(), String::new(), "a".to_string()];
        config.normalize();
        assert!(config.api_token.is_none());
        assert!(config.gate_token_secret.is_none());
        assert_eq!(config.gate_admin_ids, vec!["a".to_string()]);
    }
}
