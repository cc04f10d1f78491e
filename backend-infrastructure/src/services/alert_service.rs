use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

use backend_domain::ports::AlertService;
use backend_domain::{millis_to_rfc3339, LateExitAlert, RuntimeConfig};

#[derive(Default)]
pub struct DefaultAlertService;

impl DefaultAlertService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AlertService for DefaultAlertService {
    fn spawn_alerts(&self, config: RuntimeConfig, alerts: Vec<LateExitAlert>) {
        if alerts.is_empty() || config.alert_webhook_url.is_none() {
            return;
        }
        tokio::spawn(async move {
            if let Err(err) = send_alerts(&config, &alerts).await {
                warn!("alert webhook failed: {}", err);
            }
        });
    }

    async fn check_alert_target(&self, config: &RuntimeConfig) -> Result<()> {
        check_alert_target(config).await
    }
}

pub async fn check_alert_target(config: &RuntimeConfig) -> Result<()> {
    let url = resolve_alert_url(config)?;
    let client = Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_seconds.max(3)))
        .build()?;
    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        anyhow::bail!("alert webhook responded {}", response.status());
    }
    Ok(())
}

async fn send_alerts(config: &RuntimeConfig, alerts: &[LateExitAlert]) -> Result<()> {
    let url = resolve_alert_url(config)?;
    let template = config
        .alert_webhook_template
        .as_deref()
        .unwrap_or(r#"{"message":"Late exit alert, {total} vehicle(s)\n{lines}"}"#);

    let payload = build_payload(alerts, template);
    let client = Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_seconds.max(3)))
        .build()?;

    client
        .post(&url)
        .header("Content-Type", "application/json")
        .body(payload)
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

fn resolve_alert_url(config: &RuntimeConfig) -> Result<String> {
    config
        .alert_webhook_url
        .clone()
        .or_else(|| config.webhook_url.clone())
        .ok_or_else(|| anyhow::anyhow!("no alert webhook configured"))
}

fn build_payload(alerts: &[LateExitAlert], template: &str) -> String {
    let lines = build_lines(alerts);
    template
        .replace("{total}", &alerts.len().to_string())
        .replace("{lines}", &escape_json(&lines))
}

fn build_lines(alerts: &[LateExitAlert]) -> String {
    alerts
        .iter()
        .map(|alert| {
            format!(
                "{} ({}) out at {} after {}",
                alert.truck_number,
                alert.transporter,
                millis_to_rfc3339(alert.exited_at),
                alert.duration_text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_json(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_substitutes_total_and_lines() {
        let alerts = vec![LateExitAlert {
            truck_number: "GJ01XY1234".to_string(),
            transporter: "Shree Logistics".to_string(),
            duration_text: "4h 30m".to_string(),
            exited_at: 1_700_000_000_000,
        }];
        let payload = build_payload(&alerts, r#"{"message":"{total}: {lines}"}"#);
        assert!(payload.contains("\"message\":\"1: "));
        assert!(payload.contains("GJ01XY1234"));
        assert!(payload.contains("4h 30m"));
    }
}
