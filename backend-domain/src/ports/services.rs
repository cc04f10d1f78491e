use async_trait::async_trait;

use crate::entities::RuntimeConfig;

/// One late departure, as handed to the alert webhook.
#[derive(Debug, Clone)]
pub struct LateExitAlert {
    pub truck_number: String,
    pub transporter: String,
    pub duration_text: String,
    pub exited_at: i64,
}

#[async_trait]
pub trait AlertService: Send + Sync {
    /// Fire-and-forget; delivery failures are logged, never surfaced to the
    /// triggering request.
    fn spawn_alerts(&self, config: RuntimeConfig, alerts: Vec<LateExitAlert>);
    async fn check_alert_target(&self, config: &RuntimeConfig) -> anyhow::Result<()>;
}
