use std::sync::Arc;

use anyhow::Result;
use clickhouse::Client;
use tokio::sync::RwLock;
use tracing::warn;

use backend_application::{AppState, Metrics};
use backend_domain::{RegistryRepository, VisitRepository};
use backend_infrastructure::{
    AppConfig, ClickhouseRepo, DefaultAlertService, GodownFileRepository,
};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        let runtime_config = config.to_runtime_config();
        let db_config = config.to_db_config();

        let mut clickhouse = Client::default()
            .with_url(&db_config.clickhouse_url)
            .with_database(&db_config.clickhouse_database);
        if let Some(user) = &db_config.clickhouse_user {
            clickhouse = clickhouse.with_user(user);
        }
        if let Some(password) = &db_config.clickhouse_password {
            clickhouse = clickhouse.with_password(password);
        }

        let repo = Arc::new(ClickhouseRepo::new(
            clickhouse,
            db_config.clickhouse_database.clone(),
        ));
        repo.ensure_schema().await?;

        let registry_repo = Arc::new(GodownFileRepository::new());
        let godowns = registry_repo
            .load_godowns(&runtime_config.godowns_path)
            .await
            .unwrap_or_else(|err| {
                warn!("failed to load godown registry: {}", err);
                Vec::new()
            });
        if godowns.is_empty() {
            warn!(
                "godown registry '{}' is empty; stock summary will have no rows",
                runtime_config.godowns_path
            );
        }

        let state = AppState {
            config: runtime_config,
            visit_repo: repo.clone(),
            stock_repo: repo,
            registry_repo,
            alert_service: Arc::new(DefaultAlertService::new()),
            godowns: Arc::new(RwLock::new(godowns)),
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state })
    }
}
