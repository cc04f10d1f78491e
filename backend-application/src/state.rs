use std::sync::Arc;

use backend_domain::ports::{
    AlertService, RegistryRepository, StockRepository, VisitRepository,
};
use backend_domain::{GodownEntry, RuntimeConfig};
use tokio::sync::RwLock;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub visit_repo: Arc<dyn VisitRepository>,
    pub stock_repo: Arc<dyn StockRepository>,
    pub registry_repo: Arc<dyn RegistryRepository>,
    pub alert_service: Arc<dyn AlertService>,
    pub godowns: Arc<RwLock<Vec<GodownEntry>>>,
    pub metrics: Arc<Metrics>,
}
