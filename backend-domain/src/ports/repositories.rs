use async_trait::async_trait;

use crate::entities::{AdjustmentRow, GodownEntry, KajliEntryRow, VisitRow};

#[async_trait]
pub trait VisitRepository: Send + Sync {
    async fn ensure_schema(&self) -> anyhow::Result<()>;
    /// Appends a version row; the latest `updated_at` per id wins on read.
    async fn insert_visit(&self, visit: &VisitRow) -> anyhow::Result<()>;
    async fn fetch_visit(&self, id: &str) -> anyhow::Result<Option<VisitRow>>;
    async fn fetch_visits(
        &self,
        search: Option<&str>,
        limit: usize,
    ) -> anyhow::Result<Vec<VisitRow>>;
    async fn fetch_visits_between(
        &self,
        start_ms: i64,
        end_ms: i64,
        limit: usize,
    ) -> anyhow::Result<Vec<VisitRow>>;
    async fn ping(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait StockRepository: Send + Sync {
    async fn insert_entry(&self, entry: &KajliEntryRow) -> anyhow::Result<()>;
    async fn fetch_entries(&self, limit: usize) -> anyhow::Result<Vec<KajliEntryRow>>;
    async fn fetch_entries_between(
        &self,
        start_ms: i64,
        end_ms: i64,
        limit: usize,
    ) -> anyhow::Result<Vec<KajliEntryRow>>;
    async fn insert_adjustment(&self, adjustment: &AdjustmentRow) -> anyhow::Result<()>;
    async fn fetch_adjustments(&self, limit: usize) -> anyhow::Result<Vec<AdjustmentRow>>;
}

#[async_trait]
pub trait RegistryRepository: Send + Sync {
    async fn load_godowns(&self, path: &str) -> anyhow::Result<Vec<GodownEntry>>;
    async fn save_godowns(&self, path: &str, godowns: &[GodownEntry]) -> anyhow::Result<()>;
}
