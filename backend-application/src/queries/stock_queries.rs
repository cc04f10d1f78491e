use chrono::Local;
use tracing::error;

use crate::queries::visit_queries::local_day_bounds;
use crate::{AppError, AppState};
use backend_domain::services::{adjustment_delta, entry_delta, StockDelta, StockLedger};
use backend_domain::{
    godown_numbers, AdjustmentRow, EntryLogQuery, KajliEntry, KajliEntryRow, StockSummary,
};

const ENTRY_LOG_LIMIT: usize = 200;
const ENTRY_LOG_MAX: usize = 2000;

/// Current balances for every registry godown, recomputed from scratch out of
/// both event logs. The logs are fetched concurrently; if either fetch fails
/// the whole summary fails, with no partial aggregation.
pub async fn stock_summary(state: &AppState) -> Result<StockSummary, AppError> {
    let cap = state.config.summary_fetch_limit;
    let (entries, adjustments) = tokio::try_join!(
        state.stock_repo.fetch_entries(cap),
        state.stock_repo.fetch_adjustments(cap),
    )
    .map_err(|err| {
        error!("failed to fetch stock event logs: {}", err);
        state.metrics.record_store_error();
        AppError::Internal(err)
    })?;

    let godowns = state.godowns.read().await;
    let ledger = StockLedger::new(godown_numbers(&godowns), state.config.mass_per_bag);
    drop(godowns);

    let deltas = entry_deltas(entries).chain(adjustment_deltas(adjustments));
    Ok(ledger.summarize(deltas))
}

/// One local day of kajli entries, newest first.
pub async fn entry_log(
    state: &AppState,
    query: EntryLogQuery,
) -> Result<Vec<KajliEntry>, AppError> {
    let date = query
        .date
        .unwrap_or_else(|| Local::now().format("%Y-%m-%d").to_string());
    let day = backend_domain::parse_date(&date)
        .map_err(|err| AppError::BadRequest(format!("invalid date: {}", err)))?;
    let (start_ms, end_ms) = local_day_bounds(day)?;
    let limit = query.limit.unwrap_or(ENTRY_LOG_LIMIT).clamp(1, ENTRY_LOG_MAX);

    let rows = state
        .stock_repo
        .fetch_entries_between(start_ms, end_ms, limit)
        .await
        .map_err(|err| {
            error!("failed to fetch kajli entries: {}", err);
            state.metrics.record_store_error();
            AppError::Internal(err)
        })?;

    Ok(rows.into_iter().filter_map(KajliEntryRow::into_entry).collect())
}

fn entry_deltas(rows: Vec<KajliEntryRow>) -> impl Iterator<Item = StockDelta> {
    rows.into_iter()
        .filter_map(KajliEntryRow::into_entry)
        .map(|entry| entry_delta(&entry))
}

fn adjustment_deltas(rows: Vec<AdjustmentRow>) -> impl Iterator<Item = StockDelta> {
    rows.into_iter()
        .filter_map(AdjustmentRow::into_adjustment)
        .map(|adjustment| adjustment_delta(&adjustment))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::RwLock;

    use super::*;
    use crate::Metrics;
    use backend_domain::ports::{
        AlertService, RegistryRepository, StockRepository, VisitRepository,
    };
    use backend_domain::{
        millis_to_utc, AdjustmentRow, GodownEntry, KajliEntryRow, LateExitAlert, RuntimeConfig,
        VisitRow,
    };

    struct FixtureStockRepo {
        entries: Vec<KajliEntryRow>,
        adjustments: Vec<AdjustmentRow>,
        fail: bool,
    }

    #[async_trait]
    impl StockRepository for FixtureStockRepo {
        async fn insert_entry(&self, _entry: &KajliEntryRow) -> anyhow::Result<()> {
            Ok(())
        }

        async fn fetch_entries(&self, _limit: usize) -> anyhow::Result<Vec<KajliEntryRow>> {
            if self.fail {
                anyhow::bail!("store unreachable");
            }
            Ok(self.entries.clone())
        }

        async fn fetch_entries_between(
            &self,
            _start_ms: i64,
            _end_ms: i64,
            _limit: usize,
        ) -> anyhow::Result<Vec<KajliEntryRow>> {
            Ok(self.entries.clone())
        }

        async fn insert_adjustment(&self, _adjustment: &AdjustmentRow) -> anyhow::Result<()> {
            Ok(())
        }

        async fn fetch_adjustments(&self, _limit: usize) -> anyhow::Result<Vec<AdjustmentRow>> {
            Ok(self.adjustments.clone())
        }
    }

    struct NoopVisitRepo;

    #[async_trait]
    impl VisitRepository for NoopVisitRepo {
        async fn ensure_schema(&self) -> anyhow::Result<()> {
            Ok(())
        }

        async fn insert_visit(&self, _visit: &VisitRow) -> anyhow::Result<()> {
            Ok(())
        }

        async fn fetch_visit(&self, _id: &str) -> anyhow::Result<Option<VisitRow>> {
            Ok(None)
        }

        async fn fetch_visits(
            &self,
            _search: Option<&str>,
            _limit: usize,
        ) -> anyhow::Result<Vec<VisitRow>> {
            Ok(Vec::new())
        }

        async fn fetch_visits_between(
            &self,
            _start_ms: i64,
            _end_ms: i64,
            _limit: usize,
        ) -> anyhow::Result<Vec<VisitRow>> {
            Ok(Vec::new())
        }

        async fn ping(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct NoopRegistryRepo;

    #[async_trait]
    impl RegistryRepository for NoopRegistryRepo {
        async fn load_godowns(&self, _path: &str) -> anyhow::Result<Vec<GodownEntry>> {
            Ok(Vec::new())
        }

        async fn save_godowns(
            &self,
            _path: &str,
            _godowns: &[GodownEntry],
        ) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct NoopAlertService;

    #[async_trait]
    impl AlertService for NoopAlertService {
        fn spawn_alerts(&self, _config: RuntimeConfig, _alerts: Vec<LateExitAlert>) {}

        async fn check_alert_target(&self, _config: &RuntimeConfig) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn entry_row(godown: u32, cargo: &str, bags: u32) -> KajliEntryRow {
        KajliEntryRow {
            id: format!("e-{}-{}", godown, cargo),
            truck_number: "GJ01XY1234".to_string(),
            godown_number: godown,
            cargo_type: cargo.to_string(),
            bag_count: bags,
            loading_status: "IN".to_string(),
            entered_at: millis_to_utc(1_700_000_000_000),
        }
    }

    fn adjustment_row(godown: u32, cargo: &str, delta: i64) -> AdjustmentRow {
        AdjustmentRow {
            id: format!("a-{}-{}", godown, cargo),
            godown_number: godown,
            cargo_type: cargo.to_string(),
            bag_delta: delta,
            created_at: millis_to_utc(1_700_000_100_000),
        }
    }

    fn state_with(
        entries: Vec<KajliEntryRow>,
        adjustments: Vec<AdjustmentRow>,
        fail: bool,
    ) -> AppState {
        let godowns = vec![
            GodownEntry { number: 1, name: None },
            GodownEntry { number: 2, name: None },
            GodownEntry { number: 3, name: None },
        ];
        AppState {
            config: RuntimeConfig {
                mass_per_bag: 0.05,
                summary_fetch_limit: 5000,
                ..RuntimeConfig::default()
            },
            visit_repo: Arc::new(NoopVisitRepo),
            stock_repo: Arc::new(FixtureStockRepo {
                entries,
                adjustments,
                fail,
            }),
            registry_repo: Arc::new(NoopRegistryRepo),
            alert_service: Arc::new(NoopAlertService),
            godowns: Arc::new(RwLock::new(godowns)),
            metrics: Arc::new(Metrics::default()),
        }
    }

    #[tokio::test]
    async fn summary_folds_entries_and_adjustments_together() {
        let state = state_with(
            vec![entry_row(3, "LSA", 40)],
            vec![adjustment_row(3, "lsa", -10)],
            false,
        );
        let summary = stock_summary(&state).await.expect("summary");
        let row = summary
            .rows
            .iter()
            .find(|r| r.godown_number == 3)
            .expect("godown 3");
        assert_eq!(row.lsa.bags, 30);
        assert_eq!(row.lsa.mt, 1.5);
    }

    #[tokio::test]
    async fn summary_ignores_unknown_godowns_and_cargo_tags() {
        let state = state_with(
            vec![entry_row(9, "LSA", 40), entry_row(1, "WHEAT", 25)],
            vec![],
            false,
        );
        let summary = stock_summary(&state).await.expect("summary");
        assert_eq!(summary.rows.len(), 3);
        assert_eq!(summary.grand_total.total.bags, 0);
    }

    #[tokio::test]
    async fn summary_fails_whole_when_a_log_fetch_fails() {
        let state = state_with(vec![entry_row(1, "DSA", 10)], vec![], true);
        let err = stock_summary(&state).await.expect_err("must fail");
        assert!(matches!(err, AppError::Internal(_)));
    }
}
