use async_trait::async_trait;
use clickhouse::Client;

use backend_domain::ports::{StockRepository, VisitRepository};
use backend_domain::{AdjustmentRow, KajliEntryRow, VisitRow};

/// ClickHouse adapter for the visit table and the two stock event logs.
///
/// `truck_visits` is a ReplacingMergeTree versioned by `updated_at`: edits
/// append a fresh row and reads collapse to the latest via FINAL. The stock
/// logs are plain append-only MergeTrees.
pub struct ClickhouseRepo {
    client: Client,
    database: String,
}

impl ClickhouseRepo {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    fn table(&self, name: &str) -> String {
        format!("{}.{}", self.database, name)
    }
}

#[async_trait]
impl VisitRepository for ClickhouseRepo {
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        self.client
            .query(&format!("CREATE DATABASE IF NOT EXISTS {}", self.database))
            .execute()
            .await?;

        self.client
            .query(&format!(
                "CREATE TABLE IF NOT EXISTS {} (\
                    id String,\
                    truck_number String,\
                    transporter String,\
                    paper_ok Nullable(Bool),\
                    driver_ok Nullable(Bool),\
                    tarpaulin_ok Nullable(Bool),\
                    remarks String,\
                    status String,\
                    entered_at DateTime64(3),\
                    exited_at Nullable(DateTime64(3)),\
                    manual_exit_at Nullable(DateTime64(3)),\
                    updated_at DateTime64(3)\
                ) ENGINE = ReplacingMergeTree(updated_at) ORDER BY id",
                self.table("truck_visits")
            ))
            .execute()
            .await?;

        self.client
            .query(&format!(
                "CREATE TABLE IF NOT EXISTS {} (\
                    id String,\
                    truck_number String,\
                    godown_number UInt32,\
                    cargo_type String,\
                    bag_count UInt32,\
                    loading_status String,\
                    entered_at DateTime64(3)\
                ) ENGINE = MergeTree ORDER BY (entered_at, id)",
                self.table("kajli_entries")
            ))
            .execute()
            .await?;

        self.client
            .query(&format!(
                "CREATE TABLE IF NOT EXISTS {} (\
                    id String,\
                    godown_number UInt32,\
                    cargo_type String,\
                    bag_delta Int64,\
                    created_at DateTime64(3)\
                ) ENGINE = MergeTree ORDER BY (created_at, id)",
                self.table("stock_adjustments")
            ))
            .execute()
            .await?;

        Ok(())
    }

    async fn insert_visit(&self, visit: &VisitRow) -> anyhow::Result<()> {
        let mut insert = self.client.insert(&self.table("truck_visits"))?;
        insert.write(visit).await?;
        insert.end().await?;
        Ok(())
    }

    async fn fetch_visit(&self, id: &str) -> anyhow::Result<Option<VisitRow>> {
        let rows = self
            .client
            .query(&format!(
                "SELECT ?fields FROM {} FINAL WHERE id = ? LIMIT 1",
                self.table("truck_visits")
            ))
            .bind(id)
            .fetch_all::<VisitRow>()
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn fetch_visits(
        &self,
        search: Option<&str>,
        limit: usize,
    ) -> anyhow::Result<Vec<VisitRow>> {
        let rows = match search {
            Some(term) => {
                self.client
                    .query(&format!(
                        "SELECT ?fields FROM {} FINAL \
                         WHERE truck_number LIKE ? \
                         ORDER BY entered_at DESC LIMIT ?",
                        self.table("truck_visits")
                    ))
                    .bind(format!("%{}%", term))
                    .bind(limit as u64)
                    .fetch_all::<VisitRow>()
                    .await?
            }
            None => {
                self.client
                    .query(&format!(
                        "SELECT ?fields FROM {} FINAL \
                         ORDER BY entered_at DESC LIMIT ?",
                        self.table("truck_visits")
                    ))
                    .bind(limit as u64)
                    .fetch_all::<VisitRow>()
                    .await?
            }
        };
        Ok(rows)
    }

    async fn fetch_visits_between(
        &self,
        start_ms: i64,
        end_ms: i64,
        limit: usize,
    ) -> anyhow::Result<Vec<VisitRow>> {
        let rows = self
            .client
            .query(&format!(
                "SELECT ?fields FROM {} FINAL \
                 WHERE entered_at >= fromUnixTimestamp64Milli(?) \
                   AND entered_at <= fromUnixTimestamp64Milli(?) \
                 ORDER BY entered_at DESC LIMIT ?",
                self.table("truck_visits")
            ))
            .bind(start_ms)
            .bind(end_ms)
            .bind(limit as u64)
            .fetch_all::<VisitRow>()
            .await?;
        Ok(rows)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.client.query("SELECT 1").execute().await?;
        Ok(())
    }
}

#[async_trait]
impl StockRepository for ClickhouseRepo {
    async fn insert_entry(&self, entry: &KajliEntryRow) -> anyhow::Result<()> {
        let mut insert = self.client.insert(&self.table("kajli_entries"))?;
        insert.write(entry).await?;
        insert.end().await?;
        Ok(())
    }

    async fn fetch_entries(&self, limit: usize) -> anyhow::Result<Vec<KajliEntryRow>> {
        let rows = self
            .client
            .query(&format!(
                "SELECT ?fields FROM {} ORDER BY entered_at DESC LIMIT ?",
                self.table("kajli_entries")
            ))
            .bind(limit as u64)
            .fetch_all::<KajliEntryRow>()
            .await?;
        Ok(rows)
    }

    async fn fetch_entries_between(
        &self,
        start_ms: i64,
        end_ms: i64,
        limit: usize,
    ) -> anyhow::Result<Vec<KajliEntryRow>> {
        let rows = self
            .client
            .query(&format!(
                "SELECT ?fields FROM {} \
                 WHERE entered_at >= fromUnixTimestamp64Milli(?) \
                   AND entered_at <= fromUnixTimestamp64Milli(?) \
                 ORDER BY entered_at DESC LIMIT ?",
                self.table("kajli_entries")
            ))
            .bind(start_ms)
            .bind(end_ms)
            .bind(limit as u64)
            .fetch_all::<KajliEntryRow>()
            .await?;
        Ok(rows)
    }

    async fn insert_adjustment(&self, adjustment: &AdjustmentRow) -> anyhow::Result<()> {
        let mut insert = self.client.insert(&self.table("stock_adjustments"))?;
        insert.write(adjustment).await?;
        insert.end().await?;
        Ok(())
    }

    async fn fetch_adjustments(&self, limit: usize) -> anyhow::Result<Vec<AdjustmentRow>> {
        let rows = self
            .client
            .query(&format!(
                "SELECT ?fields FROM {} ORDER BY created_at DESC LIMIT ?",
                self.table("stock_adjustments")
            ))
            .bind(limit as u64)
            .fetch_all::<AdjustmentRow>()
            .await?;
        Ok(rows)
    }
}
