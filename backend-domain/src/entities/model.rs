// Storage row models
// ClickHouse row shapes for the three tables, with conversions to the domain
// entities. Timestamps travel as DateTime64(3).

use clickhouse::Row;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::entities::{KajliEntry, StockAdjustment, TruckVisit};
use crate::utils::millis_to_utc;
use crate::value_objects::{CargoType, VisitStatus};

/// Visit rows live in a ReplacingMergeTree keyed by `id` and versioned by
/// `updated_at`: every mutation appends a fresh row and reads take the latest.
#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct VisitRow {
    pub id: String,
    pub truck_number: String,
    pub transporter: String,
    pub paper_ok: Option<bool>,
    pub driver_ok: Option<bool>,
    pub tarpaulin_ok: Option<bool>,
    pub remarks: String,
    pub status: String,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub entered_at: OffsetDateTime,
    #[serde(with = "clickhouse::serde::time::datetime64::millis::option")]
    pub exited_at: Option<OffsetDateTime>,
    #[serde(with = "clickhouse::serde::time::datetime64::millis::option")]
    pub manual_exit_at: Option<OffsetDateTime>,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct KajliEntryRow {
    pub id: String,
    pub truck_number: String,
    pub godown_number: u32,
    pub cargo_type: String,
    pub bag_count: u32,
    pub loading_status: String,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub entered_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct AdjustmentRow {
    pub id: String,
    pub godown_number: u32,
    pub cargo_type: String,
    pub bag_delta: i64,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub created_at: OffsetDateTime,
}

fn to_millis(value: OffsetDateTime) -> i64 {
    (value.unix_timestamp_nanos() / 1_000_000) as i64
}

impl VisitRow {
    pub fn from_visit(visit: &TruckVisit) -> Self {
        Self {
            id: visit.id.clone(),
            truck_number: visit.truck_number.clone(),
            transporter: visit.transporter.clone(),
            paper_ok: visit.paper_ok,
            driver_ok: visit.driver_ok,
            tarpaulin_ok: visit.tarpaulin_ok,
            remarks: visit.remarks.clone(),
            status: visit.status.as_str().to_string(),
            entered_at: millis_to_utc(visit.entered_at),
            exited_at: visit.exited_at.map(millis_to_utc),
            manual_exit_at: visit.manual_exit_at.map(millis_to_utc),
            updated_at: millis_to_utc(visit.updated_at),
        }
    }

    pub fn into_visit(self) -> TruckVisit {
        TruckVisit {
            id: self.id,
            truck_number: self.truck_number,
            transporter: self.transporter,
            paper_ok: self.paper_ok,
            driver_ok: self.driver_ok,
            tarpaulin_ok: self.tarpaulin_ok,
            remarks: self.remarks,
            status: VisitStatus::from(self.status.as_str()),
            entered_at: to_millis(self.entered_at),
            exited_at: self.exited_at.map(to_millis),
            manual_exit_at: self.manual_exit_at.map(to_millis),
            updated_at: to_millis(self.updated_at),
        }
    }
}

impl KajliEntryRow {
    pub fn from_entry(entry: &KajliEntry) -> Self {
        Self {
            id: entry.id.clone(),
            truck_number: entry.truck_number.clone(),
            godown_number: entry.godown_number,
            cargo_type: entry.cargo_type.as_str().to_string(),
            bag_count: entry.bag_count,
            loading_status: entry.loading_status.as_str().to_string(),
            entered_at: millis_to_utc(entry.entered_at),
        }
    }

    /// Returns `None` when the stored cargo tag no longer matches the closed
    /// category set; such rows drop out of aggregation.
    pub fn into_entry(self) -> Option<KajliEntry> {
        let cargo_type = CargoType::parse(&self.cargo_type)?;
        Some(KajliEntry {
            id: self.id,
            truck_number: self.truck_number,
            godown_number: self.godown_number,
            cargo_type,
            bag_count: self.bag_count,
            loading_status: VisitStatus::from(self.loading_status.as_str()),
            entered_at: to_millis(self.entered_at),
        })
    }
}

impl AdjustmentRow {
    pub fn from_adjustment(adjustment: &StockAdjustment) -> Self {
        Self {
            id: adjustment.id.clone(),
            godown_number: adjustment.godown_number,
            cargo_type: adjustment.cargo_type.as_str().to_string(),
            bag_delta: adjustment.bag_delta,
            created_at: millis_to_utc(adjustment.created_at),
        }
    }

    /// Returns `None` when the stored cargo tag no longer matches the closed
    /// category set; such rows drop out of aggregation.
    pub fn into_adjustment(self) -> Option<StockAdjustment> {
        let cargo_type = CargoType::parse(&self.cargo_type)?;
        Some(StockAdjustment {
            id: self.id,
            godown_number: self.godown_number,
            cargo_type,
            bag_delta: self.bag_delta,
            created_at: to_millis(self.created_at),
        })
    }
}
