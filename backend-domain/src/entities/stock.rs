// Kajli stock entities
// Two append-only event logs feed the godown balances: truck entries and
// manual adjustments

use serde::{Deserialize, Serialize};

use crate::value_objects::{CargoType, VisitStatus};

/// A truck unloading into a godown. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KajliEntry {
    pub id: String,
    pub truck_number: String,
    pub godown_number: u32,
    pub cargo_type: CargoType,
    pub bag_count: u32,
    pub loading_status: VisitStatus,
    pub entered_at: i64,
}

/// A manual signed correction to one godown/cargo balance. Immutable once
/// recorded; positive adds stock, negative removes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub id: String,
    pub godown_number: u32,
    pub cargo_type: CargoType,
    pub bag_delta: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KajliEntryRequest {
    pub truck_number: String,
    pub godown_number: u32,
    pub cargo_type: String,
    /// Missing or malformed counts coerce to zero rather than failing the entry.
    pub bag_count: Option<u32>,
    pub loading_status: Option<VisitStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdjustmentRequest {
    pub godown_number: u32,
    pub cargo_type: String,
    pub bag_delta: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryLogQuery {
    /// Local calendar day, `YYYY-MM-DD`; defaults to today.
    pub date: Option<String>,
    pub limit: Option<usize>,
}

/// Bags plus the derived display mass for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CargoBalance {
    pub bags: i64,
    pub mt: f64,
}

/// One registry godown's balances across the cargo categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GodownStockRow {
    pub godown_number: u32,
    pub lsa: CargoBalance,
    pub dsa: CargoBalance,
    pub rbc: CargoBalance,
    pub total: CargoBalance,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockGrandTotal {
    pub lsa: CargoBalance,
    pub dsa: CargoBalance,
    pub rbc: CargoBalance,
    pub total: CargoBalance,
}

/// Derived, never persisted; recomputed in full from both logs on every query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockSummary {
    pub rows: Vec<GodownStockRow>,
    pub grand_total: StockGrandTotal,
}
