// Truck visit entity
// One vehicle's stay at the yard, from gate check-in to departure

use serde::{Deserialize, Serialize};

use crate::value_objects::VisitStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruckVisit {
    pub id: String,
    pub truck_number: String,
    pub transporter: String,
    pub paper_ok: Option<bool>,
    pub driver_ok: Option<bool>,
    pub tarpaulin_ok: Option<bool>,
    pub remarks: String,
    pub status: VisitStatus,
    /// Unix millis, stamped at check-in.
    pub entered_at: i64,
    /// System exit time, stamped when the gate marks the truck out.
    pub exited_at: Option<i64>,
    /// Manually corrected exit time. Takes precedence over `exited_at`.
    pub manual_exit_at: Option<i64>,
    pub updated_at: i64,
}

impl TruckVisit {
    /// The exit time display and export surfaces use: the manual correction
    /// when present, otherwise the system-recorded one.
    pub fn effective_exit_at(&self) -> Option<i64> {
        self.manual_exit_at.or(self.exited_at)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckInRequest {
    pub truck_number: String,
    pub transporter: String,
    pub paper_ok: Option<bool>,
    pub driver_ok: Option<bool>,
    pub tarpaulin_ok: Option<bool>,
    #[serde(default)]
    pub remarks: String,
}

/// Admin update payload. Absent fields keep their stored value; `status` may
/// reopen a closed visit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VisitUpdateRequest {
    pub truck_number: Option<String>,
    pub transporter: Option<String>,
    pub paper_ok: Option<bool>,
    pub driver_ok: Option<bool>,
    pub tarpaulin_ok: Option<bool>,
    pub remarks: Option<String>,
    pub status: Option<VisitStatus>,
    /// RFC 3339; stored as the manual exit correction.
    pub manual_exit_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManualExitRequest {
    /// RFC 3339 exit timestamp entered by the operator.
    pub exit_time: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VisitQuery {
    pub limit: Option<usize>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VisitReportQuery {
    /// Local calendar day, `YYYY-MM-DD`; defaults to today.
    pub date: Option<String>,
    pub late_only: Option<bool>,
}

/// A visit as rendered to list and export surfaces: raw fields plus the
/// classifier output for the effective exit time.
#[derive(Debug, Clone, Serialize)]
pub struct VisitView {
    pub id: String,
    pub truck_number: String,
    pub transporter: String,
    pub paper_ok: Option<bool>,
    pub driver_ok: Option<bool>,
    pub tarpaulin_ok: Option<bool>,
    pub remarks: String,
    pub status: VisitStatus,
    pub in_time: String,
    pub out_time: Option<String>,
    pub manual_out_time: Option<String>,
    pub duration: String,
    pub is_late: bool,
}
