use chrono::{Local, NaiveDate, TimeZone};
use tracing::error;

use crate::{AppError, AppState};
use backend_domain::services::classify_duration;
use backend_domain::{
    millis_to_rfc3339, parse_date, TruckNumber, TruckVisit, VisitQuery, VisitReportQuery,
    VisitRow, VisitView,
};

const DASHBOARD_LIMIT: usize = 20;
const ADMIN_LIMIT: usize = 100;
const REPORT_LIMIT: usize = 2000;

/// Gate dashboard: the most recent visits, newest first.
pub async fn list_dashboard(state: &AppState, query: VisitQuery) -> Result<Vec<VisitView>, AppError> {
    let limit = query.limit.unwrap_or(DASHBOARD_LIMIT).clamp(1, ADMIN_LIMIT);
    let rows = fetch_visits(state, None, limit).await?;
    Ok(rows.into_iter().map(to_view).collect())
}

/// Admin table: larger cap and optional truck-number search. The search term
/// is normalized the same way plates are stored, so "gj 01" matches "GJ01".
pub async fn list_admin(state: &AppState, query: VisitQuery) -> Result<Vec<VisitView>, AppError> {
    let limit = query.limit.unwrap_or(ADMIN_LIMIT).clamp(1, REPORT_LIMIT);
    let search = query
        .search
        .as_deref()
        .map(TruckNumber::normalize)
        .filter(|number| !number.is_empty())
        .map(TruckNumber::into_inner);
    let rows = fetch_visits(state, search.as_deref(), limit).await?;
    Ok(rows.into_iter().map(to_view).collect())
}

/// Rows feeding the export surfaces: one local calendar day of visits, each
/// carrying its duration classification, optionally filtered to late exits.
pub async fn report_rows(
    state: &AppState,
    query: VisitReportQuery,
) -> Result<Vec<VisitView>, AppError> {
    let date = query
        .date
        .unwrap_or_else(|| Local::now().format("%Y-%m-%d").to_string());
    let day = parse_date(&date)
        .map_err(|err| AppError::BadRequest(format!("invalid date: {}", err)))?;
    let (start_ms, end_ms) = local_day_bounds(day)?;

    let rows = state
        .visit_repo
        .fetch_visits_between(start_ms, end_ms, REPORT_LIMIT)
        .await
        .map_err(|err| {
            error!("failed to fetch visits for report: {}", err);
            state.metrics.record_store_error();
            AppError::Internal(err)
        })?;

    let late_only = query.late_only.unwrap_or(false);
    let views = rows
        .into_iter()
        .map(to_view)
        .filter(|view| !late_only || view.is_late)
        .collect();
    Ok(views)
}

pub fn local_day_bounds(day: NaiveDate) -> Result<(i64, i64), AppError> {
    let start = day
        .and_hms_opt(0, 0, 0)
        .and_then(|dt| Local.from_local_datetime(&dt).earliest())
        .ok_or_else(|| AppError::BadRequest("invalid date".to_string()))?;
    let end = day
        .and_hms_milli_opt(23, 59, 59, 999)
        .and_then(|dt| Local.from_local_datetime(&dt).latest())
        .ok_or_else(|| AppError::BadRequest("invalid date".to_string()))?;
    Ok((start.timestamp_millis(), end.timestamp_millis()))
}

async fn fetch_visits(
    state: &AppState,
    search: Option<&str>,
    limit: usize,
) -> Result<Vec<VisitRow>, AppError> {
    state
        .visit_repo
        .fetch_visits(search, limit)
        .await
        .map_err(|err| {
            error!("failed to fetch visits: {}", err);
            state.metrics.record_store_error();
            AppError::Internal(err)
        })
}

fn to_view(row: VisitRow) -> VisitView {
    view_of(row.into_visit())
}

pub fn view_of(visit: TruckVisit) -> VisitView {
    let class = classify_duration(visit.entered_at, visit.effective_exit_at());
    VisitView {
        id: visit.id,
        truck_number: visit.truck_number,
        transporter: visit.transporter,
        paper_ok: visit.paper_ok,
        driver_ok: visit.driver_ok,
        tarpaulin_ok: visit.tarpaulin_ok,
        remarks: visit.remarks,
        status: visit.status,
        in_time: millis_to_rfc3339(visit.entered_at),
        out_time: visit.exited_at.map(millis_to_rfc3339),
        manual_out_time: visit.manual_exit_at.map(millis_to_rfc3339),
        duration: class.text,
        is_late: class.is_late,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::VisitStatus;

    fn visit(entered_at: i64, exited_at: Option<i64>, manual_exit_at: Option<i64>) -> TruckVisit {
        TruckVisit {
            id: "v-1".to_string(),
            truck_number: "GJ01XY1234".to_string(),
            transporter: "Shree Logistics".to_string(),
            paper_ok: Some(true),
            driver_ok: None,
            tarpaulin_ok: Some(false),
            remarks: String::new(),
            status: VisitStatus::OUT,
            entered_at,
            exited_at,
            manual_exit_at,
            updated_at: entered_at,
        }
    }

    #[test]
    fn view_classifies_from_the_effective_exit_time() {
        // System exit 10m after entry, manual correction 5h after: the manual
        // value wins and the visit classifies late.
        let entered = 1_700_000_000_000;
        let v = visit(
            entered,
            Some(entered + 600_000),
            Some(entered + 5 * 3_600_000),
        );
        let view = view_of(v);
        assert_eq!(view.duration, "5h 0m");
        assert!(view.is_late);
    }

    #[test]
    fn view_falls_back_to_the_system_exit_time() {
        let entered = 1_700_000_000_000;
        let view = view_of(visit(entered, Some(entered + 600_000), None));
        assert_eq!(view.duration, "0h 10m");
        assert!(!view.is_late);
    }

    #[test]
    fn active_visit_renders_the_placeholder() {
        let view = view_of(visit(1_700_000_000_000, None, None));
        assert_eq!(view.duration, "-");
        assert!(!view.is_late);
        assert!(view.out_time.is_none());
    }
}
