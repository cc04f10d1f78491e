use tracing::error;
use uuid::Uuid;

use crate::{AppError, AppState};
use backend_domain::services::{classify_duration, DurationClass};
use backend_domain::{
    current_millis, parse_rfc3339_millis, CheckInRequest, LateExitAlert, ManualExitRequest,
    TruckNumber, TruckVisit, VisitRow, VisitStatus, VisitUpdateRequest,
};

pub async fn check_in(state: &AppState, payload: CheckInRequest) -> Result<TruckVisit, AppError> {
    let truck_number = TruckNumber::normalize(&payload.truck_number);
    if truck_number.is_empty() {
        return Err(AppError::BadRequest("truck_number is required".to_string()));
    }
    let transporter = payload.transporter.trim().to_string();
    if transporter.is_empty() {
        return Err(AppError::BadRequest("transporter is required".to_string()));
    }

    let now = current_millis();
    let visit = TruckVisit {
        id: Uuid::new_v4().to_string(),
        truck_number: truck_number.into_inner(),
        transporter,
        paper_ok: payload.paper_ok,
        driver_ok: payload.driver_ok,
        tarpaulin_ok: payload.tarpaulin_ok,
        remarks: payload.remarks.trim().to_string(),
        status: VisitStatus::IN,
        entered_at: now,
        exited_at: None,
        manual_exit_at: None,
        updated_at: now,
    };

    store_visit(state, &visit).await?;
    state.metrics.record_checkin();
    Ok(visit)
}

/// Marks the visit out and stamps the system exit time. A late departure also
/// fires the alert webhook.
pub async fn mark_exit(state: &AppState, id: &str) -> Result<TruckVisit, AppError> {
    let mut visit = load_visit(state, id).await?;

    let now = current_millis();
    visit.status = VisitStatus::OUT;
    visit.exited_at = Some(now);
    visit.updated_at = now;

    store_visit(state, &visit).await?;

    let class = classify_duration(visit.entered_at, visit.effective_exit_at());
    state.metrics.record_checkout(class.is_late);
    if class.is_late {
        spawn_late_alert(state, &visit, &class);
    }
    Ok(visit)
}

/// Stores an operator-entered exit correction. The system exit time is left
/// untouched; the manual value takes precedence everywhere it is read.
pub async fn set_manual_exit(
    state: &AppState,
    id: &str,
    payload: ManualExitRequest,
) -> Result<TruckVisit, AppError> {
    let exit_ms = parse_rfc3339_millis(payload.exit_time.trim())
        .map_err(|err| AppError::BadRequest(err.to_string()))?;

    let mut visit = load_visit(state, id).await?;
    visit.manual_exit_at = Some(exit_ms);
    visit.updated_at = current_millis();

    store_visit(state, &visit).await?;
    Ok(visit)
}

/// Admin edit: any field may change, including reopening a closed visit.
pub async fn admin_update(
    state: &AppState,
    id: &str,
    payload: VisitUpdateRequest,
) -> Result<TruckVisit, AppError> {
    let mut visit = load_visit(state, id).await?;

    if let Some(raw) = payload.truck_number {
        let truck_number = TruckNumber::normalize(&raw);
        if truck_number.is_empty() {
            return Err(AppError::BadRequest("truck_number is required".to_string()));
        }
        visit.truck_number = truck_number.into_inner();
    }
    if let Some(raw) = payload.transporter {
        let transporter = raw.trim().to_string();
        if transporter.is_empty() {
            return Err(AppError::BadRequest("transporter is required".to_string()));
        }
        visit.transporter = transporter;
    }
    if let Some(flag) = payload.paper_ok {
        visit.paper_ok = Some(flag);
    }
    if let Some(flag) = payload.driver_ok {
        visit.driver_ok = Some(flag);
    }
    if let Some(flag) = payload.tarpaulin_ok {
        visit.tarpaulin_ok = Some(flag);
    }
    if let Some(remarks) = payload.remarks {
        visit.remarks = remarks.trim().to_string();
    }
    if let Some(raw) = payload.manual_exit_at {
        let exit_ms = parse_rfc3339_millis(raw.trim())
            .map_err(|err| AppError::BadRequest(err.to_string()))?;
        visit.manual_exit_at = Some(exit_ms);
    }
    if let Some(status) = payload.status {
        if status == VisitStatus::OUT && visit.exited_at.is_none() {
            visit.exited_at = Some(current_millis());
        }
        visit.status = status;
    }
    visit.updated_at = current_millis();

    store_visit(state, &visit).await?;
    Ok(visit)
}

async fn load_visit(state: &AppState, id: &str) -> Result<TruckVisit, AppError> {
    let row = state.visit_repo.fetch_visit(id).await.map_err(|err| {
        error!("failed to fetch visit {}: {}", id, err);
        state.metrics.record_store_error();
        AppError::Internal(err)
    })?;
    row.map(VisitRow::into_visit).ok_or(AppError::NotFound)
}

async fn store_visit(state: &AppState, visit: &TruckVisit) -> Result<(), AppError> {
    let row = VisitRow::from_visit(visit);
    state.visit_repo.insert_visit(&row).await.map_err(|err| {
        error!("failed to store visit {}: {}", visit.id, err);
        state.metrics.record_store_error();
        AppError::Internal(err)
    })
}

fn spawn_late_alert(state: &AppState, visit: &TruckVisit, class: &DurationClass) {
    let alert = LateExitAlert {
        truck_number: visit.truck_number.clone(),
        transporter: visit.transporter.clone(),
        duration_text: class.text.clone(),
        exited_at: visit.effective_exit_at().unwrap_or(visit.updated_at),
    };
    state
        .alert_service
        .spawn_alerts(state.config.clone(), vec![alert]);
}
