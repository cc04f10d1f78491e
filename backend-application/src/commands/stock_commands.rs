use tracing::error;
use uuid::Uuid;

use crate::{AppError, AppState};
use backend_domain::{
    current_millis, godown_numbers, AdjustmentRequest, AdjustmentRow, CargoType, KajliEntry,
    KajliEntryRequest, KajliEntryRow, StockAdjustment, TruckNumber, VisitStatus,
};

pub async fn record_entry(
    state: &AppState,
    payload: KajliEntryRequest,
) -> Result<KajliEntry, AppError> {
    let truck_number = TruckNumber::normalize(&payload.truck_number);
    if truck_number.is_empty() {
        return Err(AppError::BadRequest("truck_number is required".to_string()));
    }
    let cargo_type = parse_cargo(&payload.cargo_type)?;
    ensure_known_godown(state, payload.godown_number).await?;

    let entry = KajliEntry {
        id: Uuid::new_v4().to_string(),
        truck_number: truck_number.into_inner(),
        godown_number: payload.godown_number,
        cargo_type,
        bag_count: payload.bag_count.unwrap_or(0),
        loading_status: payload.loading_status.unwrap_or(VisitStatus::IN),
        entered_at: current_millis(),
    };

    let row = KajliEntryRow::from_entry(&entry);
    state.stock_repo.insert_entry(&row).await.map_err(|err| {
        error!("failed to store kajli entry: {}", err);
        state.metrics.record_store_error();
        AppError::Internal(err)
    })?;
    state.metrics.record_kajli_entry();
    Ok(entry)
}

/// Appends one signed correction. Nothing is overwritten: concurrent
/// submissions each land as their own delta and all count at the next
/// aggregation.
pub async fn submit_adjustment(
    state: &AppState,
    payload: AdjustmentRequest,
) -> Result<StockAdjustment, AppError> {
    let cargo_type = parse_cargo(&payload.cargo_type)?;
    ensure_known_godown(state, payload.godown_number).await?;
    if payload.bag_delta == 0 {
        return Err(AppError::BadRequest(
            "bag_delta must not be zero".to_string(),
        ));
    }

    let adjustment = StockAdjustment {
        id: Uuid::new_v4().to_string(),
        godown_number: payload.godown_number,
        cargo_type,
        bag_delta: payload.bag_delta,
        created_at: current_millis(),
    };

    let row = AdjustmentRow::from_adjustment(&adjustment);
    state
        .stock_repo
        .insert_adjustment(&row)
        .await
        .map_err(|err| {
            error!("failed to store adjustment: {}", err);
            state.metrics.record_store_error();
            AppError::Internal(err)
        })?;
    state.metrics.record_adjustment();
    Ok(adjustment)
}

pub async fn update_godown_registry(
    state: &AppState,
    mut godowns: Vec<backend_domain::GodownEntry>,
) -> Result<(), AppError> {
    for godown in &mut godowns {
        if godown.number == 0 {
            return Err(AppError::BadRequest(
                "godown number must be positive".to_string(),
            ));
        }
        if let Some(name) = &godown.name {
            let trimmed = name.trim();
            godown.name = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            };
        }
    }
    godowns.sort_by_key(|godown| godown.number);
    godowns.dedup_by_key(|godown| godown.number);
    if godowns.is_empty() {
        return Err(AppError::BadRequest(
            "registry must list at least one godown".to_string(),
        ));
    }

    state
        .registry_repo
        .save_godowns(&state.config.godowns_path, &godowns)
        .await
        .map_err(AppError::Internal)?;
    *state.godowns.write().await = godowns;
    Ok(())
}

fn parse_cargo(raw: &str) -> Result<CargoType, AppError> {
    CargoType::parse(raw)
        .ok_or_else(|| AppError::BadRequest(format!("unknown cargo_type '{}'", raw.trim())))
}

async fn ensure_known_godown(state: &AppState, number: u32) -> Result<(), AppError> {
    let godowns = state.godowns.read().await;
    if godown_numbers(&godowns).contains(&number) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "unknown godown number {}",
            number
        )))
    }
}
