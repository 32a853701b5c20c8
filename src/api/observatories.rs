use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::validation::validate_id;
use super::{ApiError, ApiResponse, AppState, DeletedResponse, RenameRequest};
use crate::models::catalog::{
    Instrument, NewInstrument, NewObservatory, NewTelescope, Observatory, ObservatoryTree,
    Schedule, Telescope,
};

// ============================================================================
// Observatories
// ============================================================================

/// GET /observatories
pub async fn list_observatories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Observatory>>>, ApiError> {
    let observatories = state.catalog().list_observatories().await?;
    Ok(Json(ApiResponse::success(observatories)))
}

/// POST /observatories
pub async fn create_observatory(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewObservatory>,
) -> Result<Json<ApiResponse<Observatory>>, ApiError> {
    let observatory = state.catalog().create_observatory(payload).await?;
    tracing::info!(observatory_id = observatory.id, "Created observatory");
    Ok(Json(ApiResponse::success(observatory)))
}

/// GET /observatories/{id}
/// Includes the telescopes, instruments and schedules beneath it.
pub async fn get_observatory(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ObservatoryTree>>, ApiError> {
    let id = validate_id("observatory", id)?;
    let tree = state.catalog().observatory_tree(id).await?;
    Ok(Json(ApiResponse::success(tree)))
}

/// PUT /observatories/{id}
pub async fn rename_observatory(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<RenameRequest>,
) -> Result<Json<ApiResponse<Observatory>>, ApiError> {
    let id = validate_id("observatory", id)?;
    let observatory = state.catalog().rename_observatory(id, &payload.name).await?;
    Ok(Json(ApiResponse::success(observatory)))
}

/// DELETE /observatories/{id}
pub async fn delete_observatory(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    let id = validate_id("observatory", id)?;
    state.catalog().delete_observatory(id).await?;
    tracing::info!(observatory_id = id, "Deleted observatory");
    Ok(Json(ApiResponse::success(DeletedResponse::new(id))))
}

/// GET /observatories/{id}/telescopes
pub async fn list_telescopes(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<Telescope>>>, ApiError> {
    let id = validate_id("observatory", id)?;
    let telescopes = state.catalog().list_telescopes(id).await?;
    Ok(Json(ApiResponse::success(telescopes)))
}

// ============================================================================
// Telescopes
// ============================================================================

/// POST /telescopes
pub async fn create_telescope(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewTelescope>,
) -> Result<Json<ApiResponse<Telescope>>, ApiError> {
    let telescope = state.catalog().create_telescope(payload).await?;
    Ok(Json(ApiResponse::success(telescope)))
}

/// GET /telescopes/{id}
pub async fn get_telescope(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Telescope>>, ApiError> {
    let id = validate_id("telescope", id)?;
    let telescope = state.catalog().get_telescope(id).await?;
    Ok(Json(ApiResponse::success(telescope)))
}

/// DELETE /telescopes/{id}
pub async fn delete_telescope(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    let id = validate_id("telescope", id)?;
    state.catalog().delete_telescope(id).await?;
    Ok(Json(ApiResponse::success(DeletedResponse::new(id))))
}

/// GET /telescopes/{id}/instruments
pub async fn list_instruments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<Instrument>>>, ApiError> {
    let id = validate_id("telescope", id)?;
    let instruments = state.catalog().list_instruments(id).await?;
    Ok(Json(ApiResponse::success(instruments)))
}

// ============================================================================
// Instruments
// ============================================================================

/// POST /instruments
pub async fn create_instrument(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewInstrument>,
) -> Result<Json<ApiResponse<Instrument>>, ApiError> {
    let instrument = state.catalog().create_instrument(payload).await?;
    Ok(Json(ApiResponse::success(instrument)))
}

/// GET /instruments/{id}
pub async fn get_instrument(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Instrument>>, ApiError> {
    let id = validate_id("instrument", id)?;
    let instrument = state.catalog().get_instrument(id).await?;
    Ok(Json(ApiResponse::success(instrument)))
}

/// DELETE /instruments/{id}
pub async fn delete_instrument(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    let id = validate_id("instrument", id)?;
    state.catalog().delete_instrument(id).await?;
    Ok(Json(ApiResponse::success(DeletedResponse::new(id))))
}

/// GET /instruments/{id}/schedules
pub async fn list_schedules(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<Schedule>>>, ApiError> {
    let id = validate_id("instrument", id)?;
    let schedules = state.catalog().list_schedules(id).await?;
    Ok(Json(ApiResponse::success(schedules)))
}
