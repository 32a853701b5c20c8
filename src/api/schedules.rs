use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::validation::validate_id;
use super::{
    ApiError, ApiResponse, AppState, DeletedResponse, ObservationStatusRequest,
    ScheduleStatusRequest,
};
use crate::models::catalog::{
    NewObservation, NewSchedule, Observation, ObservationExtension, Observatory, Schedule,
};

/// POST /schedules
pub async fn create_schedule(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewSchedule>,
) -> Result<Json<ApiResponse<Schedule>>, ApiError> {
    let schedule = state.catalog().create_schedule(payload).await?;
    tracing::info!(schedule_id = schedule.id, "Created schedule");
    Ok(Json(ApiResponse::success(schedule)))
}

/// GET /schedules/{id}
pub async fn get_schedule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Schedule>>, ApiError> {
    let id = validate_id("schedule", id)?;
    let schedule = state.catalog().get_schedule(id).await?;
    Ok(Json(ApiResponse::success(schedule)))
}

/// PUT /schedules/{id}/status
pub async fn update_schedule_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<ScheduleStatusRequest>,
) -> Result<Json<ApiResponse<Schedule>>, ApiError> {
    let id = validate_id("schedule", id)?;
    let schedule = state
        .catalog()
        .update_schedule_status(id, payload.schedule_status)
        .await?;
    Ok(Json(ApiResponse::success(schedule)))
}

/// DELETE /schedules/{id}
pub async fn delete_schedule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    let id = validate_id("schedule", id)?;
    state.catalog().delete_schedule(id).await?;
    Ok(Json(ApiResponse::success(DeletedResponse::new(id))))
}

/// GET /schedules/{id}/observations
pub async fn list_observations(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<Observation>>>, ApiError> {
    let id = validate_id("schedule", id)?;
    let observations = state.catalog().list_observations(id).await?;
    Ok(Json(ApiResponse::success(observations)))
}

// ============================================================================
// Observations
// ============================================================================

/// POST /observations
pub async fn create_observation(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewObservation>,
) -> Result<Json<ApiResponse<Observation>>, ApiError> {
    let observation = state.catalog().create_observation(payload).await?;
    tracing::info!(
        observation_id = observation.id,
        schedule_id = observation.schedule_id,
        "Created observation"
    );
    Ok(Json(ApiResponse::success(observation)))
}

/// GET /observations/{id}
pub async fn get_observation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Observation>>, ApiError> {
    let id = validate_id("observation", id)?;
    let observation = state.catalog().get_observation(id).await?;
    Ok(Json(ApiResponse::success(observation)))
}

/// PUT /observations/{id}/status
pub async fn update_observation_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<ObservationStatusRequest>,
) -> Result<Json<ApiResponse<Observation>>, ApiError> {
    let id = validate_id("observation", id)?;
    let observation = state
        .catalog()
        .update_observation_status(id, payload.observation_status)
        .await?;
    Ok(Json(ApiResponse::success(observation)))
}

/// PUT /observations/{id}/extension
pub async fn set_observation_extension(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<ObservationExtension>,
) -> Result<Json<ApiResponse<Observation>>, ApiError> {
    let id = validate_id("observation", id)?;
    let observation = state
        .catalog()
        .set_observation_extension(id, payload)
        .await?;
    Ok(Json(ApiResponse::success(observation)))
}

/// DELETE /observations/{id}
pub async fn delete_observation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    let id = validate_id("observation", id)?;
    state.catalog().delete_observation(id).await?;
    Ok(Json(ApiResponse::success(DeletedResponse::new(id))))
}

/// GET /observations/{id}/observatory
pub async fn observatory_for_observation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Observatory>>, ApiError> {
    let id = validate_id("observation", id)?;
    let observatory = state.catalog().observatory_for_observation(id).await?;
    Ok(Json(ApiResponse::success(observatory)))
}
