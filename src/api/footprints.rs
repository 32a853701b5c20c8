use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::validation::validate_id;
use super::{ApiError, ApiResponse, AppState, DeletedResponse};
use crate::models::catalog::Footprint;

/// GET /footprints
pub async fn list_footprints(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Footprint>>>, ApiError> {
    let footprints = state.catalog().list_footprints().await?;
    Ok(Json(ApiResponse::success(footprints)))
}

/// POST /footprints
pub async fn create_footprint(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Footprint>>, ApiError> {
    let footprint = state.catalog().create_footprint().await?;
    Ok(Json(ApiResponse::success(footprint)))
}

/// GET /footprints/{id}
pub async fn get_footprint(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Footprint>>, ApiError> {
    let id = validate_id("footprint", id)?;
    let footprint = state.catalog().get_footprint(id).await?;
    Ok(Json(ApiResponse::success(footprint)))
}

/// DELETE /footprints/{id}
pub async fn delete_footprint(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    let id = validate_id("footprint", id)?;
    state.catalog().delete_footprint(id).await?;
    Ok(Json(ApiResponse::success(DeletedResponse::new(id))))
}
