use serde::{Deserialize, Serialize};

use crate::domain::{ObservationStatus, ScheduleStatus, UserRoleType};
use crate::models::user::User;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    #[serde(flatten)]
    pub user: User,
    pub roles: Vec<UserRoleType>,
    /// Returned directly since no mail transport is configured.
    pub verification_key: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub user_id: i32,
    pub api_token: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub user_id: i32,
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub verified: bool,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct PasswordResetResponse {
    pub reset_token: String,
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetConfirmRequest {
    pub token: String,
    pub new_password: String,
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleStatusRequest {
    pub schedule_status: ScheduleStatus,
}

#[derive(Debug, Deserialize)]
pub struct ObservationStatusRequest {
    pub observation_status: ObservationStatus,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub id: i32,
    pub deleted: bool,
}

impl DeletedResponse {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self { id, deleted: true }
    }
}

// ============================================================================
// System
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub version: &'static str,
    pub uptime_seconds: u64,
}

#[derive(Debug, Deserialize)]
pub struct RandDataQuery {
    #[serde(default)]
    pub params: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RandDataResponse {
    pub random_number: i64,
    pub params: i64,
    pub sum_random_params: i64,
}
