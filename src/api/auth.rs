use axum::{
    Extension, Json,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{
    ApiError, ApiResponse, AppState, PasswordResetConfirmRequest, PasswordResetRequest,
    PasswordResetResponse, RegisterRequest, RegisterResponse, TokenRequest, TokenResponse,
    VerifyRequest, VerifyResponse,
};
use super::validation::validate_expires_in;
use crate::domain::UserRoleType;
use crate::models::user::{NewUser, User, UserWithRoles};

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Resolves the caller's API token and, when given, requires `scope` (or admin).
/// A missing or unknown token is 401, a known token without the role is 403.
pub async fn require_scope(
    State((state, scope)): State<(Arc<AppState>, Option<UserRoleType>)>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_api_key(&headers)
        .ok_or_else(|| ApiError::unauthorized("Missing API token"))?;

    let user = state
        .identity()
        .user_for_token(&token)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid API token"))?;

    tracing::Span::current().record("user_id", user.user.id);

    if let Some(scope) = scope {
        if !state.identity().api_scope_validate(&token, scope).await? {
            return Err(ApiError::forbidden(format!("Requires the {scope} role")));
        }
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Extract the API token from `X-Api-Key` or `Authorization: Bearer`.
fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    if let Some(key) = headers.get("X-Api-Key").and_then(|v| v.to_str().ok()) {
        let key = key.trim();
        if !key.is_empty() {
            return Some(key.to_string());
        }
    }

    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
/// New accounts get the viewer role; further roles are granted from the CLI.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<RegisterResponse>>, ApiError> {
    let created = state
        .identity()
        .register(NewUser {
            firstname: payload.firstname,
            lastname: payload.lastname,
            email: payload.email,
            password: payload.password,
            roles: vec![UserRoleType::Viewer],
        })
        .await?;

    let verification_key = state
        .identity()
        .set_verification_key(created.user.id)
        .await?;

    tracing::info!(user_id = created.user.id, "Registered new user");

    Ok(Json(ApiResponse::success(RegisterResponse {
        user: created.user,
        roles: created.roles,
        verification_key,
    })))
}

/// POST /auth/token
/// Exchange email and password for a fresh API token
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TokenRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    if payload.email.trim().is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let grant = state
        .identity()
        .issue_token(&payload.email, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(TokenResponse {
        user_id: grant.user.id,
        api_token: grant.api_token,
    })))
}

/// POST /auth/verify
pub async fn verify(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VerifyRequest>,
) -> Result<Json<ApiResponse<VerifyResponse>>, ApiError> {
    let verified = state
        .identity()
        .check_verification_key(payload.user_id, &payload.key)
        .await?;

    Ok(Json(ApiResponse::success(VerifyResponse { verified })))
}

/// POST /auth/password-reset (admin only)
/// The token is handed to the admin, who passes it to the account owner.
pub async fn issue_password_reset(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<UserWithRoles>,
    Json(payload): Json<PasswordResetRequest>,
) -> Result<Json<ApiResponse<PasswordResetResponse>>, ApiError> {
    let email = payload.email.trim().to_lowercase();
    let user = state
        .store()
        .get_user_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let expires_in = validate_expires_in(
        payload
            .expires_in
            .unwrap_or(state.config().security.reset_token_expiry_seconds),
    )?;
    let reset_token = state
        .identity()
        .get_reset_password_token(user.id, Some(expires_in))
        .await?;

    tracing::info!(
        admin_id = admin.user.id,
        user_id = user.id,
        "Issued password reset token"
    );

    Ok(Json(ApiResponse::success(PasswordResetResponse {
        reset_token,
        expires_in,
    })))
}

/// POST /auth/password-reset/confirm
pub async fn confirm_password_reset(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PasswordResetConfirmRequest>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state
        .identity()
        .reset_password(&payload.token, &payload.new_password)
        .await?;

    tracing::info!(user_id = user.id, "Password reset completed");

    Ok(Json(ApiResponse::success(user)))
}

/// GET /auth/me
pub async fn current_user(
    Extension(user): Extension<UserWithRoles>,
) -> Json<ApiResponse<UserWithRoles>> {
    Json(ApiResponse::success(user))
}

/// PUT /auth/password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserWithRoles>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    if payload.current_password == payload.new_password {
        return Err(ApiError::validation(
            "New password must be different from current password",
        ));
    }

    let is_valid = state
        .identity()
        .check_password(user.user.id, &payload.current_password)
        .await?;
    if !is_valid {
        return Err(ApiError::validation("Current password is incorrect"));
    }

    state
        .identity()
        .set_password(user.user.id, &payload.new_password)
        .await?;

    tracing::info!(user_id = user.user.id, "Password changed");

    Ok(Json(ApiResponse::success(user.user)))
}
