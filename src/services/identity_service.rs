//! Domain service for accounts and credentials.
//!
//! Covers registration, passwords, API tokens, verification keys,
//! password-reset tokens and scope checks.

use serde::Serialize;
use thiserror::Error;

use crate::db::repositories::user::DuplicateEmail;
use crate::domain::UserRoleType;
use crate::models::user::{NewUser, User, UserWithRoles};

/// Errors specific to identity operations.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Every reset-token failure (malformed, bad signature, expired,
    /// unknown user) surfaces as this one variant.
    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for IdentityError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for IdentityError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DuplicateEmail>() {
            Ok(DuplicateEmail(email)) => Self::EmailTaken(email),
            Err(err) => Self::Internal(err.to_string()),
        }
    }
}

/// Result of exchanging credentials for an API token.
#[derive(Debug, Clone, Serialize)]
pub struct TokenGrant {
    pub user: User,
    pub api_token: String,
}

/// Domain service trait for identity and credentials.
#[async_trait::async_trait]
pub trait IdentityService: Send + Sync {
    /// Creates an account with a hashed password and the requested roles.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Validation`] for bad input and
    /// [`IdentityError::EmailTaken`] when the email already exists.
    async fn register(&self, new_user: NewUser) -> Result<UserWithRoles, IdentityError>;

    async fn get_user(&self, user_id: i32) -> Result<UserWithRoles, IdentityError>;

    /// Verifies email + password and issues a fresh API token.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidCredentials`] if login fails.
    async fn issue_token(&self, email: &str, password: &str) -> Result<TokenGrant, IdentityError>;

    async fn set_password(&self, user_id: i32, password: &str) -> Result<(), IdentityError>;

    async fn check_password(&self, user_id: i32, password: &str) -> Result<bool, IdentityError>;

    /// Issues a new API token, replacing the previous one.
    async fn set_api_token(&self, user_id: i32) -> Result<String, IdentityError>;

    async fn check_api_token(&self, user_id: i32, token: &str) -> Result<bool, IdentityError>;

    async fn set_verification_key(&self, user_id: i32) -> Result<String, IdentityError>;

    /// A matching key marks the user verified.
    async fn check_verification_key(&self, user_id: i32, key: &str)
    -> Result<bool, IdentityError>;

    /// Signs a reset token; `expires_in` falls back to the configured expiry.
    async fn get_reset_password_token(
        &self,
        user_id: i32,
        expires_in: Option<u64>,
    ) -> Result<String, IdentityError>;

    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidOrExpiredToken`] for any rejected token.
    async fn verify_reset_password_token(&self, token: &str) -> Result<User, IdentityError>;

    /// Verifies the reset token and sets the new password.
    async fn reset_password(&self, token: &str, new_password: &str)
    -> Result<User, IdentityError>;

    /// True when the token's holder has `scope` or is an admin.
    async fn api_scope_validate(
        &self,
        token: &str,
        scope: UserRoleType,
    ) -> Result<bool, IdentityError>;

    /// Resolves an API token to its holder and roles.
    async fn user_for_token(&self, token: &str) -> Result<Option<UserWithRoles>, IdentityError>;
}
