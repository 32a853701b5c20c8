//! `SeaORM` implementation of the `IdentityService` trait.

use async_trait::async_trait;
use tracing::debug;

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::domain::UserRoleType;
use crate::models::user::{NewUser, User, UserWithRoles};
use crate::services::identity_service::{IdentityError, IdentityService, TokenGrant};
use crate::services::reset_token;

pub const MIN_PASSWORD_LEN: usize = 8;
const MAX_NAME_LEN: usize = 25;
const MAX_EMAIL_LEN: usize = 100;

pub struct SeaOrmIdentityService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmIdentityService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    async fn with_roles(&self, user: User) -> Result<UserWithRoles, IdentityError> {
        let roles = self.store.user_roles(user.id).await?;
        Ok(UserWithRoles { user, roles })
    }

    async fn require_user(&self, user_id: i32) -> Result<User, IdentityError> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or(IdentityError::UserNotFound)
    }
}

fn validate_password(password: &str) -> Result<(), IdentityError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(IdentityError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_new_user(new_user: &NewUser) -> Result<(), IdentityError> {
    for (field, value) in [
        ("firstname", &new_user.firstname),
        ("lastname", &new_user.lastname),
    ] {
        let value = value.trim();
        if value.is_empty() {
            return Err(IdentityError::Validation(format!("{field} cannot be empty")));
        }
        if value.chars().count() > MAX_NAME_LEN {
            return Err(IdentityError::Validation(format!(
                "{field} must be {MAX_NAME_LEN} characters or less"
            )));
        }
    }

    let email = new_user.email.trim();
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed || email.chars().count() > MAX_EMAIL_LEN {
        return Err(IdentityError::Validation(format!(
            "Invalid email address: {email}"
        )));
    }

    validate_password(&new_user.password)
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

#[async_trait]
impl IdentityService for SeaOrmIdentityService {
    async fn register(&self, mut new_user: NewUser) -> Result<UserWithRoles, IdentityError> {
        validate_new_user(&new_user)?;

        new_user.email = new_user.email.trim().to_lowercase();
        new_user.firstname = new_user.firstname.trim().to_string();
        new_user.lastname = new_user.lastname.trim().to_string();
        if new_user.roles.is_empty() {
            new_user.roles.push(UserRoleType::Viewer);
        }

        if self.store.get_user_by_email(&new_user.email).await?.is_some() {
            return Err(IdentityError::EmailTaken(new_user.email));
        }

        let user = self.store.create_user(&new_user, &self.security).await?;
        self.with_roles(user).await
    }

    async fn get_user(&self, user_id: i32) -> Result<UserWithRoles, IdentityError> {
        let user = self.require_user(user_id).await?;
        self.with_roles(user).await
    }

    async fn issue_token(&self, email: &str, password: &str) -> Result<TokenGrant, IdentityError> {
        let email = email.trim().to_lowercase();
        let user = self
            .store
            .authenticate(&email, password)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        let api_token = self.store.set_api_token(user.id).await?;

        Ok(TokenGrant { user, api_token })
    }

    async fn set_password(&self, user_id: i32, password: &str) -> Result<(), IdentityError> {
        validate_password(password)?;
        self.require_user(user_id).await?;

        self.store
            .set_password(user_id, password, &self.security)
            .await?;
        Ok(())
    }

    async fn check_password(&self, user_id: i32, password: &str) -> Result<bool, IdentityError> {
        Ok(self.store.check_password(user_id, password).await?)
    }

    async fn set_api_token(&self, user_id: i32) -> Result<String, IdentityError> {
        self.require_user(user_id).await?;
        Ok(self.store.set_api_token(user_id).await?)
    }

    async fn check_api_token(&self, user_id: i32, token: &str) -> Result<bool, IdentityError> {
        self.require_user(user_id).await?;
        Ok(self.store.check_api_token(user_id, token).await?)
    }

    async fn set_verification_key(&self, user_id: i32) -> Result<String, IdentityError> {
        self.require_user(user_id).await?;
        Ok(self.store.set_verification_key(user_id).await?)
    }

    async fn check_verification_key(
        &self,
        user_id: i32,
        key: &str,
    ) -> Result<bool, IdentityError> {
        self.require_user(user_id).await?;
        Ok(self.store.check_verification_key(user_id, key).await?)
    }

    async fn get_reset_password_token(
        &self,
        user_id: i32,
        expires_in: Option<u64>,
    ) -> Result<String, IdentityError> {
        let credential = self
            .store
            .credential_fingerprint(user_id)
            .await?
            .ok_or(IdentityError::UserNotFound)?;

        let expires_in = expires_in.unwrap_or(self.security.reset_token_expiry_seconds);
        reset_token::sign(
            user_id,
            &credential,
            expires_in,
            now_unix(),
            self.security.secret_key.as_bytes(),
        )
        .map_err(|e| IdentityError::Internal(e.to_string()))
    }

    async fn verify_reset_password_token(&self, token: &str) -> Result<User, IdentityError> {
        let claims = reset_token::verify(token, now_unix(), self.security.secret_key.as_bytes())
            .map_err(|e| {
                debug!(error = %e, "Rejected password reset token");
                IdentityError::InvalidOrExpiredToken
            })?;

        let current = self
            .store
            .credential_fingerprint(claims.reset_password)
            .await?;
        match current {
            Some(fingerprint) if fingerprint == claims.cred => {}
            Some(_) => {
                debug!(
                    user_id = claims.reset_password,
                    "Password reset token was issued for an older password"
                );
                return Err(IdentityError::InvalidOrExpiredToken);
            }
            None => {
                debug!(
                    user_id = claims.reset_password,
                    "Password reset token names an unknown user"
                );
                return Err(IdentityError::InvalidOrExpiredToken);
            }
        }

        self.store
            .get_user(claims.reset_password)
            .await?
            .ok_or(IdentityError::InvalidOrExpiredToken)
    }

    async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<User, IdentityError> {
        validate_password(new_password)?;

        let user = self.verify_reset_password_token(token).await?;
        self.store
            .set_password(user.id, new_password, &self.security)
            .await?;

        Ok(user)
    }

    async fn api_scope_validate(
        &self,
        token: &str,
        scope: UserRoleType,
    ) -> Result<bool, IdentityError> {
        Ok(self.store.api_scope_validate(token, scope).await?)
    }

    async fn user_for_token(&self, token: &str) -> Result<Option<UserWithRoles>, IdentityError> {
        match self.store.find_user_by_api_token(token).await? {
            Some(user) => Ok(Some(self.with_roles(user).await?)),
            None => Ok(None),
        }
    }
}
