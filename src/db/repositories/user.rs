use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait,
};
use sha2::{Digest, Sha256};
use tokio::task;

use crate::config::SecurityConfig;
use crate::domain::UserRoleType;
use crate::entities::{prelude::*, user_role_links, user_roles, users};
use crate::models::user::{NewUser, User};

/// Random bytes behind every API token and verification key.
const TOKEN_BYTES: usize = 28;

/// Bytes of the password-hash digest kept in a credential fingerprint.
const FINGERPRINT_BYTES: usize = 12;

/// Another row already holds this email. Raised when the unique index
/// catches a registration that slipped past the lookup.
#[derive(Debug, thiserror::Error)]
#[error("Email already registered: {0}")]
pub struct DuplicateEmail(pub String);

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn find_model(&self, id: i32) -> Result<users::Model> {
        Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))
    }

    /// Create a user with a hashed password and the given roles
    pub async fn create(&self, new_user: &NewUser, config: &SecurityConfig) -> Result<User> {
        let password = new_user.password.clone();
        let config = config.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .context("Password hashing task panicked")??;

        let txn = self.conn.begin().await?;

        let user = users::ActiveModel {
            datecreated: Set(chrono::Utc::now()),
            firstname: Set(new_user.firstname.clone()),
            lastname: Set(new_user.lastname.clone()),
            email: Set(new_user.email.clone()),
            password_hash: Set(password_hash),
            api_token: Set(None),
            verification_key: Set(None),
            verified: Set(false),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                anyhow::Error::new(DuplicateEmail(new_user.email.clone()))
            }
            _ => anyhow::Error::new(e).context("Failed to insert user"),
        })?;

        for role in &new_user.roles {
            let role_model = UserRoles::find()
                .filter(user_roles::Column::Name.eq(*role))
                .one(&txn)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Role not seeded: {role}"))?;

            user_role_links::ActiveModel {
                userid: Set(user.id),
                roleid: Set(role_model.id),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(User::from(user))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    /// Get user by email
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.map(User::from))
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let users = Users::find()
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(users.into_iter().map(User::from).collect())
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Users::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    /// Short digest of the stored password hash; changes whenever the password does.
    pub async fn credential_fingerprint(&self, id: i32) -> Result<Option<String>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(|u| fingerprint(&u.password_hash)))
    }

    /// Replace the stored password hash
    /// Note: Argon2 is CPU-intensive, so hashing runs on the blocking pool.
    pub async fn set_password(
        &self,
        id: i32,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<()> {
        let user = self.find_model(id).await?;

        let password = new_password.to_string();
        let config = config.clone();
        let new_hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .context("Password hashing task panicked")??;

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(new_hash);
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Verify a password against the stored hash. Unknown users never match.
    pub async fn check_password(&self, id: i32, password: &str) -> Result<bool> {
        let Some(user) = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?
        else {
            return Ok(false);
        };

        verify_hash_blocking(user.password_hash, password.to_string()).await
    }

    /// Verify credentials by email, returning the user on success
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>> {
        let Some(user) = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user for authentication")?
        else {
            return Ok(None);
        };

        let is_valid = verify_hash_blocking(user.password_hash.clone(), password.to_string()).await?;
        Ok(is_valid.then(|| User::from(user)))
    }

    /// Issue a fresh API token, replacing any previous one
    pub async fn set_api_token(&self, id: i32) -> Result<String> {
        let user = self.find_model(id).await?;
        let token = generate_token();

        let mut active: users::ActiveModel = user.into();
        active.api_token = Set(Some(token.clone()));
        active.update(&self.conn).await?;

        Ok(token)
    }

    pub async fn check_api_token(&self, id: i32, token: &str) -> Result<bool> {
        let user = self.find_model(id).await?;
        Ok(user.api_token.as_deref() == Some(token))
    }

    /// Resolve an API token to its user
    pub async fn find_by_api_token(&self, token: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::ApiToken.eq(token))
            .one(&self.conn)
            .await
            .context("Failed to query user by API token")?;

        Ok(user.map(User::from))
    }

    pub async fn set_verification_key(&self, id: i32) -> Result<String> {
        let user = self.find_model(id).await?;
        let key = generate_token();

        let mut active: users::ActiveModel = user.into();
        active.verification_key = Set(Some(key.clone()));
        active.update(&self.conn).await?;

        Ok(key)
    }

    /// Compare against the stored verification key; a match marks the user verified.
    pub async fn check_verification_key(&self, id: i32, key: &str) -> Result<bool> {
        let user = self.find_model(id).await?;

        if user.verification_key.as_deref() != Some(key) {
            return Ok(false);
        }

        if !user.verified {
            let mut active: users::ActiveModel = user.into();
            active.verified = Set(true);
            active.update(&self.conn).await?;
        }

        Ok(true)
    }

    pub async fn roles(&self, id: i32) -> Result<Vec<UserRoleType>> {
        let user = self.find_model(id).await?;
        let roles = user
            .find_related(UserRoles)
            .order_by_asc(user_roles::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to load user roles")?;

        Ok(roles.into_iter().map(|r| r.name).collect())
    }

    pub async fn grant_role(&self, id: i32, role: UserRoleType) -> Result<()> {
        let current = self.roles(id).await?;
        if current.contains(&role) {
            return Ok(());
        }

        let role_model = UserRoles::find()
            .filter(user_roles::Column::Name.eq(role))
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Role not seeded: {role}"))?;

        user_role_links::ActiveModel {
            userid: Set(id),
            roleid: Set(role_model.id),
        }
        .insert(&self.conn)
        .await?;

        Ok(())
    }

    pub async fn revoke_role(&self, id: i32, role: UserRoleType) -> Result<bool> {
        let Some(role_model) = UserRoles::find()
            .filter(user_roles::Column::Name.eq(role))
            .one(&self.conn)
            .await?
        else {
            return Ok(false);
        };

        let result = UserRoleLinks::delete_many()
            .filter(user_role_links::Column::Userid.eq(id))
            .filter(user_role_links::Column::Roleid.eq(role_model.id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// True when the token's holder has `scope` or the admin role.
    /// Unknown tokens and missing roles are both plain `false`.
    pub async fn api_scope_validate(&self, token: &str, scope: UserRoleType) -> Result<bool> {
        let Some(user) = Users::find()
            .filter(users::Column::ApiToken.eq(token))
            .one(&self.conn)
            .await
            .context("Failed to query user by API token")?
        else {
            return Ok(false);
        };

        let roles = user
            .find_related(UserRoles)
            .all(&self.conn)
            .await
            .context("Failed to load user roles")?;

        Ok(roles
            .iter()
            .any(|r| r.name == scope || r.name == UserRoleType::Admin))
    }
}

async fn verify_hash_blocking(password_hash: String, password: String) -> Result<bool> {
    task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .context("Password verification task panicked")?
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the library default params.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Check a password against a PHC hash string. The params are read from the hash.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn fingerprint(password_hash: &str) -> String {
    let digest = Sha256::digest(password_hash.as_bytes());
    URL_SAFE_NO_PAD.encode(&digest[..FINGERPRINT_BYTES])
}

/// Generate a URL-safe random token (28 bytes of entropy)
#[must_use]
pub fn generate_token() -> String {
    use rand::RngCore;

    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_params() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse", Some(&fast_params())).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("correct horse!", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same", Some(&fast_params())).unwrap();
        let b = hash_password("same", Some(&fast_params())).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_tracks_the_hash() {
        let a = hash_password("same", Some(&fast_params())).unwrap();
        let b = hash_password("same", Some(&fast_params())).unwrap();
        assert_eq!(fingerprint(&a), fingerprint(&a));
        assert_ne!(fingerprint(&a), fingerprint(&b));
        assert_eq!(fingerprint(&a).len(), 16);
    }

    #[test]
    fn test_invalid_hash_format_is_an_error() {
        assert!(verify_password("x", "5e884898da28047151d0e56f8dc629").is_err());
    }

    #[test]
    fn test_generate_token() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        // 28 bytes -> 38 base64 chars without padding
        assert_eq!(a.len(), 38);
        assert!(
            a.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }
}
