use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::{DatabaseConfig, SecurityConfig};
use crate::domain::{ObservationStatus, ScheduleStatus, UserRoleType};
use crate::models::catalog::{
    Footprint, Instrument, NewInstrument, NewObservation, NewObservatory, NewSchedule,
    NewTelescope, Observation, ObservationExtension, Observatory, ObservatoryTree, Schedule,
    Telescope,
};
use crate::models::user::{NewUser, User};

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

fn is_memory_url(db_url: &str) -> bool {
    db_url.starts_with("sqlite::memory:") || db_url.contains("mode=memory")
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn from_config(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to database at {}", config.redacted_url());
        Self::with_pool_options(
            &config.connection_url(),
            config.max_connections,
            config.min_connections,
        )
        .await
    }

    /// Fresh in-memory SQLite database with the schema applied.
    pub async fn in_memory() -> Result<Self> {
        Self::new("sqlite::memory:").await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let memory = is_memory_url(db_url);

        if db_url.starts_with("sqlite:") && !memory {
            let path_str = db_url
                .trim_start_matches("sqlite:")
                .trim_start_matches("//")
                .split('?')
                .next()
                .unwrap_or_default();
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Every pooled connection to an in-memory SQLite URL is its own database.
        let (max_connections, min_connections) = if memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        if !memory {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn observatory_repo(&self) -> repositories::observatory::ObservatoryRepository {
        repositories::observatory::ObservatoryRepository::new(self.conn.clone())
    }

    fn schedule_repo(&self) -> repositories::schedule::ScheduleRepository {
        repositories::schedule::ScheduleRepository::new(self.conn.clone())
    }

    fn observation_repo(&self) -> repositories::observation::ObservationRepository {
        repositories::observation::ObservationRepository::new(self.conn.clone())
    }

    fn footprint_repo(&self) -> repositories::footprint::FootprintRepository {
        repositories::footprint::FootprintRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Users and credentials
    // ========================================================================

    pub async fn create_user(&self, new_user: &NewUser, config: &SecurityConfig) -> Result<User> {
        self.user_repo().create(new_user, config).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list().await
    }

    pub async fn delete_user(&self, id: i32) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    pub async fn set_password(
        &self,
        id: i32,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<()> {
        self.user_repo().set_password(id, new_password, config).await
    }

    pub async fn check_password(&self, id: i32, password: &str) -> Result<bool> {
        self.user_repo().check_password(id, password).await
    }

    pub async fn credential_fingerprint(&self, id: i32) -> Result<Option<String>> {
        self.user_repo().credential_fingerprint(id).await
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().authenticate(email, password).await
    }

    pub async fn set_api_token(&self, id: i32) -> Result<String> {
        self.user_repo().set_api_token(id).await
    }

    pub async fn check_api_token(&self, id: i32, token: &str) -> Result<bool> {
        self.user_repo().check_api_token(id, token).await
    }

    pub async fn find_user_by_api_token(&self, token: &str) -> Result<Option<User>> {
        self.user_repo().find_by_api_token(token).await
    }

    pub async fn set_verification_key(&self, id: i32) -> Result<String> {
        self.user_repo().set_verification_key(id).await
    }

    pub async fn check_verification_key(&self, id: i32, key: &str) -> Result<bool> {
        self.user_repo().check_verification_key(id, key).await
    }

    pub async fn user_roles(&self, id: i32) -> Result<Vec<UserRoleType>> {
        self.user_repo().roles(id).await
    }

    pub async fn grant_role(&self, id: i32, role: UserRoleType) -> Result<()> {
        self.user_repo().grant_role(id, role).await
    }

    pub async fn revoke_role(&self, id: i32, role: UserRoleType) -> Result<bool> {
        self.user_repo().revoke_role(id, role).await
    }

    pub async fn api_scope_validate(&self, token: &str, scope: UserRoleType) -> Result<bool> {
        self.user_repo().api_scope_validate(token, scope).await
    }

    // ========================================================================
    // Observatories, telescopes, instruments
    // ========================================================================

    pub async fn create_observatory(&self, input: &NewObservatory) -> Result<Observatory> {
        self.observatory_repo().create_observatory(input).await
    }

    pub async fn get_observatory(&self, id: i32) -> Result<Option<Observatory>> {
        self.observatory_repo().get_observatory(id).await
    }

    pub async fn list_observatories(&self) -> Result<Vec<Observatory>> {
        self.observatory_repo().list_observatories().await
    }

    pub async fn rename_observatory(&self, id: i32, name: &str) -> Result<Option<Observatory>> {
        self.observatory_repo().rename_observatory(id, name).await
    }

    pub async fn delete_observatory(&self, id: i32) -> Result<bool> {
        self.observatory_repo().delete_observatory(id).await
    }

    pub async fn observatory_tree(&self, id: i32) -> Result<Option<ObservatoryTree>> {
        self.observatory_repo().observatory_tree(id).await
    }

    pub async fn create_telescope(&self, input: &NewTelescope) -> Result<Telescope> {
        self.observatory_repo().create_telescope(input).await
    }

    pub async fn get_telescope(&self, id: i32) -> Result<Option<Telescope>> {
        self.observatory_repo().get_telescope(id).await
    }

    pub async fn list_telescopes(&self, observatory_id: i32) -> Result<Vec<Telescope>> {
        self.observatory_repo().list_telescopes(observatory_id).await
    }

    pub async fn delete_telescope(&self, id: i32) -> Result<bool> {
        self.observatory_repo().delete_telescope(id).await
    }

    pub async fn create_instrument(&self, input: &NewInstrument) -> Result<Instrument> {
        self.observatory_repo().create_instrument(input).await
    }

    pub async fn get_instrument(&self, id: i32) -> Result<Option<Instrument>> {
        self.observatory_repo().get_instrument(id).await
    }

    pub async fn list_instruments(&self, telescope_id: i32) -> Result<Vec<Instrument>> {
        self.observatory_repo().list_instruments(telescope_id).await
    }

    pub async fn delete_instrument(&self, id: i32) -> Result<bool> {
        self.observatory_repo().delete_instrument(id).await
    }

    // ========================================================================
    // Schedules and observations
    // ========================================================================

    pub async fn create_schedule(&self, input: &NewSchedule) -> Result<Schedule> {
        self.schedule_repo().create(input).await
    }

    pub async fn get_schedule(&self, id: i32) -> Result<Option<Schedule>> {
        self.schedule_repo().get(id).await
    }

    pub async fn list_schedules(&self, instrument_id: i32) -> Result<Vec<Schedule>> {
        self.schedule_repo().list_for_instrument(instrument_id).await
    }

    pub async fn update_schedule_status(
        &self,
        id: i32,
        status: ScheduleStatus,
    ) -> Result<Option<Schedule>> {
        self.schedule_repo().update_status(id, status).await
    }

    pub async fn delete_schedule(&self, id: i32) -> Result<bool> {
        self.schedule_repo().delete(id).await
    }

    pub async fn create_observation(&self, input: &NewObservation) -> Result<Observation> {
        self.observation_repo().create(input).await
    }

    pub async fn get_observation(&self, id: i32) -> Result<Option<Observation>> {
        self.observation_repo().get(id).await
    }

    pub async fn list_observations(&self, schedule_id: i32) -> Result<Vec<Observation>> {
        self.observation_repo().list_for_schedule(schedule_id).await
    }

    pub async fn update_observation_status(
        &self,
        id: i32,
        status: ObservationStatus,
    ) -> Result<Option<Observation>> {
        self.observation_repo().update_status(id, status).await
    }

    pub async fn set_observation_extension(
        &self,
        id: i32,
        extension: &ObservationExtension,
    ) -> Result<()> {
        self.observation_repo().set_extension(id, extension).await
    }

    pub async fn delete_observation(&self, id: i32) -> Result<bool> {
        self.observation_repo().delete(id).await
    }

    pub async fn observatory_for_observation(&self, id: i32) -> Result<Option<Observatory>> {
        self.observation_repo().observatory_for(id).await
    }

    // ========================================================================
    // Footprints
    // ========================================================================

    pub async fn create_footprint(&self) -> Result<Footprint> {
        self.footprint_repo().create().await
    }

    pub async fn get_footprint(&self, id: i32) -> Result<Option<Footprint>> {
        self.footprint_repo().get(id).await
    }

    pub async fn list_footprints(&self) -> Result<Vec<Footprint>> {
        self.footprint_repo().list().await
    }

    pub async fn delete_footprint(&self, id: i32) -> Result<bool> {
        self.footprint_repo().delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_url_detection() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite:file:test?mode=memory&cache=shared"));
        assert!(!is_memory_url("sqlite:data/across.db"));
        assert!(!is_memory_url("postgresql://u:p@localhost:5432/acrossdev"));
    }

    #[tokio::test]
    async fn test_in_memory_store_is_migrated() {
        let store = Store::in_memory().await.unwrap();
        store.ping().await.unwrap();
        assert!(store.list_observatories().await.unwrap().is_empty());
    }
}
