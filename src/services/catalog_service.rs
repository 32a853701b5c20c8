//! Domain service for the observing catalog.
//!
//! Observatories own telescopes, telescopes own instruments, instruments
//! own schedules, and schedules own observations.

use thiserror::Error;

use crate::domain::{ObservationStatus, ScheduleStatus};
use crate::models::catalog::{
    Footprint, Instrument, NewInstrument, NewObservation, NewObservatory, NewSchedule,
    NewTelescope, Observation, ObservationExtension, Observatory, ObservatoryTree, Schedule,
    Telescope,
};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: i32 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    #[must_use]
    pub const fn not_found(kind: &'static str, id: i32) -> Self {
        Self::NotFound { kind, id }
    }
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    async fn create_observatory(&self, input: NewObservatory) -> Result<Observatory, CatalogError>;

    async fn get_observatory(&self, id: i32) -> Result<Observatory, CatalogError>;

    async fn list_observatories(&self) -> Result<Vec<Observatory>, CatalogError>;

    async fn rename_observatory(&self, id: i32, name: &str) -> Result<Observatory, CatalogError>;

    /// Removes the observatory and, through cascading keys, everything under it.
    async fn delete_observatory(&self, id: i32) -> Result<(), CatalogError>;

    async fn observatory_tree(&self, id: i32) -> Result<ObservatoryTree, CatalogError>;

    async fn create_telescope(&self, input: NewTelescope) -> Result<Telescope, CatalogError>;

    async fn get_telescope(&self, id: i32) -> Result<Telescope, CatalogError>;

    async fn list_telescopes(&self, observatory_id: i32) -> Result<Vec<Telescope>, CatalogError>;

    async fn delete_telescope(&self, id: i32) -> Result<(), CatalogError>;

    async fn create_instrument(&self, input: NewInstrument) -> Result<Instrument, CatalogError>;

    async fn get_instrument(&self, id: i32) -> Result<Instrument, CatalogError>;

    async fn list_instruments(&self, telescope_id: i32) -> Result<Vec<Instrument>, CatalogError>;

    async fn delete_instrument(&self, id: i32) -> Result<(), CatalogError>;

    async fn create_schedule(&self, input: NewSchedule) -> Result<Schedule, CatalogError>;

    async fn get_schedule(&self, id: i32) -> Result<Schedule, CatalogError>;

    async fn list_schedules(&self, instrument_id: i32) -> Result<Vec<Schedule>, CatalogError>;

    async fn update_schedule_status(
        &self,
        id: i32,
        status: ScheduleStatus,
    ) -> Result<Schedule, CatalogError>;

    async fn delete_schedule(&self, id: i32) -> Result<(), CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] when the extension does not
    /// match `observation_type` or the time window is inverted.
    async fn create_observation(&self, input: NewObservation) -> Result<Observation, CatalogError>;

    async fn get_observation(&self, id: i32) -> Result<Observation, CatalogError>;

    async fn list_observations(&self, schedule_id: i32) -> Result<Vec<Observation>, CatalogError>;

    async fn update_observation_status(
        &self,
        id: i32,
        status: ObservationStatus,
    ) -> Result<Observation, CatalogError>;

    async fn set_observation_extension(
        &self,
        id: i32,
        extension: ObservationExtension,
    ) -> Result<Observation, CatalogError>;

    async fn delete_observation(&self, id: i32) -> Result<(), CatalogError>;

    async fn observatory_for_observation(&self, id: i32) -> Result<Observatory, CatalogError>;

    async fn create_footprint(&self) -> Result<Footprint, CatalogError>;

    async fn get_footprint(&self, id: i32) -> Result<Footprint, CatalogError>;

    async fn list_footprints(&self) -> Result<Vec<Footprint>, CatalogError>;

    async fn delete_footprint(&self, id: i32) -> Result<(), CatalogError>;
}
