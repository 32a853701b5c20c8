//! `SeaORM` implementation of the `CatalogService` trait.

use async_trait::async_trait;

use crate::db::Store;
use crate::domain::{ObservationStatus, ScheduleStatus};
use crate::models::catalog::{
    Footprint, Instrument, NewInstrument, NewObservation, NewObservatory, NewSchedule,
    NewTelescope, Observation, ObservationExtension, Observatory, ObservatoryTree, Schedule,
    Telescope,
};
use crate::services::catalog_service::{CatalogError, CatalogService};

const MAX_NAME_LEN: usize = 255;

pub struct SeaOrmCatalogService {
    store: Store,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn require_observatory(&self, id: i32) -> Result<Observatory, CatalogError> {
        self.store
            .get_observatory(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Observatory", id))
    }

    async fn require_telescope(&self, id: i32) -> Result<Telescope, CatalogError> {
        self.store
            .get_telescope(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Telescope", id))
    }

    async fn require_instrument(&self, id: i32) -> Result<Instrument, CatalogError> {
        self.store
            .get_instrument(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Instrument", id))
    }

    async fn require_schedule(&self, id: i32) -> Result<Schedule, CatalogError> {
        self.store
            .get_schedule(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Schedule", id))
    }

    async fn require_observation(&self, id: i32) -> Result<Observation, CatalogError> {
        self.store
            .get_observation(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Observation", id))
    }
}

fn validate_name(kind: &str, name: &str) -> Result<String, CatalogError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::Validation(format!(
            "{kind} name cannot be empty"
        )));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(CatalogError::Validation(format!(
            "{kind} name must be {MAX_NAME_LEN} characters or less"
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_observation(input: &NewObservation) -> Result<(), CatalogError> {
    if let (Some(start), Some(end)) = (input.obstime_start, input.obstime_end) {
        if end < start {
            return Err(CatalogError::Validation(
                "obstime_end must not precede obstime_start".to_string(),
            ));
        }
    }

    if let Some(exposure) = input.exposure_time {
        if !(exposure.is_finite() && exposure >= 0.0) {
            return Err(CatalogError::Validation(format!(
                "exposure_time must be a non-negative number of seconds, got {exposure}"
            )));
        }
    }

    if let Some(extension) = &input.extension {
        validate_extension(input.observation_type, extension)?;
    }

    Ok(())
}

fn validate_extension(
    observation_type: crate::domain::ObservationType,
    extension: &ObservationExtension,
) -> Result<(), CatalogError> {
    if extension.observation_type() != observation_type {
        return Err(CatalogError::Validation(format!(
            "{} details cannot be attached to a {} observation",
            extension.observation_type(),
            observation_type
        )));
    }
    Ok(())
}

fn deleted(kind: &'static str, id: i32, removed: bool) -> Result<(), CatalogError> {
    if removed {
        Ok(())
    } else {
        Err(CatalogError::not_found(kind, id))
    }
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn create_observatory(
        &self,
        mut input: NewObservatory,
    ) -> Result<Observatory, CatalogError> {
        input.name = validate_name("Observatory", &input.name)?;
        Ok(self.store.create_observatory(&input).await?)
    }

    async fn get_observatory(&self, id: i32) -> Result<Observatory, CatalogError> {
        self.require_observatory(id).await
    }

    async fn list_observatories(&self) -> Result<Vec<Observatory>, CatalogError> {
        Ok(self.store.list_observatories().await?)
    }

    async fn rename_observatory(&self, id: i32, name: &str) -> Result<Observatory, CatalogError> {
        let name = validate_name("Observatory", name)?;
        self.store
            .rename_observatory(id, &name)
            .await?
            .ok_or_else(|| CatalogError::not_found("Observatory", id))
    }

    async fn delete_observatory(&self, id: i32) -> Result<(), CatalogError> {
        let removed = self.store.delete_observatory(id).await?;
        deleted("Observatory", id, removed)
    }

    async fn observatory_tree(&self, id: i32) -> Result<ObservatoryTree, CatalogError> {
        self.store
            .observatory_tree(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Observatory", id))
    }

    async fn create_telescope(&self, mut input: NewTelescope) -> Result<Telescope, CatalogError> {
        input.name = validate_name("Telescope", &input.name)?;
        self.require_observatory(input.observatory_id).await?;
        Ok(self.store.create_telescope(&input).await?)
    }

    async fn get_telescope(&self, id: i32) -> Result<Telescope, CatalogError> {
        self.require_telescope(id).await
    }

    async fn list_telescopes(&self, observatory_id: i32) -> Result<Vec<Telescope>, CatalogError> {
        self.require_observatory(observatory_id).await?;
        Ok(self.store.list_telescopes(observatory_id).await?)
    }

    async fn delete_telescope(&self, id: i32) -> Result<(), CatalogError> {
        let removed = self.store.delete_telescope(id).await?;
        deleted("Telescope", id, removed)
    }

    async fn create_instrument(
        &self,
        mut input: NewInstrument,
    ) -> Result<Instrument, CatalogError> {
        input.name = validate_name("Instrument", &input.name)?;
        self.require_telescope(input.telescope_id).await?;
        Ok(self.store.create_instrument(&input).await?)
    }

    async fn get_instrument(&self, id: i32) -> Result<Instrument, CatalogError> {
        self.require_instrument(id).await
    }

    async fn list_instruments(&self, telescope_id: i32) -> Result<Vec<Instrument>, CatalogError> {
        self.require_telescope(telescope_id).await?;
        Ok(self.store.list_instruments(telescope_id).await?)
    }

    async fn delete_instrument(&self, id: i32) -> Result<(), CatalogError> {
        let removed = self.store.delete_instrument(id).await?;
        deleted("Instrument", id, removed)
    }

    async fn create_schedule(&self, mut input: NewSchedule) -> Result<Schedule, CatalogError> {
        input.name = validate_name("Schedule", &input.name)?;
        self.require_instrument(input.instrument_id).await?;
        Ok(self.store.create_schedule(&input).await?)
    }

    async fn get_schedule(&self, id: i32) -> Result<Schedule, CatalogError> {
        self.require_schedule(id).await
    }

    async fn list_schedules(&self, instrument_id: i32) -> Result<Vec<Schedule>, CatalogError> {
        self.require_instrument(instrument_id).await?;
        Ok(self.store.list_schedules(instrument_id).await?)
    }

    async fn update_schedule_status(
        &self,
        id: i32,
        status: ScheduleStatus,
    ) -> Result<Schedule, CatalogError> {
        self.store
            .update_schedule_status(id, status)
            .await?
            .ok_or_else(|| CatalogError::not_found("Schedule", id))
    }

    async fn delete_schedule(&self, id: i32) -> Result<(), CatalogError> {
        let removed = self.store.delete_schedule(id).await?;
        deleted("Schedule", id, removed)
    }

    async fn create_observation(
        &self,
        mut input: NewObservation,
    ) -> Result<Observation, CatalogError> {
        input.object_name = validate_name("Object", &input.object_name)?;
        validate_observation(&input)?;
        self.require_schedule(input.schedule_id).await?;
        Ok(self.store.create_observation(&input).await?)
    }

    async fn get_observation(&self, id: i32) -> Result<Observation, CatalogError> {
        self.require_observation(id).await
    }

    async fn list_observations(&self, schedule_id: i32) -> Result<Vec<Observation>, CatalogError> {
        self.require_schedule(schedule_id).await?;
        Ok(self.store.list_observations(schedule_id).await?)
    }

    async fn update_observation_status(
        &self,
        id: i32,
        status: ObservationStatus,
    ) -> Result<Observation, CatalogError> {
        self.store
            .update_observation_status(id, status)
            .await?
            .ok_or_else(|| CatalogError::not_found("Observation", id))
    }

    async fn set_observation_extension(
        &self,
        id: i32,
        extension: ObservationExtension,
    ) -> Result<Observation, CatalogError> {
        let observation = self.require_observation(id).await?;
        validate_extension(observation.observation_type, &extension)?;

        self.store.set_observation_extension(id, &extension).await?;
        self.require_observation(id).await
    }

    async fn delete_observation(&self, id: i32) -> Result<(), CatalogError> {
        let removed = self.store.delete_observation(id).await?;
        deleted("Observation", id, removed)
    }

    async fn observatory_for_observation(&self, id: i32) -> Result<Observatory, CatalogError> {
        self.store
            .observatory_for_observation(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Observation", id))
    }

    async fn create_footprint(&self) -> Result<Footprint, CatalogError> {
        Ok(self.store.create_footprint().await?)
    }

    async fn get_footprint(&self, id: i32) -> Result<Footprint, CatalogError> {
        self.store
            .get_footprint(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Footprint", id))
    }

    async fn list_footprints(&self) -> Result<Vec<Footprint>, CatalogError> {
        Ok(self.store.list_footprints().await?)
    }

    async fn delete_footprint(&self, id: i32) -> Result<(), CatalogError> {
        let removed = self.store.delete_footprint(id).await?;
        deleted("Footprint", id, removed)
    }
}
