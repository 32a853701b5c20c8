use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{
    DepthUnit, GeoPoint, ObservationStatus, ObservationType, ObservatoryType, ScheduleStatus,
    ScheduleType,
};
use crate::entities::{
    footprints, instruments, observations, observatories, photometric_observations, schedules,
    spectroscopic_observations, telescopes,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observatory {
    pub id: i32,
    pub name: String,
    pub observatory_type: ObservatoryType,
    pub datecreated: DateTime<Utc>,
}

impl From<observatories::Model> for Observatory {
    fn from(model: observatories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            observatory_type: model.observatory_type,
            datecreated: model.datecreated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Telescope {
    pub id: i32,
    pub name: String,
    pub observatory_id: i32,
    pub datecreated: DateTime<Utc>,
}

impl From<telescopes::Model> for Telescope {
    fn from(model: telescopes::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            observatory_id: model.observatory_id,
            datecreated: model.datecreated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instrument {
    pub id: i32,
    pub name: String,
    pub telescope_id: i32,
    pub datecreated: DateTime<Utc>,
}

impl From<instruments::Model> for Instrument {
    fn from(model: instruments::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            telescope_id: model.telescope_id,
            datecreated: model.datecreated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    pub id: i32,
    pub name: String,
    pub schedule_status: ScheduleStatus,
    pub schedule_type: ScheduleType,
    pub instrument_id: i32,
    pub datecreated: DateTime<Utc>,
}

impl From<schedules::Model> for Schedule {
    fn from(model: schedules::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            schedule_status: model.schedule_status,
            schedule_type: model.schedule_type,
            instrument_id: model.instrument_id,
            datecreated: model.datecreated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotometricDetails {
    pub depth: Option<f64>,
    pub depth_error: Option<f64>,
    pub depth_unit: Option<DepthUnit>,
    pub position_angle: Option<f64>,
    pub central_wavelength: Option<f64>,
    pub bandwidth: Option<f64>,
    pub filter_name: Option<String>,
    pub other_information: Option<serde_json::Value>,
}

impl From<photometric_observations::Model> for PhotometricDetails {
    fn from(model: photometric_observations::Model) -> Self {
        Self {
            depth: model.depth,
            depth_error: model.depth_error,
            depth_unit: model.depth_unit,
            position_angle: model.position_angle,
            central_wavelength: model.central_wavelength,
            bandwidth: model.bandwidth,
            filter_name: model.filter_name,
            other_information: model.other_information,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectroscopicDetails {
    pub other_information: Option<serde_json::Value>,
}

impl From<spectroscopic_observations::Model> for SpectroscopicDetails {
    fn from(model: spectroscopic_observations::Model) -> Self {
        Self {
            other_information: model.other_information,
        }
    }
}

/// Modality-specific record attached one-to-one to an observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObservationExtension {
    Photometric(PhotometricDetails),
    Spectroscopic(SpectroscopicDetails),
}

impl ObservationExtension {
    #[must_use]
    pub const fn observation_type(&self) -> ObservationType {
        match self {
            Self::Photometric(_) => ObservationType::Photometric,
            Self::Spectroscopic(_) => ObservationType::Spectroscopic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub id: i32,
    pub schedule_id: i32,
    pub object_name: String,
    pub object_position: Option<GeoPoint>,
    pub object_observation_reason: Option<String>,
    pub proposal_reference: Option<String>,
    pub pointed_position: Option<GeoPoint>,
    pub obstime_start: Option<DateTime<Utc>>,
    pub obstime_end: Option<DateTime<Utc>>,
    pub exposure_time: Option<f64>,
    pub observation_status: ObservationStatus,
    pub observation_type: ObservationType,
    pub extension: Option<ObservationExtension>,
    pub datecreated: DateTime<Utc>,
}

impl Observation {
    pub(crate) fn from_parts(
        model: observations::Model,
        extension: Option<ObservationExtension>,
    ) -> Self {
        Self {
            id: model.id,
            schedule_id: model.schedule_id,
            object_name: model.object_name,
            object_position: stored_point(model.id, "object_position", model.object_position),
            object_observation_reason: model.object_observation_reason,
            proposal_reference: model.proposal_reference,
            pointed_position: stored_point(model.id, "pointed_position", model.pointed_position),
            obstime_start: model.obstime_start,
            obstime_end: model.obstime_end,
            exposure_time: model.exposure_time,
            observation_status: model.observation_status,
            observation_type: model.observation_type,
            extension,
            datecreated: model.datecreated,
        }
    }
}

/// Unreadable stored points are logged and surface as absent.
fn stored_point(observation_id: i32, column: &str, raw: Option<String>) -> Option<GeoPoint> {
    let raw = raw?;
    match GeoPoint::parse_stored(&raw) {
        Ok(point) => Some(point),
        Err(e) => {
            warn!(
                observation_id,
                column,
                value = %raw,
                error = %e,
                "Ignoring unreadable stored position"
            );
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Footprint {
    pub id: i32,
    pub datecreated: DateTime<Utc>,
}

impl From<footprints::Model> for Footprint {
    fn from(model: footprints::Model) -> Self {
        Self {
            id: model.id,
            datecreated: model.datecreated,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewObservatory {
    pub name: String,
    pub observatory_type: ObservatoryType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTelescope {
    pub name: String,
    pub observatory_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewInstrument {
    pub name: String,
    pub telescope_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSchedule {
    pub name: String,
    pub instrument_id: i32,
    #[serde(default = "default_schedule_status")]
    pub schedule_status: ScheduleStatus,
    pub schedule_type: ScheduleType,
}

const fn default_schedule_status() -> ScheduleStatus {
    ScheduleStatus::Planned
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewObservation {
    pub schedule_id: i32,
    pub object_name: String,
    #[serde(default)]
    pub object_position: Option<GeoPoint>,
    #[serde(default)]
    pub object_observation_reason: Option<String>,
    #[serde(default)]
    pub proposal_reference: Option<String>,
    #[serde(default)]
    pub pointed_position: Option<GeoPoint>,
    #[serde(default)]
    pub obstime_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub obstime_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub exposure_time: Option<f64>,
    #[serde(default = "default_observation_status")]
    pub observation_status: ObservationStatus,
    pub observation_type: ObservationType,
    #[serde(default)]
    pub extension: Option<ObservationExtension>,
}

const fn default_observation_status() -> ObservationStatus {
    ObservationStatus::Planned
}

/// Nested view of one observatory and everything beneath it.
#[derive(Debug, Clone, Serialize)]
pub struct ObservatoryTree {
    #[serde(flatten)]
    pub observatory: Observatory,
    pub telescopes: Vec<TelescopeTree>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TelescopeTree {
    #[serde(flatten)]
    pub telescope: Telescope,
    pub instruments: Vec<InstrumentTree>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstrumentTree {
    #[serde(flatten)]
    pub instrument: Instrument,
    pub schedules: Vec<Schedule>,
}
