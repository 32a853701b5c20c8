//! Domain value types shared by the schema, services and API.

pub mod position;
pub mod vocabulary;

pub use position::{GeoPoint, PositionError, SRID_WGS84};
pub use vocabulary::{
    DepthUnit, EnergyUnit, FrequencyUnit, MissionType, ObservationStatus, ObservationType,
    ObservatoryType, ScheduleStatus, ScheduleType, UnitFamily, UserRoleType, Vocabulary,
    VocabularyError, WavelengthUnit,
};
