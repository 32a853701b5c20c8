use sea_orm::entity::prelude::*;

use crate::domain::{ObservationStatus, ObservationType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "observation")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub datecreated: DateTimeUtc,
    pub object_name: String,
    /// `geography(Point, 4326)` on Postgres, EWKT text elsewhere. Selected as
    /// text, which Postgres renders as hex EWKB.
    #[sea_orm(select_as = "text")]
    pub object_position: Option<String>,
    pub object_observation_reason: Option<String>,
    pub proposal_reference: Option<String>,
    #[sea_orm(select_as = "text")]
    pub pointed_position: Option<String>,
    pub obstime_start: Option<DateTimeUtc>,
    pub obstime_end: Option<DateTimeUtc>,
    /// Seconds
    pub exposure_time: Option<f64>,
    pub observation_status: ObservationStatus,
    pub observation_type: ObservationType,
    pub schedule_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schedules::Entity",
        from = "Column::ScheduleId",
        to = "super::schedules::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Schedule,
    #[sea_orm(has_one = "super::photometric_observations::Entity")]
    PhotometricObservation,
    #[sea_orm(has_one = "super::spectroscopic_observations::Entity")]
    SpectroscopicObservation,
}

impl Related<super::schedules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedule.def()
    }
}

impl Related<super::photometric_observations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PhotometricObservation.def()
    }
}

impl Related<super::spectroscopic_observations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SpectroscopicObservation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
