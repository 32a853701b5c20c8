use sea_orm::entity::prelude::*;

use crate::domain::{ScheduleStatus, ScheduleType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "schedule")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub datecreated: DateTimeUtc,
    pub name: String,
    pub schedule_status: ScheduleStatus,
    pub schedule_type: ScheduleType,
    pub instrument_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::instruments::Entity",
        from = "Column::InstrumentId",
        to = "super::instruments::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Instrument,
    #[sea_orm(has_many = "super::observations::Entity")]
    Observations,
}

impl Related<super::instruments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Instrument.def()
    }
}

impl Related<super::observations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Observations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
