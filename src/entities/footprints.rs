use sea_orm::entity::prelude::*;

/// Placeholder for observation footprints; only the creation time is tracked.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "footprint")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub datecreated: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
