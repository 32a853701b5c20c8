use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "telescope")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub datecreated: DateTimeUtc,
    pub name: String,
    pub observatory_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::observatories::Entity",
        from = "Column::ObservatoryId",
        to = "super::observatories::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Observatory,
    #[sea_orm(has_many = "super::instruments::Entity")]
    Instruments,
}

impl Related<super::observatories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Observatory.def()
    }
}

impl Related<super::instruments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Instruments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
