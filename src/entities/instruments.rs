use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "instrument")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub datecreated: DateTimeUtc,
    pub name: String,
    pub telescope_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::telescopes::Entity",
        from = "Column::TelescopeId",
        to = "super::telescopes::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Telescope,
    #[sea_orm(has_many = "super::schedules::Entity")]
    Schedules,
}

impl Related<super::telescopes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Telescope.def()
    }
}

impl Related<super::schedules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
