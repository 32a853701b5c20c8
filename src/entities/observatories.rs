use sea_orm::entity::prelude::*;

use crate::domain::ObservatoryType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "observatory")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub datecreated: DateTimeUtc,
    pub name: String,
    pub observatory_type: ObservatoryType,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::telescopes::Entity")]
    Telescopes,
}

impl Related<super::telescopes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Telescopes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
