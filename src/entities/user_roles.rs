use sea_orm::entity::prelude::*;

use crate::domain::UserRoleType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "userrole")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub datecreated: DateTimeUtc,
    #[sea_orm(unique)]
    pub name: UserRoleType,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_role_links::Entity")]
    UserLinks,
}

impl Related<super::user_role_links::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserLinks.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_role_links::Relation::User.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_role_links::Relation::Role.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
