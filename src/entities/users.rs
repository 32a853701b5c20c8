use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub datecreated: DateTimeUtc,

    #[sea_orm(column_type = "String(StringLen::N(25))")]
    pub firstname: String,

    #[sea_orm(column_type = "String(StringLen::N(25))")]
    pub lastname: String,

    #[sea_orm(column_type = "String(StringLen::N(100))", unique)]
    pub email: String,

    /// Argon2id PHC string
    #[sea_orm(column_type = "String(StringLen::N(128))")]
    pub password_hash: String,

    #[sea_orm(column_type = "String(StringLen::N(128))", nullable, unique)]
    pub api_token: Option<String>,

    #[sea_orm(column_type = "String(StringLen::N(128))", nullable)]
    pub verification_key: Option<String>,

    pub verified: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_role_links::Entity")]
    RoleLinks,
}

impl Related<super::user_role_links::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoleLinks.def()
    }
}

impl Related<super::user_roles::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_role_links::Relation::Role.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_role_links::Relation::User.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
