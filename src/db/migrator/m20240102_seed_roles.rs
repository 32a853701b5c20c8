use crate::domain::{UserRoleType, Vocabulary};
use crate::entities::{prelude::*, user_roles};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{EntityTrait, Set};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        let now = chrono::Utc::now();

        // Inserted through the entity so Postgres receives a typed enum value.
        let roles: Vec<user_roles::ActiveModel> = UserRoleType::ALL
            .iter()
            .map(|role| user_roles::ActiveModel {
                datecreated: Set(now),
                name: Set(*role),
                ..Default::default()
            })
            .collect();

        UserRoles::insert_many(roles).exec(conn).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        UserRoles::delete_many().exec(conn).await?;

        Ok(())
    }
}
