use crate::domain::{
    DepthUnit, ObservationStatus, ObservationType, ObservatoryType, ScheduleStatus, ScheduleType,
    UserRoleType, Vocabulary,
};
use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ActiveEnum, ConnectionTrait, DbBackend, Schema};
use sea_orm_migration::sea_query::extension::postgres::Type;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Named enum types only exist on Postgres; other backends store the
/// member name as text.
async fn create_enum_type<A: ActiveEnum>(
    manager: &SchemaManager<'_>,
    schema: &Schema,
) -> Result<(), DbErr> {
    manager
        .create_type(schema.create_enum_from_active_enum::<A>())
        .await
}

async fn drop_enum_type<V: Vocabulary>(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    manager
        .drop_type(
            Type::drop()
                .if_exists()
                .name(Alias::new(V::KIND))
                .to_owned(),
        )
        .await
}

/// Point columns of `observation`, entity-typed as EWKT text.
const POINT_COLUMNS: &[&str] = &["object_position", "pointed_position"];

/// On Postgres the point columns become PostGIS geography with a GiST index;
/// the table is empty here so the text-to-geography cast cannot fail.
async fn use_geography_points(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    let conn = manager.get_connection();
    conn.execute_unprepared("CREATE EXTENSION IF NOT EXISTS postgis")
        .await?;

    for column in POINT_COLUMNS {
        conn.execute_unprepared(&format!(
            "ALTER TABLE observation ALTER COLUMN {column} \
             TYPE geography(Point, 4326) USING ST_GeogFromText({column})"
        ))
        .await?;
        conn.execute_unprepared(&format!(
            "CREATE INDEX IF NOT EXISTS idx_observation_{column} \
             ON observation USING GIST ({column})"
        ))
        .await?;
    }

    Ok(())
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        if backend == DbBackend::Postgres {
            create_enum_type::<ObservatoryType>(manager, &schema).await?;
            create_enum_type::<ScheduleStatus>(manager, &schema).await?;
            create_enum_type::<ScheduleType>(manager, &schema).await?;
            create_enum_type::<ObservationStatus>(manager, &schema).await?;
            create_enum_type::<ObservationType>(manager, &schema).await?;
            create_enum_type::<DepthUnit>(manager, &schema).await?;
            create_enum_type::<UserRoleType>(manager, &schema).await?;
        }

        // Parents before children so every foreign key resolves.
        manager
            .create_table(
                schema
                    .create_table_from_entity(Observatories)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Telescopes)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Instruments)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Schedules)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Observations)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        if backend == DbBackend::Postgres {
            use_geography_points(manager).await?;
        }

        manager
            .create_table(
                schema
                    .create_table_from_entity(PhotometricObservations)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(SpectroscopicObservations)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Footprints)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(UserRoles)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(UserRoleLinks)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserRoleLinks).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserRoles).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Footprints).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(SpectroscopicObservations)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(PhotometricObservations)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Observations).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Schedules).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Instruments).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Telescopes).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Observatories).if_exists().to_owned())
            .await?;

        if manager.get_database_backend() == DbBackend::Postgres {
            drop_enum_type::<UserRoleType>(manager).await?;
            drop_enum_type::<DepthUnit>(manager).await?;
            drop_enum_type::<ObservationType>(manager).await?;
            drop_enum_type::<ObservationStatus>(manager).await?;
            drop_enum_type::<ScheduleType>(manager).await?;
            drop_enum_type::<ScheduleStatus>(manager).await?;
            drop_enum_type::<ObservatoryType>(manager).await?;
        }

        Ok(())
    }
}
