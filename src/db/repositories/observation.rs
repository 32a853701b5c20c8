use anyhow::{Context, Result};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    LoaderTrait, ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::{GeoPoint, ObservationStatus};
use crate::entities::{
    observations, photometric_observations, prelude::*, spectroscopic_observations,
};
use crate::models::catalog::{
    NewObservation, Observation, ObservationExtension, Observatory, PhotometricDetails,
    SpectroscopicDetails,
};

pub struct ObservationRepository {
    conn: DatabaseConnection,
}

impl ObservationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts the observation and its extension record in one transaction.
    /// Points are written in a second statement so Postgres can convert them
    /// into geography.
    pub async fn create(&self, input: &NewObservation) -> Result<Observation> {
        let txn = self.conn.begin().await?;

        let mut model = observations::ActiveModel {
            datecreated: Set(chrono::Utc::now()),
            object_name: Set(input.object_name.clone()),
            object_position: NotSet,
            object_observation_reason: Set(input.object_observation_reason.clone()),
            proposal_reference: Set(input.proposal_reference.clone()),
            pointed_position: NotSet,
            obstime_start: Set(input.obstime_start),
            obstime_end: Set(input.obstime_end),
            exposure_time: Set(input.exposure_time),
            observation_status: Set(input.observation_status),
            observation_type: Set(input.observation_type),
            schedule_id: Set(input.schedule_id),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to insert observation")?;

        if input.object_position.is_some() || input.pointed_position.is_some() {
            write_points(&txn, model.id, input.object_position, input.pointed_position).await?;
            model.object_position = input.object_position.map(|p| p.to_ewkt());
            model.pointed_position = input.pointed_position.map(|p| p.to_ewkt());
        }

        if let Some(extension) = &input.extension {
            insert_extension(&txn, model.id, extension).await?;
        }

        txn.commit().await?;

        Ok(Observation::from_parts(model, input.extension.clone()))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Observation>> {
        let Some(model) = Observations::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query observation")?
        else {
            return Ok(None);
        };

        let photometric = model.find_related(PhotometricObservations).one(&self.conn).await?;
        let spectroscopic = model
            .find_related(SpectroscopicObservations)
            .one(&self.conn)
            .await?;

        Ok(Some(Observation::from_parts(
            model,
            extension_from(photometric, spectroscopic),
        )))
    }

    pub async fn list_for_schedule(&self, schedule_id: i32) -> Result<Vec<Observation>> {
        let models = Observations::find()
            .filter(observations::Column::ScheduleId.eq(schedule_id))
            .order_by_asc(observations::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list observations")?;

        let photometric = models.load_one(PhotometricObservations, &self.conn).await?;
        let spectroscopic = models.load_one(SpectroscopicObservations, &self.conn).await?;

        Ok(models
            .into_iter()
            .zip(photometric)
            .zip(spectroscopic)
            .map(|((model, p), s)| Observation::from_parts(model, extension_from(p, s)))
            .collect())
    }

    pub async fn update_status(
        &self,
        id: i32,
        status: ObservationStatus,
    ) -> Result<Option<Observation>> {
        let Some(model) = Observations::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: observations::ActiveModel = model.into();
        active.observation_status = Set(status);
        active.update(&self.conn).await?;

        self.get(id).await
    }

    /// Replaces whatever extension record the observation currently has.
    pub async fn set_extension(&self, id: i32, extension: &ObservationExtension) -> Result<()> {
        let txn = self.conn.begin().await?;

        PhotometricObservations::delete_many()
            .filter(photometric_observations::Column::ObservationId.eq(id))
            .exec(&txn)
            .await?;
        SpectroscopicObservations::delete_many()
            .filter(spectroscopic_observations::Column::ObservationId.eq(id))
            .exec(&txn)
            .await?;

        insert_extension(&txn, id, extension).await?;

        txn.commit().await?;
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Observations::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    /// Walks observation -> schedule -> instrument -> telescope -> observatory.
    pub async fn observatory_for(&self, id: i32) -> Result<Option<Observatory>> {
        let Some(observation) = Observations::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let schedule = observation
            .find_related(Schedules)
            .one(&self.conn)
            .await?
            .context("Observation has no schedule")?;
        let instrument = schedule
            .find_related(Instruments)
            .one(&self.conn)
            .await?
            .context("Schedule has no instrument")?;
        let telescope = instrument
            .find_related(Telescopes)
            .one(&self.conn)
            .await?
            .context("Instrument has no telescope")?;
        let observatory = telescope
            .find_related(Observatories)
            .one(&self.conn)
            .await?
            .context("Telescope has no observatory")?;

        Ok(Some(Observatory::from(observatory)))
    }
}

async fn insert_extension<C: ConnectionTrait>(
    conn: &C,
    observation_id: i32,
    extension: &ObservationExtension,
) -> Result<()> {
    match extension {
        ObservationExtension::Photometric(details) => {
            photometric_observations::ActiveModel {
                observation_id: Set(observation_id),
                depth: Set(details.depth),
                depth_error: Set(details.depth_error),
                depth_unit: Set(details.depth_unit),
                position_angle: Set(details.position_angle),
                central_wavelength: Set(details.central_wavelength),
                bandwidth: Set(details.bandwidth),
                filter_name: Set(details.filter_name.clone()),
                other_information: Set(details.other_information.clone()),
                ..Default::default()
            }
            .insert(conn)
            .await
            .context("Failed to insert photometric observation")?;
        }
        ObservationExtension::Spectroscopic(details) => {
            spectroscopic_observations::ActiveModel {
                observation_id: Set(observation_id),
                other_information: Set(details.other_information.clone()),
                ..Default::default()
            }
            .insert(conn)
            .await
            .context("Failed to insert spectroscopic observation")?;
        }
    }

    Ok(())
}

async fn write_points<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    object_position: Option<GeoPoint>,
    pointed_position: Option<GeoPoint>,
) -> Result<()> {
    let backend = conn.get_database_backend();

    Observations::update_many()
        .col_expr(
            observations::Column::ObjectPosition,
            point_expr(backend, object_position),
        )
        .col_expr(
            observations::Column::PointedPosition,
            point_expr(backend, pointed_position),
        )
        .filter(observations::Column::Id.eq(id))
        .exec(conn)
        .await
        .context("Failed to store observation positions")?;

    Ok(())
}

/// Geography on Postgres, plain EWKT text elsewhere.
fn point_expr(backend: DbBackend, point: Option<GeoPoint>) -> SimpleExpr {
    match (backend, point) {
        (_, None) => Expr::val(Option::<String>::None).into(),
        (DbBackend::Postgres, Some(point)) => {
            Expr::cust_with_values("ST_GeogFromText(?)", [point.to_ewkt()])
        }
        (_, Some(point)) => Expr::val(point.to_ewkt()).into(),
    }
}

fn extension_from(
    photometric: Option<photometric_observations::Model>,
    spectroscopic: Option<spectroscopic_observations::Model>,
) -> Option<ObservationExtension> {
    photometric
        .map(|p| ObservationExtension::Photometric(PhotometricDetails::from(p)))
        .or_else(|| {
            spectroscopic.map(|s| ObservationExtension::Spectroscopic(SpectroscopicDetails::from(s)))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::QueryTrait;

    fn render(backend: DbBackend, point: Option<GeoPoint>) -> String {
        Observations::update_many()
            .col_expr(
                observations::Column::ObjectPosition,
                point_expr(backend, point),
            )
            .filter(observations::Column::Id.eq(1))
            .build(backend)
            .to_string()
    }

    #[test]
    fn test_points_become_geography_on_postgres() {
        let point = GeoPoint::new(1.0, 2.0).ok();

        let sql = render(DbBackend::Postgres, point);
        assert!(
            sql.contains("ST_GeogFromText('SRID=4326;POINT(1 2)')"),
            "{sql}"
        );

        let sql = render(DbBackend::Sqlite, point);
        assert!(sql.contains("'SRID=4326;POINT(1 2)'"), "{sql}");
        assert!(!sql.contains("ST_GeogFromText"), "{sql}");
    }

    #[test]
    fn test_missing_point_is_null() {
        let sql = render(DbBackend::Postgres, None);
        assert!(sql.contains("= NULL"), "{sql}");
    }
}
