use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, ModelTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::{instruments, observatories, prelude::*, telescopes};
use crate::models::catalog::{
    Instrument, InstrumentTree, NewInstrument, NewObservatory, NewTelescope, Observatory,
    ObservatoryTree, Schedule, Telescope, TelescopeTree,
};

/// Observatories, telescopes and instruments: the physical asset hierarchy.
pub struct ObservatoryRepository {
    conn: DatabaseConnection,
}

impl ObservatoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create_observatory(&self, input: &NewObservatory) -> Result<Observatory> {
        let model = observatories::ActiveModel {
            datecreated: Set(chrono::Utc::now()),
            name: Set(input.name.clone()),
            observatory_type: Set(input.observatory_type),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert observatory")?;

        Ok(Observatory::from(model))
    }

    pub async fn get_observatory(&self, id: i32) -> Result<Option<Observatory>> {
        let model = Observatories::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query observatory")?;

        Ok(model.map(Observatory::from))
    }

    pub async fn list_observatories(&self) -> Result<Vec<Observatory>> {
        let models = Observatories::find()
            .order_by_asc(observatories::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list observatories")?;

        Ok(models.into_iter().map(Observatory::from).collect())
    }

    pub async fn rename_observatory(&self, id: i32, name: &str) -> Result<Option<Observatory>> {
        let Some(model) = Observatories::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: observatories::ActiveModel = model.into();
        active.name = Set(name.to_string());
        let updated = active.update(&self.conn).await?;

        Ok(Some(Observatory::from(updated)))
    }

    /// Cascades to telescopes, instruments, schedules and observations.
    pub async fn delete_observatory(&self, id: i32) -> Result<bool> {
        let result = Observatories::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn create_telescope(&self, input: &NewTelescope) -> Result<Telescope> {
        let model = telescopes::ActiveModel {
            datecreated: Set(chrono::Utc::now()),
            name: Set(input.name.clone()),
            observatory_id: Set(input.observatory_id),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert telescope")?;

        Ok(Telescope::from(model))
    }

    pub async fn get_telescope(&self, id: i32) -> Result<Option<Telescope>> {
        let model = Telescopes::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query telescope")?;

        Ok(model.map(Telescope::from))
    }

    pub async fn list_telescopes(&self, observatory_id: i32) -> Result<Vec<Telescope>> {
        let models = Telescopes::find()
            .filter(telescopes::Column::ObservatoryId.eq(observatory_id))
            .order_by_asc(telescopes::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list telescopes")?;

        Ok(models.into_iter().map(Telescope::from).collect())
    }

    pub async fn delete_telescope(&self, id: i32) -> Result<bool> {
        let result = Telescopes::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn create_instrument(&self, input: &NewInstrument) -> Result<Instrument> {
        let model = instruments::ActiveModel {
            datecreated: Set(chrono::Utc::now()),
            name: Set(input.name.clone()),
            telescope_id: Set(input.telescope_id),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert instrument")?;

        Ok(Instrument::from(model))
    }

    pub async fn get_instrument(&self, id: i32) -> Result<Option<Instrument>> {
        let model = Instruments::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query instrument")?;

        Ok(model.map(Instrument::from))
    }

    pub async fn list_instruments(&self, telescope_id: i32) -> Result<Vec<Instrument>> {
        let models = Instruments::find()
            .filter(instruments::Column::TelescopeId.eq(telescope_id))
            .order_by_asc(instruments::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list instruments")?;

        Ok(models.into_iter().map(Instrument::from).collect())
    }

    pub async fn delete_instrument(&self, id: i32) -> Result<bool> {
        let result = Instruments::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    /// Loads an observatory with its telescopes, instruments and schedules.
    pub async fn observatory_tree(&self, id: i32) -> Result<Option<ObservatoryTree>> {
        let Some(observatory) = Observatories::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let telescopes = observatory
            .find_related(Telescopes)
            .order_by_asc(telescopes::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to load telescopes")?;
        let instruments = telescopes.load_many(Instruments, &self.conn).await?;

        let mut telescope_trees = Vec::with_capacity(telescopes.len());
        for (telescope, instruments) in telescopes.into_iter().zip(instruments) {
            let schedules = instruments.load_many(Schedules, &self.conn).await?;

            let instrument_trees = instruments
                .into_iter()
                .zip(schedules)
                .map(|(instrument, schedules)| InstrumentTree {
                    instrument: Instrument::from(instrument),
                    schedules: schedules.into_iter().map(Schedule::from).collect(),
                })
                .collect();

            telescope_trees.push(TelescopeTree {
                telescope: Telescope::from(telescope),
                instruments: instrument_trees,
            });
        }

        Ok(Some(ObservatoryTree {
            observatory: Observatory::from(observatory),
            telescopes: telescope_trees,
        }))
    }
}
