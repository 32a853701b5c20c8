use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::entities::{footprints, prelude::*};
use crate::models::catalog::Footprint;

pub struct FootprintRepository {
    conn: DatabaseConnection,
}

impl FootprintRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self) -> Result<Footprint> {
        let model = footprints::ActiveModel {
            datecreated: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert footprint")?;

        Ok(Footprint::from(model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Footprint>> {
        let model = Footprints::find_by_id(id).one(&self.conn).await?;
        Ok(model.map(Footprint::from))
    }

    pub async fn list(&self) -> Result<Vec<Footprint>> {
        let models = Footprints::find()
            .order_by_asc(footprints::Column::Id)
            .all(&self.conn)
            .await?;
        Ok(models.into_iter().map(Footprint::from).collect())
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Footprints::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
