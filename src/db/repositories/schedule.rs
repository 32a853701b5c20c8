use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::ScheduleStatus;
use crate::entities::{prelude::*, schedules};
use crate::models::catalog::{NewSchedule, Schedule};

pub struct ScheduleRepository {
    conn: DatabaseConnection,
}

impl ScheduleRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, input: &NewSchedule) -> Result<Schedule> {
        let model = schedules::ActiveModel {
            datecreated: Set(chrono::Utc::now()),
            name: Set(input.name.clone()),
            schedule_status: Set(input.schedule_status),
            schedule_type: Set(input.schedule_type),
            instrument_id: Set(input.instrument_id),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert schedule")?;

        Ok(Schedule::from(model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Schedule>> {
        let model = Schedules::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query schedule")?;

        Ok(model.map(Schedule::from))
    }

    pub async fn list_for_instrument(&self, instrument_id: i32) -> Result<Vec<Schedule>> {
        let models = Schedules::find()
            .filter(schedules::Column::InstrumentId.eq(instrument_id))
            .order_by_asc(schedules::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list schedules")?;

        Ok(models.into_iter().map(Schedule::from).collect())
    }

    pub async fn update_status(&self, id: i32, status: ScheduleStatus) -> Result<Option<Schedule>> {
        let Some(model) = Schedules::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: schedules::ActiveModel = model.into();
        active.schedule_status = Set(status);
        let updated = active.update(&self.conn).await?;

        Ok(Some(Schedule::from(updated)))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Schedules::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
