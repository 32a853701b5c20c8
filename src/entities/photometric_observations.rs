use sea_orm::entity::prelude::*;

use crate::domain::DepthUnit;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "photometric_observation")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub observation_id: i32,
    pub depth: Option<f64>,
    pub depth_error: Option<f64>,
    pub depth_unit: Option<DepthUnit>,
    pub position_angle: Option<f64>,
    /// Angstrom
    pub central_wavelength: Option<f64>,
    /// Angstrom
    pub bandwidth: Option<f64>,
    pub filter_name: Option<String>,
    pub other_information: Option<Json>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::observations::Entity",
        from = "Column::ObservationId",
        to = "super::observations::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Observation,
}

impl Related<super::observations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Observation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
