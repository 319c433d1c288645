//! Slot entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "slots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub station_id: i64,

    #[sea_orm(unique)]
    pub name: String,

    #[sea_orm(nullable)]
    pub latitude: Option<f64>,

    #[sea_orm(nullable)]
    pub longitude: Option<f64>,

    /// Charging type: NORMAL, FAST, ULTRA_FAST
    pub charging_type: String,

    #[sea_orm(nullable)]
    pub power: Option<String>,

    pub reserved: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::station::Entity",
        from = "Column::StationId",
        to = "super::station::Column::Id"
    )]
    Station,
    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservations,
}

impl Related<super::station::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Station.def()
    }
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
