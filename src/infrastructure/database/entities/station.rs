//! Station entity

use chrono::NaiveTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,
    pub latitude: f64,
    pub longitude: f64,

    #[sea_orm(nullable)]
    pub operator_id: Option<i64>,

    pub discount_active: bool,

    /// Discount fraction in [0, 1)
    pub discount_value: f64,

    #[sea_orm(nullable)]
    pub discount_start: Option<NaiveTime>,

    #[sea_orm(nullable)]
    pub discount_end: Option<NaiveTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::slot::Entity")]
    Slots,
}

impl Related<super::slot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Slots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
