//! SeaORM implementation of StationRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::station::{Station, StationRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::station;

pub struct SeaOrmStationRepository {
    db: DatabaseConnection,
}

impl SeaOrmStationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: station::Model) -> Station {
    Station {
        id: m.id,
        name: m.name,
        latitude: m.latitude,
        longitude: m.longitude,
        operator_id: m.operator_id,
        discount_active: m.discount_active,
        discount_value: m.discount_value,
        discount_start: m.discount_start,
        discount_end: m.discount_end,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

// ── StationRepository impl ──────────────────────────────────────

#[async_trait]
impl StationRepository for SeaOrmStationRepository {
    async fn save(&self, s: Station) -> DomainResult<Station> {
        debug!("Saving station: {}", s.name);

        let model = station::ActiveModel {
            id: if s.id == 0 { NotSet } else { Set(s.id) },
            name: Set(s.name),
            latitude: Set(s.latitude),
            longitude: Set(s.longitude),
            operator_id: Set(s.operator_id),
            discount_active: Set(s.discount_active),
            discount_value: Set(s.discount_value),
            discount_start: Set(s.discount_start),
            discount_end: Set(s.discount_end),
        };
        let saved = if model.id.is_not_set() {
            model.insert(&self.db).await.map_err(db_err)?
        } else {
            model.update(&self.db).await.map_err(db_err)?
        };
        Ok(model_to_domain(saved))
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Station>> {
        let model = station::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Station>> {
        let model = station::Entity::find()
            .filter(station::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Station>> {
        let models = station::Entity::find()
            .order_by_asc(station::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn set_discount(&self, id: i64, active: bool, value: f64) -> DomainResult<()> {
        debug!("Setting discount on station {}: {} {}", id, active, value);

        let result = station::Entity::update_many()
            .col_expr(station::Column::DiscountActive, Expr::value(active))
            .col_expr(station::Column::DiscountValue, Expr::value(value))
            .filter(station::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "Station",
                field: "id",
                value: id.to_string(),
            });
        }
        Ok(())
    }
}
