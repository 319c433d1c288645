//! SeaORM implementation of SlotRepository
//!
//! `try_claim` is the availability guard: a single conditional UPDATE
//! flips `reserved` only when it is still false, so concurrent claims
//! on the same slot resolve to exactly one winner at the database.

use async_trait::async_trait;
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::domain::slot::{ChargingType, Slot, SlotRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::slot;

pub struct SeaOrmSlotRepository {
    db: DatabaseConnection,
}

impl SeaOrmSlotRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: slot::Model) -> Slot {
    Slot {
        id: m.id,
        station_id: m.station_id,
        name: m.name,
        latitude: m.latitude,
        longitude: m.longitude,
        charging_type: ChargingType::from_str(&m.charging_type),
        power: m.power,
        reserved: m.reserved,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

// ── SlotRepository impl ─────────────────────────────────────────

#[async_trait]
impl SlotRepository for SeaOrmSlotRepository {
    async fn save(&self, s: Slot) -> DomainResult<Slot> {
        debug!("Saving slot: {}", s.name);

        let model = slot::ActiveModel {
            id: if s.id == 0 { NotSet } else { Set(s.id) },
            station_id: Set(s.station_id),
            name: Set(s.name),
            latitude: Set(s.latitude),
            longitude: Set(s.longitude),
            charging_type: Set(s.charging_type.as_str().to_string()),
            power: Set(s.power),
            reserved: Set(s.reserved),
        };
        let saved = if model.id.is_not_set() {
            model.insert(&self.db).await.map_err(db_err)?
        } else {
            model.update(&self.db).await.map_err(db_err)?
        };
        Ok(model_to_domain(saved))
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Slot>> {
        let model = slot::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Slot>> {
        let models = slot::Entity::find()
            .order_by_asc(slot::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_available(&self) -> DomainResult<Vec<Slot>> {
        let models = slot::Entity::find()
            .filter(slot::Column::Reserved.eq(false))
            .order_by_asc(slot::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_station(&self, station_id: i64) -> DomainResult<Vec<Slot>> {
        let models = slot::Entity::find()
            .filter(slot::Column::StationId.eq(station_id))
            .order_by_asc(slot::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn exists_by_name(&self, name: &str, except_id: Option<i64>) -> DomainResult<bool> {
        let mut query = slot::Entity::find().filter(slot::Column::Name.eq(name));
        if let Some(id) = except_id {
            query = query.filter(slot::Column::Id.ne(id));
        }
        let count = query.count(&self.db).await.map_err(db_err)?;
        Ok(count > 0)
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        debug!("Deleting slot: {}", id);

        let result = slot::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "Slot",
                field: "id",
                value: id.to_string(),
            });
        }
        Ok(())
    }

    async fn count(&self) -> DomainResult<u64> {
        slot::Entity::find().count(&self.db).await.map_err(db_err)
    }

    async fn try_claim(&self, id: i64) -> DomainResult<Slot> {
        debug!("Claiming slot: {}", id);

        let result = slot::Entity::update_many()
            .col_expr(slot::Column::Reserved, Expr::value(true))
            .filter(slot::Column::Id.eq(id))
            .filter(slot::Column::Reserved.eq(false))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 1 {
            let model = slot::Entity::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(db_err)?;
            return model.map(model_to_domain).ok_or(DomainError::NotFound {
                entity: "Slot",
                field: "id",
                value: id.to_string(),
            });
        }

        // No row matched: either the slot is gone or someone holds it.
        let existing = slot::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        match existing {
            Some(_) => Err(DomainError::Conflict(format!(
                "Slot {} is already reserved",
                id
            ))),
            None => Err(DomainError::NotFound {
                entity: "Slot",
                field: "id",
                value: id.to_string(),
            }),
        }
    }

    async fn release(&self, id: i64) -> DomainResult<()> {
        debug!("Releasing slot: {}", id);

        slot::Entity::update_many()
            .col_expr(slot::Column::Reserved, Expr::value(false))
            .filter(slot::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
