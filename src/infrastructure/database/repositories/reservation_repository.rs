//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::reservation::{Reservation, ReservationRepository, ReservationStatus};
use crate::domain::slot::ChargingType;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::reservation;

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> Reservation {
    Reservation {
        id: m.id,
        user_id: m.user_id,
        slot_id: m.slot_id,
        status: ReservationStatus::from_str(&m.status),
        created_at: m.created_at,
        start_time: m.start_time,
        duration_minutes: m.duration_minutes,
        consumption_kwh: m.consumption_kwh,
        total_cost: m.total_cost,
        paid: m.paid,
        station_name: m.station_name,
        charging_type: ChargingType::from_str(&m.charging_type),
    }
}

fn domain_to_active(r: Reservation) -> reservation::ActiveModel {
    reservation::ActiveModel {
        id: if r.id == 0 { NotSet } else { Set(r.id) },
        user_id: Set(r.user_id),
        slot_id: Set(r.slot_id),
        status: Set(r.status.as_str().to_string()),
        created_at: Set(r.created_at),
        start_time: Set(r.start_time),
        duration_minutes: Set(r.duration_minutes),
        consumption_kwh: Set(r.consumption_kwh),
        total_cost: Set(r.total_cost),
        paid: Set(r.paid),
        station_name: Set(r.station_name),
        charging_type: Set(r.charging_type.as_str().to_string()),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn insert(&self, r: Reservation) -> DomainResult<Reservation> {
        debug!("Inserting reservation for slot {}", r.slot_id);

        let mut model = domain_to_active(r);
        model.id = NotSet;
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_user(&self, user_id: i64) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::UserId.eq(user_id))
            .order_by_asc(reservation::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_all(&self) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .order_by_asc(reservation::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_active_by_slot(&self, slot_id: i64) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::SlotId.eq(slot_id))
            .filter(reservation::Column::Status.eq(ReservationStatus::Active.as_str()))
            .order_by_asc(reservation::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, r: Reservation) -> DomainResult<()> {
        debug!("Updating reservation: {}", r.id);

        let existing = reservation::Entity::find_by_id(r.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: r.id.to_string(),
            });
        }

        domain_to_active(r).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }
}
