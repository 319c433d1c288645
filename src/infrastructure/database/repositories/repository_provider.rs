//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::repositories::RepositoryProvider;
use crate::domain::reservation::ReservationRepository;
use crate::domain::slot::SlotRepository;
use crate::domain::station::StationRepository;
use crate::domain::user::UserRepository;

use super::reservation_repository::SeaOrmReservationRepository;
use super::slot_repository::SeaOrmSlotRepository;
use super::station_repository::SeaOrmStationRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let slot = repos.slots().find_by_id(1).await?;
/// let mine = repos.reservations().find_by_user(42).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    stations: SeaOrmStationRepository,
    slots: SeaOrmSlotRepository,
    reservations: SeaOrmReservationRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            stations: SeaOrmStationRepository::new(db.clone()),
            slots: SeaOrmSlotRepository::new(db.clone()),
            reservations: SeaOrmReservationRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn stations(&self) -> &dyn StationRepository {
        &self.stations
    }

    fn slots(&self) -> &dyn SlotRepository {
        &self.slots
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }
}
