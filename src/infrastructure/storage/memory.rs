//! In-memory repository provider for development and testing
//!
//! Backed by `DashMap`, so `try_claim` is atomic: the shard lock held by
//! `get_mut` makes the check-and-set on `reserved` a single operation.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{
    DomainError, DomainResult, RepositoryProvider, Reservation, ReservationRepository, Slot,
    SlotRepository, Station, StationRepository, User, UserRepository,
};

#[derive(Default)]
struct Shared {
    users: DashMap<i64, User>,
    stations: DashMap<i64, Station>,
    slots: DashMap<i64, Slot>,
    reservations: DashMap<i64, Reservation>,
    user_seq: Sequence,
    station_seq: Sequence,
    slot_seq: Sequence,
    reservation_seq: Sequence,
}

struct Sequence(AtomicI64);

impl Default for Sequence {
    fn default() -> Self {
        Self(AtomicI64::new(1))
    }
}

impl Sequence {
    fn next(&self) -> i64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

/// In-memory `RepositoryProvider`.
pub struct InMemoryRepositoryProvider {
    users: InMemoryUserRepository,
    stations: InMemoryStationRepository,
    slots: InMemorySlotRepository,
    reservations: InMemoryReservationRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        let shared = Arc::new(Shared::default());
        Self {
            users: InMemoryUserRepository(shared.clone()),
            stations: InMemoryStationRepository(shared.clone()),
            slots: InMemorySlotRepository(shared.clone()),
            reservations: InMemoryReservationRepository(shared),
        }
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
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

fn sorted_by_id<T>(mut items: Vec<T>, id: impl Fn(&T) -> i64) -> Vec<T> {
    items.sort_by_key(id);
    items
}

// ── Users ──────────────────────────────────────────────────────

struct InMemoryUserRepository(Arc<Shared>);

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, mut user: User) -> DomainResult<User> {
        if user.id == 0 {
            user.id = self.0.user_seq.next();
        }
        self.0.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        Ok(self.0.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .0
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<User>> {
        Ok(sorted_by_id(
            self.0.users.iter().map(|u| u.clone()).collect(),
            |u| u.id,
        ))
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.0.users.len() as u64)
    }
}

// ── Stations ───────────────────────────────────────────────────

struct InMemoryStationRepository(Arc<Shared>);

#[async_trait]
impl StationRepository for InMemoryStationRepository {
    async fn save(&self, mut station: Station) -> DomainResult<Station> {
        if station.id == 0 {
            station.id = self.0.station_seq.next();
        }
        self.0.stations.insert(station.id, station.clone());
        Ok(station)
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Station>> {
        Ok(self.0.stations.get(&id).map(|s| s.clone()))
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Station>> {
        Ok(self
            .0
            .stations
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Station>> {
        Ok(sorted_by_id(
            self.0.stations.iter().map(|s| s.clone()).collect(),
            |s| s.id,
        ))
    }

    async fn set_discount(&self, id: i64, active: bool, value: f64) -> DomainResult<()> {
        match self.0.stations.get_mut(&id) {
            Some(mut station) => {
                station.set_discount(active, value);
                Ok(())
            }
            None => Err(DomainError::not_found("Station", "id", id)),
        }
    }
}

// ── Slots ──────────────────────────────────────────────────────

struct InMemorySlotRepository(Arc<Shared>);

#[async_trait]
impl SlotRepository for InMemorySlotRepository {
    async fn save(&self, mut slot: Slot) -> DomainResult<Slot> {
        if slot.id == 0 {
            slot.id = self.0.slot_seq.next();
        }
        self.0.slots.insert(slot.id, slot.clone());
        Ok(slot)
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Slot>> {
        Ok(self.0.slots.get(&id).map(|s| s.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Slot>> {
        Ok(sorted_by_id(
            self.0.slots.iter().map(|s| s.clone()).collect(),
            |s| s.id,
        ))
    }

    async fn find_available(&self) -> DomainResult<Vec<Slot>> {
        Ok(sorted_by_id(
            self.0
                .slots
                .iter()
                .filter(|s| !s.reserved)
                .map(|s| s.clone())
                .collect(),
            |s| s.id,
        ))
    }

    async fn find_by_station(&self, station_id: i64) -> DomainResult<Vec<Slot>> {
        Ok(sorted_by_id(
            self.0
                .slots
                .iter()
                .filter(|s| s.station_id == station_id)
                .map(|s| s.clone())
                .collect(),
            |s| s.id,
        ))
    }

    async fn exists_by_name(&self, name: &str, except_id: Option<i64>) -> DomainResult<bool> {
        Ok(self
            .0
            .slots
            .iter()
            .any(|s| s.name == name && Some(s.id) != except_id))
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        match self.0.slots.remove(&id) {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("Slot", "id", id)),
        }
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.0.slots.len() as u64)
    }

    async fn try_claim(&self, id: i64) -> DomainResult<Slot> {
        // get_mut holds the shard lock, making this check-and-set atomic.
        match self.0.slots.get_mut(&id) {
            Some(mut slot) => {
                if slot.reserved {
                    Err(DomainError::Conflict(format!(
                        "Slot {} is already reserved",
                        id
                    )))
                } else {
                    slot.reserved = true;
                    Ok(slot.clone())
                }
            }
            None => Err(DomainError::not_found("Slot", "id", id)),
        }
    }

    async fn release(&self, id: i64) -> DomainResult<()> {
        if let Some(mut slot) = self.0.slots.get_mut(&id) {
            slot.reserved = false;
        }
        Ok(())
    }
}

// ── Reservations ───────────────────────────────────────────────

struct InMemoryReservationRepository(Arc<Shared>);

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn insert(&self, mut reservation: Reservation) -> DomainResult<Reservation> {
        reservation.id = self.0.reservation_seq.next();
        self.0
            .reservations
            .insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Reservation>> {
        Ok(self.0.reservations.get(&id).map(|r| r.clone()))
    }

    async fn find_by_user(&self, user_id: i64) -> DomainResult<Vec<Reservation>> {
        Ok(sorted_by_id(
            self.0
                .reservations
                .iter()
                .filter(|r| r.user_id == user_id)
                .map(|r| r.clone())
                .collect(),
            |r| r.id,
        ))
    }

    async fn find_all(&self) -> DomainResult<Vec<Reservation>> {
        Ok(sorted_by_id(
            self.0.reservations.iter().map(|r| r.clone()).collect(),
            |r| r.id,
        ))
    }

    async fn find_active_by_slot(&self, slot_id: i64) -> DomainResult<Vec<Reservation>> {
        Ok(sorted_by_id(
            self.0
                .reservations
                .iter()
                .filter(|r| r.slot_id == slot_id && r.is_active())
                .map(|r| r.clone())
                .collect(),
            |r| r.id,
        ))
    }

    async fn update(&self, reservation: Reservation) -> DomainResult<()> {
        if !self.0.reservations.contains_key(&reservation.id) {
            return Err(DomainError::not_found("Reservation", "id", reservation.id));
        }
        self.0.reservations.insert(reservation.id, reservation);
        Ok(())
    }
}
