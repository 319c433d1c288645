//! Reservation repository interface

use async_trait::async_trait;

use super::model::Reservation;
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Insert a new reservation and return it with the assigned id.
    async fn insert(&self, reservation: Reservation) -> DomainResult<Reservation>;

    /// Find reservation by ID
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Reservation>>;

    /// All reservations owned by a user
    async fn find_by_user(&self, user_id: i64) -> DomainResult<Vec<Reservation>>;

    /// All reservations (any status)
    async fn find_all(&self) -> DomainResult<Vec<Reservation>>;

    /// ACTIVE reservations bound to a slot
    async fn find_active_by_slot(&self, slot_id: i64) -> DomainResult<Vec<Reservation>>;

    /// Update an existing reservation. Fails with `NotFound` if absent.
    async fn update(&self, reservation: Reservation) -> DomainResult<()>;
}
