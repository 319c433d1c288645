//! Slot repository interface
//!
//! Besides plain CRUD, this trait carries the availability-guard
//! primitives: `try_claim` must be implemented as a single atomic
//! check-and-set (a conditional update on the `reserved` flag), so two
//! concurrent claims on the same slot can never both succeed.

use async_trait::async_trait;

use super::model::Slot;
use crate::domain::DomainResult;

#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// Insert a new slot (id assigned by the store) or update an existing one.
    async fn save(&self, slot: Slot) -> DomainResult<Slot>;

    /// Find slot by ID
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Slot>>;

    /// All slots
    async fn find_all(&self) -> DomainResult<Vec<Slot>>;

    /// Slots with `reserved == false`
    async fn find_available(&self) -> DomainResult<Vec<Slot>>;

    /// Slots belonging to a station
    async fn find_by_station(&self, station_id: i64) -> DomainResult<Vec<Slot>>;

    /// Whether a slot with this name exists, optionally ignoring one id
    /// (used when renaming).
    async fn exists_by_name(&self, name: &str, except_id: Option<i64>) -> DomainResult<bool>;

    /// Delete a slot. Fails with `NotFound` if absent.
    async fn delete(&self, id: i64) -> DomainResult<()>;

    /// Total number of slots
    async fn count(&self) -> DomainResult<u64>;

    /// Atomically set `reserved = true` if the slot exists and is free,
    /// returning the claimed slot. Fails with `Conflict` when already
    /// reserved and `NotFound` when absent.
    async fn try_claim(&self, id: i64) -> DomainResult<Slot>;

    /// Unconditionally set `reserved = false`. Idempotent; absent slots
    /// are a no-op.
    async fn release(&self, id: i64) -> DomainResult<()>;
}
