//! Station repository interface

use async_trait::async_trait;

use super::model::Station;
use crate::domain::DomainResult;

#[async_trait]
pub trait StationRepository: Send + Sync {
    /// Insert a new station (id assigned by the store) or update an existing one.
    async fn save(&self, station: Station) -> DomainResult<Station>;

    /// Find station by ID
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Station>>;

    /// Find station by name
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Station>>;

    /// All stations
    async fn find_all(&self) -> DomainResult<Vec<Station>>;

    /// Update the discount flag and fraction. Fails with `NotFound` if the
    /// station does not exist.
    async fn set_discount(&self, id: i64, active: bool, value: f64) -> DomainResult<()>;
}
