//! Repository provider for the domain layer

use super::reservation::ReservationRepository;
use super::slot::SlotRepository;
use super::station::StationRepository;
use super::user::UserRepository;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let slot = repos.slots().find_by_id(7).await?;
///     let mine = repos.reservations().find_by_user(1).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn stations(&self) -> &dyn StationRepository;
    fn slots(&self) -> &dyn SlotRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
}
