//! Station management service

use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainError, DomainResult, RepositoryProvider, Station};

pub struct StationService {
    repos: Arc<dyn RepositoryProvider>,
}

impl StationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn all_stations(&self) -> DomainResult<Vec<Station>> {
        self.repos.stations().find_all().await
    }

    pub async fn station_by_id(&self, id: i64) -> DomainResult<Option<Station>> {
        self.repos.stations().find_by_id(id).await
    }

    pub async fn save_station(&self, station: Station) -> DomainResult<Station> {
        self.repos.stations().save(station).await
    }

    /// Operator action: toggle the station discount.
    ///
    /// Returns `Ok(false)` when the station does not exist. The new value
    /// only affects reservations created afterwards; existing costs stay
    /// fixed.
    pub async fn toggle_discount(&self, id: i64, active: bool, value: f64) -> DomainResult<bool> {
        if !(0.0..1.0).contains(&value) {
            return Err(DomainError::Validation(
                "discount value must be a fraction in [0, 1)".into(),
            ));
        }
        match self.repos.stations().set_discount(id, active, value).await {
            Ok(()) => {
                info!(station_id = id, active, value, "Station discount updated");
                Ok(true)
            }
            Err(DomainError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::memory::InMemoryRepositoryProvider;

    #[tokio::test]
    async fn toggle_discount_updates_station() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let station = repos
            .stations()
            .save(Station::new(0, "Campus North", 40.64, -8.65))
            .await
            .unwrap();

        let svc = StationService::new(repos.clone());
        assert!(svc.toggle_discount(station.id, true, 0.2).await.unwrap());

        let stored = svc.station_by_id(station.id).await.unwrap().unwrap();
        assert!(stored.discount_active);
        assert_eq!(stored.discount_value, 0.2);
    }

    #[tokio::test]
    async fn toggle_discount_on_unknown_station_is_false() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let svc = StationService::new(repos);
        assert!(!svc.toggle_discount(404, true, 0.2).await.unwrap());
    }

    #[tokio::test]
    async fn toggle_discount_rejects_out_of_range_fraction() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let svc = StationService::new(repos);
        assert!(matches!(
            svc.toggle_discount(1, true, 1.5).await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }
}
