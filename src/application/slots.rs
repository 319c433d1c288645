//! Slot management service

use std::sync::Arc;

use tracing::info;

use crate::domain::{
    ChargingType, DomainError, DomainResult, RepositoryProvider, Slot, Station,
};

/// Create-or-update request for a slot. The owning station is resolved by
/// name and created on the fly when missing.
#[derive(Debug, Clone)]
pub struct SlotUpsert {
    /// `None` creates a new slot; `Some` updates an existing one.
    pub id: Option<i64>,
    pub name: String,
    pub station_name: String,
    pub charging_type: ChargingType,
    pub power: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

pub struct SlotService {
    repos: Arc<dyn RepositoryProvider>,
}

impl SlotService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn all_slots(&self) -> DomainResult<Vec<Slot>> {
        self.repos.slots().find_all().await
    }

    pub async fn available_slots(&self) -> DomainResult<Vec<Slot>> {
        self.repos.slots().find_available().await
    }

    pub async fn slot_by_id(&self, id: i64) -> DomainResult<Option<Slot>> {
        self.repos.slots().find_by_id(id).await
    }

    pub async fn slots_by_station(&self, station_id: i64) -> DomainResult<Vec<Slot>> {
        self.repos.slots().find_by_station(station_id).await
    }

    pub async fn total_chargers(&self) -> DomainResult<u64> {
        self.repos.slots().count().await
    }

    pub async fn available_chargers(&self) -> DomainResult<u64> {
        Ok(self.repos.slots().find_available().await?.len() as u64)
    }

    /// Returns `Ok(false)` when the slot does not exist.
    pub async fn delete_slot(&self, id: i64) -> DomainResult<bool> {
        match self.repos.slots().delete(id).await {
            Ok(()) => Ok(true),
            Err(DomainError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Create or update a slot from an operator request.
    ///
    /// Slot names are unique; the owning station is looked up by name and
    /// created when absent.
    pub async fn upsert_slot(&self, req: SlotUpsert) -> DomainResult<Slot> {
        if self
            .repos
            .slots()
            .exists_by_name(&req.name, req.id)
            .await?
        {
            return Err(DomainError::Conflict(format!(
                "Slot name '{}' already exists",
                req.name
            )));
        }

        let station = match self.repos.stations().find_by_name(&req.station_name).await? {
            Some(station) => station,
            None => {
                let created = self
                    .repos
                    .stations()
                    .save(Station::new(0, req.station_name.clone(), 0.0, 0.0))
                    .await?;
                info!(station_id = created.id, name = %created.name, "Station created for new slot");
                created
            }
        };

        let mut slot = match req.id {
            Some(id) => self
                .repos
                .slots()
                .find_by_id(id)
                .await?
                .ok_or_else(|| DomainError::not_found("Slot", "id", id))?,
            None => Slot::new(0, station.id, req.name.clone(), req.charging_type),
        };

        slot.name = req.name;
        slot.station_id = station.id;
        slot.charging_type = req.charging_type;
        slot.power = req.power;
        slot.latitude = req.latitude;
        slot.longitude = req.longitude;

        self.repos.slots().save(slot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::memory::InMemoryRepositoryProvider;

    fn upsert(name: &str, station: &str) -> SlotUpsert {
        SlotUpsert {
            id: None,
            name: name.into(),
            station_name: station.into(),
            charging_type: ChargingType::Normal,
            power: Some("22kW".into()),
            latitude: None,
            longitude: None,
        }
    }

    #[tokio::test]
    async fn upsert_creates_station_on_the_fly() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let svc = SlotService::new(repos.clone());

        let slot = svc.upsert_slot(upsert("A-01", "Campus North")).await.unwrap();
        let station = repos
            .stations()
            .find_by_name("Campus North")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(slot.station_id, station.id);
    }

    #[tokio::test]
    async fn duplicate_slot_name_is_a_conflict() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let svc = SlotService::new(repos);

        svc.upsert_slot(upsert("A-01", "Campus North")).await.unwrap();
        assert!(matches!(
            svc.upsert_slot(upsert("A-01", "Campus South"))
                .await
                .unwrap_err(),
            DomainError::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn update_keeps_name_when_unchanged() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let svc = SlotService::new(repos);

        let created = svc.upsert_slot(upsert("A-01", "Campus North")).await.unwrap();

        let mut req = upsert("A-01", "Campus North");
        req.id = Some(created.id);
        req.charging_type = ChargingType::Fast;
        let updated = svc.upsert_slot(req).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.charging_type, ChargingType::Fast);
    }

    #[tokio::test]
    async fn delete_unknown_slot_is_false() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let svc = SlotService::new(repos);
        assert!(!svc.delete_slot(404).await.unwrap());
    }

    #[tokio::test]
    async fn charger_counts() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let svc = SlotService::new(repos.clone());

        svc.upsert_slot(upsert("A-01", "Campus North")).await.unwrap();
        let b = svc.upsert_slot(upsert("B-01", "Campus North")).await.unwrap();
        repos.slots().try_claim(b.id).await.unwrap();

        assert_eq!(svc.total_chargers().await.unwrap(), 2);
        assert_eq!(svc.available_chargers().await.unwrap(), 1);
    }
}
