//! Reservation lifecycle manager
//!
//! Orchestrates creation and cancellation: validates inputs, claims the
//! slot through the repository's atomic check-and-set, prices the session,
//! persists the reservation and reports outcomes to the telemetry port.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::application::pricing;
use crate::application::telemetry::ReservationTelemetry;
use crate::domain::{
    DomainError, DomainResult, RepositoryProvider, Reservation, ReservationStatus,
};

/// Validated input for `create_reservation`.
#[derive(Debug, Clone)]
pub struct CreateReservation {
    pub user_id: i64,
    pub slot_id: i64,
    pub consumption_kwh: f64,
    pub price_per_kwh: f64,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
}

impl CreateReservation {
    fn validate(&self) -> DomainResult<()> {
        if self.consumption_kwh <= 0.0 {
            return Err(DomainError::Validation(
                "consumptionKWh must be positive".into(),
            ));
        }
        if self.price_per_kwh < 0.0 {
            return Err(DomainError::Validation(
                "pricePerKWh must not be negative".into(),
            ));
        }
        if self.duration_minutes <= 0 {
            return Err(DomainError::Validation(
                "durationMinutes must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Service for the reservation lifecycle and its read projections.
pub struct ReservationService {
    repos: Arc<dyn RepositoryProvider>,
    telemetry: Arc<dyn ReservationTelemetry>,
}

impl ReservationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, telemetry: Arc<dyn ReservationTelemetry>) -> Self {
        Self { repos, telemetry }
    }

    /// Create a reservation in ACTIVE state.
    ///
    /// The slot claim is an atomic conditional update, so concurrent
    /// attempts on the same slot cannot both succeed. If the reservation
    /// insert fails after the claim, the claim is released again before
    /// the error is surfaced.
    pub async fn create_reservation(&self, req: CreateReservation) -> DomainResult<Reservation> {
        let started = Instant::now();
        match self.process_creation(req).await {
            Ok(reservation) => {
                self.telemetry
                    .reservation_created(&reservation.station_name, started.elapsed());
                info!(
                    reservation_id = reservation.id,
                    slot_id = reservation.slot_id,
                    user_id = reservation.user_id,
                    total_cost = reservation.total_cost,
                    "Reservation created"
                );
                Ok(reservation)
            }
            Err(e) => {
                self.telemetry.reservation_failed();
                Err(e)
            }
        }
    }

    async fn process_creation(&self, req: CreateReservation) -> DomainResult<Reservation> {
        req.validate()?;

        let user = self
            .repos
            .users()
            .find_by_id(req.user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", req.user_id))?;

        // Claim before insert. The conditional update is the single source
        // of truth for availability.
        let slot = self.repos.slots().try_claim(req.slot_id).await?;

        let station = match self.repos.stations().find_by_id(slot.station_id).await {
            Ok(Some(station)) => station,
            Ok(None) => {
                self.repos.slots().release(slot.id).await?;
                return Err(DomainError::not_found("Station", "id", slot.station_id));
            }
            Err(e) => {
                self.repos.slots().release(slot.id).await?;
                return Err(e);
            }
        };

        let total_cost = pricing::session_cost(
            req.consumption_kwh,
            req.price_per_kwh,
            &station,
            req.start_time,
        );

        let reservation = Reservation::new(
            user.id,
            slot.id,
            req.start_time,
            req.duration_minutes,
            req.consumption_kwh,
            total_cost,
            station.name,
            slot.charging_type,
        );

        match self.repos.reservations().insert(reservation).await {
            Ok(saved) => Ok(saved),
            Err(e) => {
                // Claim and insert are two writes; undo the claim so the
                // slot is not left orphaned as reserved.
                if let Err(release_err) = self.repos.slots().release(slot.id).await {
                    warn!(slot_id = slot.id, error = %release_err, "Failed to release slot after insert error");
                }
                Err(e)
            }
        }
    }

    /// Cancel a reservation, releasing its slot.
    ///
    /// Returns `Ok(false)` when the reservation does not exist or is not
    /// ACTIVE; storage failures are surfaced as errors.
    pub async fn cancel_reservation(&self, reservation_id: i64) -> DomainResult<bool> {
        let Some(mut reservation) = self.repos.reservations().find_by_id(reservation_id).await?
        else {
            return Ok(false);
        };

        if reservation.status != ReservationStatus::Active {
            return Ok(false);
        }

        self.repos.slots().release(reservation.slot_id).await?;

        reservation.cancel();
        self.repos.reservations().update(reservation.clone()).await?;

        self.telemetry.reservation_canceled();
        info!(
            reservation_id,
            slot_id = reservation.slot_id,
            "Reservation canceled"
        );

        Ok(true)
    }

    // ── Read projections ───────────────────────────────────────

    pub async fn reservation_by_id(&self, id: i64) -> DomainResult<Option<Reservation>> {
        self.repos.reservations().find_by_id(id).await
    }

    pub async fn all_reservations(&self) -> DomainResult<Vec<Reservation>> {
        self.repos.reservations().find_all().await
    }

    pub async fn reservations_for_user(&self, user_id: i64) -> DomainResult<Vec<Reservation>> {
        self.repos.reservations().find_by_user(user_id).await
    }

    /// Reservations for the account behind `email`. Unknown accounts yield
    /// an empty list rather than an error.
    pub async fn reservations_for_email(&self, email: &str) -> DomainResult<Vec<Reservation>> {
        match self.repos.users().find_by_email(email).await? {
            Some(user) => self.reservations_for_user(user.id).await,
            None => Ok(Vec::new()),
        }
    }

    /// ACTIVE reservations on a slot whose session window has not yet
    /// ended.
    pub async fn active_reservations_by_slot(
        &self,
        slot_id: i64,
    ) -> DomainResult<Vec<Reservation>> {
        let now = Utc::now();
        let active = self.repos.reservations().find_active_by_slot(slot_id).await?;
        Ok(active
            .into_iter()
            .filter(|r| r.is_ongoing_or_upcoming(now))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::telemetry::NoopTelemetry;
    use crate::domain::{ChargingType, Slot, Station, User, UserRole};
    use crate::infrastructure::storage::memory::InMemoryRepositoryProvider;
    use chrono::Duration;

    async fn seeded_provider() -> Arc<InMemoryRepositoryProvider> {
        let repos = Arc::new(InMemoryRepositoryProvider::new());

        repos
            .users()
            .save(User::new(0, "Alice", "alice@example.com", UserRole::User))
            .await
            .unwrap();

        let mut station = Station::new(0, "Campus North", 40.64, -8.65);
        station.set_discount(true, 0.1);
        let station = repos.stations().save(station).await.unwrap();

        repos
            .slots()
            .save(Slot::new(0, station.id, "A-01", ChargingType::Fast))
            .await
            .unwrap();

        repos
    }

    fn service(repos: Arc<InMemoryRepositoryProvider>) -> ReservationService {
        ReservationService::new(repos, Arc::new(NoopTelemetry))
    }

    fn request() -> CreateReservation {
        CreateReservation {
            user_id: 1,
            slot_id: 1,
            consumption_kwh: 10.0,
            price_per_kwh: 5.0,
            start_time: Utc::now() + Duration::hours(1),
            duration_minutes: 60,
        }
    }

    #[tokio::test]
    async fn create_prices_and_claims_the_slot() {
        let repos = seeded_provider().await;
        let svc = service(repos.clone());

        let r = svc.create_reservation(request()).await.unwrap();

        // 10 kWh * 5.0 with a 10% station discount
        assert_eq!(r.total_cost, 45.0);
        assert_eq!(r.status, ReservationStatus::Active);
        assert_eq!(r.station_name, "Campus North");
        assert_eq!(r.charging_type, ChargingType::Fast);
        assert!(!r.paid);

        let slot = repos.slots().find_by_id(1).await.unwrap().unwrap();
        assert!(slot.reserved);
    }

    #[tokio::test]
    async fn second_claim_on_same_slot_conflicts() {
        let repos = seeded_provider().await;
        let svc = service(repos.clone());

        svc.create_reservation(request()).await.unwrap();
        let err = svc.create_reservation(request()).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let slot = repos.slots().find_by_id(1).await.unwrap().unwrap();
        assert!(slot.reserved);
    }

    #[tokio::test]
    async fn concurrent_claims_admit_exactly_one() {
        let repos = seeded_provider().await;
        let svc = Arc::new(service(repos.clone()));

        let a = {
            let svc = svc.clone();
            tokio::spawn(async move { svc.create_reservation(request()).await })
        };
        let b = {
            let svc = svc.clone();
            tokio::spawn(async move { svc.create_reservation(request()).await })
        };

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);

        let slot = repos.slots().find_by_id(1).await.unwrap().unwrap();
        assert!(slot.reserved);
    }

    #[tokio::test]
    async fn missing_user_or_slot_is_not_found() {
        let repos = seeded_provider().await;
        let svc = service(repos);

        let mut req = request();
        req.user_id = 99;
        assert!(matches!(
            svc.create_reservation(req).await.unwrap_err(),
            DomainError::NotFound { entity: "User", .. }
        ));

        let mut req = request();
        req.slot_id = 99;
        assert!(matches!(
            svc.create_reservation(req).await.unwrap_err(),
            DomainError::NotFound { entity: "Slot", .. }
        ));
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_claiming() {
        let repos = seeded_provider().await;
        let svc = service(repos.clone());

        let mut req = request();
        req.consumption_kwh = 0.0;
        assert!(matches!(
            svc.create_reservation(req).await.unwrap_err(),
            DomainError::Validation(_)
        ));

        let slot = repos.slots().find_by_id(1).await.unwrap().unwrap();
        assert!(!slot.reserved);
    }

    #[tokio::test]
    async fn cancel_releases_slot_and_is_terminal() {
        let repos = seeded_provider().await;
        let svc = service(repos.clone());

        let r = svc.create_reservation(request()).await.unwrap();
        assert!(svc.cancel_reservation(r.id).await.unwrap());

        let slot = repos.slots().find_by_id(1).await.unwrap().unwrap();
        assert!(!slot.reserved);

        let stored = svc.reservation_by_id(r.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReservationStatus::Canceled);

        // Canceling again is a no-op failure and leaves the slot alone.
        assert!(!svc.cancel_reservation(r.id).await.unwrap());
        let slot = repos.slots().find_by_id(1).await.unwrap().unwrap();
        assert!(!slot.reserved);
    }

    #[tokio::test]
    async fn cancel_unknown_reservation_returns_false() {
        let repos = seeded_provider().await;
        let svc = service(repos);
        assert!(!svc.cancel_reservation(404).await.unwrap());
    }

    #[tokio::test]
    async fn round_trip_preserves_submitted_fields() {
        let repos = seeded_provider().await;
        let svc = service(repos);

        let req = request();
        let created = svc.create_reservation(req.clone()).await.unwrap();
        let fetched = svc.reservation_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(fetched.consumption_kwh, req.consumption_kwh);
        assert_eq!(fetched.duration_minutes, req.duration_minutes);
        assert_eq!(fetched.start_time, req.start_time);
        assert_eq!(fetched.total_cost, 45.0);
        assert_eq!(fetched.station_name, "Campus North");
        assert_eq!(fetched.charging_type, ChargingType::Fast);
    }

    #[tokio::test]
    async fn reservations_for_unknown_email_is_empty() {
        let repos = seeded_provider().await;
        let svc = service(repos);
        assert!(svc
            .reservations_for_email("nobody@example.com")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn active_by_slot_excludes_elapsed_sessions() {
        let repos = seeded_provider().await;
        let svc = service(repos.clone());

        let mut req = request();
        req.start_time = Utc::now() - Duration::hours(3);
        req.duration_minutes = 30;
        let past = svc.create_reservation(req).await.unwrap();

        // Still ACTIVE in the store, but its window has elapsed.
        assert!(repos
            .reservations()
            .find_by_id(past.id)
            .await
            .unwrap()
            .unwrap()
            .is_active());
        assert!(svc.active_reservations_by_slot(1).await.unwrap().is_empty());
    }
}
