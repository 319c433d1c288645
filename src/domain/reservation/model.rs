//! Reservation domain entity

use chrono::{DateTime, Duration, Utc};

use crate::domain::slot::ChargingType;

/// Reservation status
///
/// The lifecycle is `ACTIVE -> CANCELED`, terminal. Duration simply
/// elapses; there is no completed or expired state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    Active,
    Canceled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Canceled => "CANCELED",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "ACTIVE" => Self::Active,
            _ => Self::Canceled,
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A priced charging session binding a user to a slot.
///
/// `station_name` and `charging_type` are snapshotted from the slot at
/// creation so the record stays historically accurate; `total_cost` is
/// fixed at creation and never recomputed, even if the station's discount
/// later changes.
#[derive(Debug, Clone)]
pub struct Reservation {
    pub id: i64,
    pub user_id: i64,
    pub slot_id: i64,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub consumption_kwh: f64,
    pub total_cost: f64,
    pub paid: bool,
    pub station_name: String,
    pub charging_type: ChargingType,
}

impl Reservation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: i64,
        slot_id: i64,
        start_time: DateTime<Utc>,
        duration_minutes: i32,
        consumption_kwh: f64,
        total_cost: f64,
        station_name: impl Into<String>,
        charging_type: ChargingType,
    ) -> Self {
        Self {
            id: 0, // assigned by the store on insert
            user_id,
            slot_id,
            status: ReservationStatus::Active,
            created_at: Utc::now(),
            start_time,
            duration_minutes,
            consumption_kwh,
            total_cost,
            paid: false,
            station_name: station_name.into(),
            charging_type,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Active
    }

    /// Cancel this reservation. Terminal.
    pub fn cancel(&mut self) {
        self.status = ReservationStatus::Canceled;
    }

    /// Scheduled end of the session (`start + duration`).
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + Duration::minutes(self.duration_minutes as i64)
    }

    /// Whether the session window has not yet ended at `now`.
    pub fn is_ongoing_or_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.end_time() > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_reservation() -> Reservation {
        Reservation::new(
            1,
            7,
            Utc::now() + Duration::hours(1),
            60,
            10.0,
            4.5,
            "Campus North",
            ChargingType::Fast,
        )
    }

    #[test]
    fn new_reservation_is_active_and_unpaid() {
        let r = sample_reservation();
        assert!(r.is_active());
        assert!(!r.paid);
        assert_eq!(r.status, ReservationStatus::Active);
        assert_eq!(r.station_name, "Campus North");
        assert_eq!(r.charging_type, ChargingType::Fast);
    }

    #[test]
    fn cancel_is_terminal() {
        let mut r = sample_reservation();
        r.cancel();
        assert_eq!(r.status, ReservationStatus::Canceled);
        assert!(!r.is_active());
    }

    #[test]
    fn end_time_adds_duration() {
        let r = sample_reservation();
        assert_eq!(r.end_time(), r.start_time + Duration::minutes(60));
    }

    #[test]
    fn ongoing_window_check() {
        let mut r = sample_reservation();
        let now = Utc::now();
        assert!(r.is_ongoing_or_upcoming(now));

        r.start_time = now - Duration::hours(2);
        assert!(!r.is_ongoing_or_upcoming(now));
    }

    #[test]
    fn status_roundtrip() {
        for status in &[ReservationStatus::Active, ReservationStatus::Canceled] {
            assert_eq!(&ReservationStatus::from_str(status.as_str()), status);
        }
    }

    #[test]
    fn unknown_status_parses_as_canceled() {
        assert_eq!(
            ReservationStatus::from_str("EXPIRED"),
            ReservationStatus::Canceled
        );
    }

    #[test]
    fn total_cost_is_a_snapshot() {
        let r = sample_reservation();
        // The stored cost does not depend on current slot or station state.
        assert_eq!(r.total_cost, 4.5);
    }
}
