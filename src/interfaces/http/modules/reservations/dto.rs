//! Reservation DTOs
//!
//! Wire format is camelCase; the kWh fields keep their historical
//! `...KWh` capitalization, which `rename_all` alone cannot produce.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Reservation, User};

/// Request to create a new reservation
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    /// ID of the reserving user
    pub user_id: i64,
    /// ID of the slot to claim
    pub slot_id: i64,
    /// Planned energy consumption in kWh
    #[serde(rename = "consumptionKWh")]
    #[validate(range(min = 0.000001, message = "must be positive"))]
    pub consumption_kwh: f64,
    /// Price per kWh agreed for this session
    #[serde(rename = "pricePerKWh")]
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub price_per_kwh: f64,
    /// Scheduled session start (ISO 8601)
    pub start_time: String,
    /// Session duration in minutes
    #[validate(range(min = 1, message = "must be positive"))]
    pub duration_minutes: i32,
}

/// Reservation details in API responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDto {
    pub id: i64,
    pub user_id: i64,
    pub slot_id: i64,
    /// ACTIVE or CANCELED
    #[serde(rename = "state")]
    pub status: String,
    pub created_at: String,
    pub start_time: String,
    pub duration_minutes: i32,
    #[serde(rename = "consumptionKWh")]
    pub consumption_kwh: f64,
    pub total_cost: f64,
    pub paid: bool,
    /// Station name snapshotted at creation time
    pub station_name: String,
    /// Charging type snapshotted at creation time
    pub charging_type: String,
    /// Email of the reserving user; present only in admin listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    /// Name of the reserving user; present only in admin listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

impl ReservationDto {
    /// Admin projection carrying the joined user's email and name.
    pub fn with_user(r: Reservation, user: Option<&User>) -> Self {
        let mut dto = Self::from(r);
        if let Some(u) = user {
            dto.user_email = Some(u.email.clone());
            dto.user_name = Some(u.name.clone());
        }
        dto
    }
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            slot_id: r.slot_id,
            status: r.status.as_str().to_string(),
            created_at: r.created_at.to_rfc3339(),
            start_time: r.start_time.to_rfc3339(),
            duration_minutes: r.duration_minutes,
            consumption_kwh: r.consumption_kwh,
            total_cost: r.total_cost,
            paid: r.paid,
            station_name: r.station_name,
            charging_type: r.charging_type.as_str().to_string(),
            user_email: None,
            user_name: None,
        }
    }
}

/// Response from cancelling a reservation
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelReservationResponse {
    /// Whether a change happened; `false` when the reservation was
    /// already canceled or does not exist
    pub canceled: bool,
    pub message: String,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::domain::slot::ChargingType;
    use crate::domain::ReservationStatus;

    fn sample_reservation() -> Reservation {
        Reservation {
            id: 4,
            user_id: 2,
            slot_id: 9,
            status: ReservationStatus::Active,
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
            start_time: Utc.with_ymd_and_hms(2025, 3, 2, 14, 0, 0).unwrap(),
            duration_minutes: 45,
            consumption_kwh: 30.0,
            total_cost: 9.0,
            paid: false,
            station_name: "North Hub".to_string(),
            charging_type: ChargingType::Fast,
        }
    }

    #[test]
    fn dto_serializes_camel_case_with_kwh_rename() {
        let dto = ReservationDto::from(sample_reservation());
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["userId"], 2);
        assert_eq!(json["state"], "ACTIVE");
        assert_eq!(json["consumptionKWh"], 30.0);
        assert_eq!(json["totalCost"], 9.0);
        assert_eq!(json["stationName"], "North Hub");
        assert_eq!(json["chargingType"], "FAST");
        assert!(json.get("consumption_kwh").is_none());
        assert!(json.get("status").is_none());
        assert!(json.get("userEmail").is_none());
    }

    #[test]
    fn admin_projection_includes_user_details() {
        let user = User {
            id: 2,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            role: crate::domain::UserRole::User,
        };
        let dto = ReservationDto::with_user(sample_reservation(), Some(&user));
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["userEmail"], "alice@example.com");
        assert_eq!(json["userName"], "Alice");

        let dto = ReservationDto::with_user(sample_reservation(), None);
        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("userEmail").is_none());
    }

    #[test]
    fn request_deserializes_wire_field_names() {
        let body = serde_json::json!({
            "userId": 1,
            "slotId": 2,
            "consumptionKWh": 100.0,
            "pricePerKWh": 0.5,
            "startTime": "2025-03-02T14:00:00Z",
            "durationMinutes": 60
        });
        let req: CreateReservationRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.user_id, 1);
        assert_eq!(req.consumption_kwh, 100.0);
        assert_eq!(req.price_per_kwh, 0.5);
    }
}
