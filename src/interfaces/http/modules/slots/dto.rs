//! Slot DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::slots::SlotUpsert;
use crate::domain::slot::ChargingType;
use crate::domain::Slot;

/// Slot details in API responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotDto {
    pub id: i64,
    pub station_id: i64,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// NORMAL, FAST or ULTRA_FAST
    pub charging_type: String,
    /// Reference rate for this charging type, currency units per kWh
    #[serde(rename = "pricePerKWh")]
    pub price_per_kwh: f64,
    /// Power rating label, e.g. "22 kW"
    pub power: Option<String>,
    pub reserved: bool,
    /// "lat, lon" or "Unknown" when coordinates are missing
    pub location: String,
}

impl From<Slot> for SlotDto {
    fn from(s: Slot) -> Self {
        let location = s.location();
        Self {
            id: s.id,
            station_id: s.station_id,
            name: s.name,
            latitude: s.latitude,
            longitude: s.longitude,
            charging_type: s.charging_type.as_str().to_string(),
            price_per_kwh: s.charging_type.price_per_kwh(),
            power: s.power,
            reserved: s.reserved,
            location,
        }
    }
}

/// Request to create or update a slot
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveSlotRequest {
    /// `None` creates a new slot
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Owning station, resolved by name and created when missing
    #[validate(length(min = 1, max = 100))]
    pub station_name: String,
    /// NORMAL, FAST or ULTRA_FAST; unknown values fall back to NORMAL
    pub charging_type: Option<String>,
    pub power: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<SaveSlotRequest> for SlotUpsert {
    fn from(r: SaveSlotRequest) -> Self {
        SlotUpsert {
            id: r.id,
            name: r.name,
            station_name: r.station_name,
            charging_type: r
                .charging_type
                .as_deref()
                .map(ChargingType::from_str)
                .unwrap_or_default(),
            power: r.power,
            latitude: r.latitude,
            longitude: r.longitude,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dto_carries_reference_rate_and_location() {
        let slot = Slot {
            id: 3,
            station_id: 1,
            name: "A-3".to_string(),
            latitude: Some(41.3),
            longitude: Some(69.2),
            charging_type: ChargingType::UltraFast,
            power: Some("150 kW".to_string()),
            reserved: false,
        };
        let dto = SlotDto::from(slot);
        assert_eq!(dto.price_per_kwh, 0.45);
        assert_eq!(dto.location, "41.3, 69.2");

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["pricePerKWh"], 0.45);
        assert_eq!(json["chargingType"], "ULTRA_FAST");
    }

    #[test]
    fn save_request_defaults_charging_type() {
        let req = SaveSlotRequest {
            id: None,
            name: "B-1".to_string(),
            station_name: "North Hub".to_string(),
            charging_type: None,
            power: None,
            latitude: None,
            longitude: None,
        };
        let upsert = SlotUpsert::from(req);
        assert_eq!(upsert.charging_type, ChargingType::Normal);
    }
}
