//! Station DTOs

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Station;

/// Station details in API responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationDto {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub operator_id: Option<i64>,
    pub discount_active: bool,
    /// Discount fraction in [0, 1)
    pub discount_value: f64,
    /// Daily window start, `HH:MM:SS`; `null` means always-on
    pub discount_start: Option<String>,
    /// Daily window end, `HH:MM:SS`
    pub discount_end: Option<String>,
}

impl From<Station> for StationDto {
    fn from(s: Station) -> Self {
        Self {
            id: s.id,
            name: s.name,
            latitude: s.latitude,
            longitude: s.longitude,
            operator_id: s.operator_id,
            discount_active: s.discount_active,
            discount_value: s.discount_value,
            discount_start: s.discount_start.map(|t| t.format("%H:%M:%S").to_string()),
            discount_end: s.discount_end.map(|t| t.format("%H:%M:%S").to_string()),
        }
    }
}

/// Request to create or update a station
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveStationRequest {
    /// `None` creates a new station
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub operator_id: Option<i64>,
    #[serde(default)]
    pub discount_active: bool,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 0.999999, message = "must be in [0, 1)"))]
    pub discount_value: f64,
    /// Daily window start, `HH:MM:SS`
    pub discount_start: Option<String>,
    /// Daily window end, `HH:MM:SS`
    pub discount_end: Option<String>,
}

impl SaveStationRequest {
    pub fn into_station(self) -> Result<Station, String> {
        let parse = |s: Option<String>, field: &str| -> Result<Option<NaiveTime>, String> {
            s.map(|v| {
                NaiveTime::parse_from_str(&v, "%H:%M:%S")
                    .map_err(|e| format!("Invalid {}: {}", field, e))
            })
            .transpose()
        };
        Ok(Station {
            id: self.id.unwrap_or(0),
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            operator_id: self.operator_id,
            discount_active: self.discount_active,
            discount_value: self.discount_value,
            discount_start: parse(self.discount_start, "discountStart")?,
            discount_end: parse(self.discount_end, "discountEnd")?,
        })
    }
}

/// Request to toggle a station's discount
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscountRequest {
    pub active: bool,
    /// Discount fraction in [0, 1)
    #[validate(range(min = 0.0, max = 0.999999, message = "must be in [0, 1)"))]
    pub value: f64,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_request_parses_window_times() {
        let req = SaveStationRequest {
            id: None,
            name: "North Hub".to_string(),
            latitude: 41.3,
            longitude: 69.2,
            operator_id: None,
            discount_active: true,
            discount_value: 0.2,
            discount_start: Some("22:00:00".to_string()),
            discount_end: Some("06:00:00".to_string()),
        };
        let station = req.into_station().unwrap();
        assert_eq!(station.id, 0);
        assert_eq!(
            station.discount_start,
            Some(NaiveTime::from_hms_opt(22, 0, 0).unwrap())
        );
    }

    #[test]
    fn save_request_rejects_bad_time() {
        let req = SaveStationRequest {
            id: None,
            name: "North Hub".to_string(),
            latitude: 0.0,
            longitude: 0.0,
            operator_id: None,
            discount_active: false,
            discount_value: 0.0,
            discount_start: Some("25:99".to_string()),
            discount_end: None,
        };
        assert!(req.into_station().is_err());
    }
}
