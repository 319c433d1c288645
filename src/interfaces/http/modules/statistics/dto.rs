//! Statistics DTOs

use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::application::statistics::ClientStats;

/// Platform-wide revenue
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevenueDto {
    /// Sum of `totalCost` over all reservations, canceled included
    pub total_revenue: f64,
}

/// Admin dashboard aggregates
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatsDto {
    pub total_revenue: f64,
    /// Revenue from reservations whose start time falls in the current
    /// calendar month
    pub current_month_revenue: f64,
    pub total_users: u64,
    pub total_chargers: u64,
    pub available_chargers: u64,
}

/// Consumption total for one week, keyed by its Monday
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyConsumptionDto {
    /// Monday of the week, `YYYY-MM-DD`
    pub week_start: String,
    pub kwh: f64,
}

/// Per-user reservation statistics
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientStatsDto {
    pub total_energy: f64,
    pub total_cost: f64,
    pub current_month_cost: f64,
    pub reservation_count: usize,
    /// Mean duration in minutes over all reservations
    pub average_duration: f64,
    /// Station with the most reservations; `null` when the user has none
    pub most_used_station: Option<String>,
    pub weekly_consumption: Vec<WeeklyConsumptionDto>,
    /// Reservation count per charging type (NORMAL, FAST, ULTRA_FAST)
    pub charging_type_counts: HashMap<String, u64>,
    /// Reservation count per slot id
    pub reservations_per_slot: HashMap<String, u64>,
}

impl From<ClientStats> for ClientStatsDto {
    fn from(s: ClientStats) -> Self {
        Self {
            total_energy: s.total_energy,
            total_cost: s.total_cost,
            current_month_cost: s.current_month_cost,
            reservation_count: s.reservation_count,
            average_duration: s.average_duration,
            most_used_station: s.most_used_station,
            weekly_consumption: s
                .weekly_consumption
                .into_iter()
                .map(|w| WeeklyConsumptionDto {
                    week_start: w.week_start,
                    kwh: w.kwh,
                })
                .collect(),
            charging_type_counts: s.charging_type_counts,
            reservations_per_slot: s.reservations_per_slot,
        }
    }
}
