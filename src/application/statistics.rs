//! Statistics aggregator
//!
//! Read-only views derived from the persisted reservation set. All
//! aggregations are single passes (or a small constant number of passes)
//! over the collection; nothing here mutates state.
//!
//! Revenue intentionally includes CANCELED reservations: their cost was
//! fixed at creation and stays part of historical revenue.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, Utc};

use crate::domain::{DomainResult, RepositoryProvider, Reservation};

/// Consumption total for one ISO week (keyed by its Monday).
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyConsumption {
    /// Monday of the week, formatted `YYYY-MM-DD`
    pub week_start: String,
    pub kwh: f64,
}

/// Aggregated statistics for one user's reservations.
#[derive(Debug, Clone, Default)]
pub struct ClientStats {
    pub total_energy: f64,
    pub total_cost: f64,
    pub current_month_cost: f64,
    pub reservation_count: usize,
    pub average_duration: f64,
    pub most_used_station: Option<String>,
    pub weekly_consumption: Vec<WeeklyConsumption>,
    pub charging_type_counts: HashMap<String, u64>,
    pub reservations_per_slot: HashMap<String, u64>,
}

impl ClientStats {
    /// Aggregate `reservations` as of `now` (which anchors the
    /// current-month boundary).
    pub fn compute(reservations: &[Reservation], now: DateTime<Utc>) -> Self {
        let mut stats = ClientStats {
            reservation_count: reservations.len(),
            ..Default::default()
        };

        let mut duration_total: i64 = 0;
        let mut station_counts: HashMap<&str, u64> = HashMap::new();
        let mut best_station: Option<(&str, u64)> = None;
        let mut weekly: BTreeMap<String, f64> = BTreeMap::new();

        for r in reservations {
            stats.total_energy += r.consumption_kwh;
            stats.total_cost += r.total_cost;
            duration_total += r.duration_minutes as i64;

            if same_year_month(r.start_time, now) {
                stats.current_month_cost += r.total_cost;
            }

            let count = station_counts
                .entry(r.station_name.as_str())
                .and_modify(|c| *c += 1)
                .or_insert(1);
            // Strict comparison keeps the first-encountered station on ties.
            match best_station {
                Some((_, best)) if *count <= best => {}
                _ => best_station = Some((r.station_name.as_str(), *count)),
            }

            *weekly.entry(week_start_key(r.start_time)).or_insert(0.0) += r.consumption_kwh;

            *stats
                .charging_type_counts
                .entry(r.charging_type.as_str().to_string())
                .or_insert(0) += 1;

            *stats
                .reservations_per_slot
                .entry(r.slot_id.to_string())
                .or_insert(0) += 1;
        }

        stats.average_duration = if reservations.is_empty() {
            0.0
        } else {
            duration_total as f64 / reservations.len() as f64
        };
        stats.most_used_station = best_station.map(|(name, _)| name.to_string());
        stats.weekly_consumption = weekly
            .into_iter()
            .map(|(week_start, kwh)| WeeklyConsumption { week_start, kwh })
            .collect();

        stats
    }
}

/// Revenue across `reservations` (any status).
pub fn total_revenue(reservations: &[Reservation]) -> f64 {
    reservations.iter().map(|r| r.total_cost).sum()
}

/// Revenue from reservations whose start time falls in `now`'s
/// calendar month.
pub fn current_month_revenue(reservations: &[Reservation], now: DateTime<Utc>) -> f64 {
    reservations
        .iter()
        .filter(|r| same_year_month(r.start_time, now))
        .map(|r| r.total_cost)
        .sum()
}

fn same_year_month(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Monday of the ISO week containing `at`, formatted `YYYY-MM-DD`.
fn week_start_key(at: DateTime<Utc>) -> String {
    let date = at.date_naive();
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    monday.format("%Y-%m-%d").to_string()
}

/// Service wrapping the pure aggregations with repository access.
pub struct StatisticsService {
    repos: Arc<dyn RepositoryProvider>,
}

impl StatisticsService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn total_revenue(&self) -> DomainResult<f64> {
        let all = self.repos.reservations().find_all().await?;
        Ok(total_revenue(&all))
    }

    pub async fn current_month_revenue(&self) -> DomainResult<f64> {
        let all = self.repos.reservations().find_all().await?;
        Ok(current_month_revenue(&all, Utc::now()))
    }

    /// Stats for the account behind `email`, or `None` when the account
    /// is unknown.
    pub async fn client_stats_for_email(&self, email: &str) -> DomainResult<Option<ClientStats>> {
        let Some(user) = self.repos.users().find_by_email(email).await? else {
            return Ok(None);
        };
        let mine = self.repos.reservations().find_by_user(user.id).await?;
        Ok(Some(ClientStats::compute(&mine, Utc::now())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChargingType;
    use chrono::TimeZone;

    fn reservation(
        slot_id: i64,
        station: &str,
        charging_type: ChargingType,
        start: DateTime<Utc>,
        duration: i32,
        kwh: f64,
        cost: f64,
    ) -> Reservation {
        Reservation::new(1, slot_id, start, duration, kwh, cost, station, charging_type)
    }

    fn june(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn revenue_sums_all_reservations() {
        let rs = vec![
            reservation(1, "A", ChargingType::Fast, june(1, 9), 60, 10.0, 45.0),
            reservation(2, "B", ChargingType::Normal, june(2, 9), 30, 5.0, 25.0),
        ];
        assert_eq!(total_revenue(&rs), 70.0);
    }

    #[test]
    fn canceled_reservations_still_count_as_revenue() {
        let mut canceled = reservation(1, "A", ChargingType::Fast, june(1, 9), 60, 10.0, 45.0);
        canceled.cancel();
        let rs = vec![
            canceled,
            reservation(2, "B", ChargingType::Normal, june(2, 9), 30, 5.0, 25.0),
        ];
        assert_eq!(total_revenue(&rs), 70.0);
    }

    #[test]
    fn month_revenue_filters_by_year_month() {
        let rs = vec![
            reservation(1, "A", ChargingType::Fast, june(1, 9), 60, 10.0, 45.0),
            reservation(
                2,
                "A",
                ChargingType::Fast,
                Utc.with_ymd_and_hms(2025, 5, 31, 23, 0, 0).unwrap(),
                60,
                10.0,
                30.0,
            ),
            reservation(
                3,
                "A",
                ChargingType::Fast,
                Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
                60,
                10.0,
                20.0,
            ),
        ];
        let now = june(15, 12);
        assert_eq!(current_month_revenue(&rs, now), 45.0);
    }

    #[test]
    fn client_stats_totals_and_average() {
        let rs = vec![
            reservation(1, "A", ChargingType::Fast, june(2, 9), 60, 10.0, 45.0),
            reservation(2, "B", ChargingType::Normal, june(3, 9), 30, 6.0, 25.0),
        ];
        let stats = ClientStats::compute(&rs, june(15, 12));

        assert_eq!(stats.reservation_count, 2);
        assert_eq!(stats.total_energy, 16.0);
        assert_eq!(stats.total_cost, 70.0);
        assert_eq!(stats.current_month_cost, 70.0);
        assert_eq!(stats.average_duration, 45.0);
    }

    #[test]
    fn most_used_station_tie_breaks_to_first_encountered() {
        let rs = vec![
            reservation(1, "B", ChargingType::Fast, june(2, 9), 60, 1.0, 1.0),
            reservation(2, "A", ChargingType::Fast, june(3, 9), 60, 1.0, 1.0),
        ];
        let stats = ClientStats::compute(&rs, june(15, 12));
        assert_eq!(stats.most_used_station.as_deref(), Some("B"));
    }

    #[test]
    fn most_used_station_prefers_higher_count() {
        let rs = vec![
            reservation(1, "B", ChargingType::Fast, june(2, 9), 60, 1.0, 1.0),
            reservation(2, "A", ChargingType::Fast, june(3, 9), 60, 1.0, 1.0),
            reservation(3, "A", ChargingType::Fast, june(4, 9), 60, 1.0, 1.0),
        ];
        let stats = ClientStats::compute(&rs, june(15, 12));
        assert_eq!(stats.most_used_station.as_deref(), Some("A"));
    }

    #[test]
    fn weekly_consumption_keys_on_monday() {
        // 2025-06-04 is a Wednesday; its week starts Monday 2025-06-02.
        // 2025-06-09 is the following Monday.
        let rs = vec![
            reservation(1, "A", ChargingType::Fast, june(4, 9), 60, 10.0, 1.0),
            reservation(2, "A", ChargingType::Fast, june(6, 9), 60, 5.0, 1.0),
            reservation(3, "A", ChargingType::Fast, june(9, 9), 60, 2.0, 1.0),
        ];
        let stats = ClientStats::compute(&rs, june(15, 12));
        assert_eq!(
            stats.weekly_consumption,
            vec![
                WeeklyConsumption {
                    week_start: "2025-06-02".into(),
                    kwh: 15.0
                },
                WeeklyConsumption {
                    week_start: "2025-06-09".into(),
                    kwh: 2.0
                },
            ]
        );
    }

    #[test]
    fn histograms_count_types_and_slots() {
        let rs = vec![
            reservation(1, "A", ChargingType::Fast, june(2, 9), 60, 1.0, 1.0),
            reservation(1, "A", ChargingType::Fast, june(3, 9), 60, 1.0, 1.0),
            reservation(2, "A", ChargingType::UltraFast, june(4, 9), 60, 1.0, 1.0),
        ];
        let stats = ClientStats::compute(&rs, june(15, 12));

        assert_eq!(stats.charging_type_counts.get("FAST"), Some(&2));
        assert_eq!(stats.charging_type_counts.get("ULTRA_FAST"), Some(&1));
        assert_eq!(stats.reservations_per_slot.get("1"), Some(&2));
        assert_eq!(stats.reservations_per_slot.get("2"), Some(&1));
    }

    #[test]
    fn empty_input_yields_zeroed_stats() {
        let stats = ClientStats::compute(&[], june(15, 12));
        assert_eq!(stats.reservation_count, 0);
        assert_eq!(stats.average_duration, 0.0);
        assert!(stats.most_used_station.is_none());
        assert!(stats.weekly_consumption.is_empty());
    }
}
