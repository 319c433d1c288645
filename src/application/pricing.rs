//! Pricing engine for charging sessions
//!
//! Cost is fixed at reservation creation: `pricePerKWh * consumptionKWh`,
//! reduced by the owning station's discount fraction when active (and,
//! when configured, inside its time-of-day window). No rounding is applied
//! here; presentation layers decide the display policy.

use chrono::{DateTime, Utc};

use crate::domain::Station;

/// Total cost for a session of `consumption_kwh` at `price_per_kwh`,
/// with the station discount evaluated at the booking start time.
pub fn session_cost(
    consumption_kwh: f64,
    price_per_kwh: f64,
    station: &Station,
    at: DateTime<Utc>,
) -> f64 {
    let base = price_per_kwh * consumption_kwh;
    base * (1.0 - station.discount_fraction_at(at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, TimeZone};

    fn station(discount_active: bool, discount_value: f64) -> Station {
        let mut s = Station::new(1, "Campus North", 40.64, -8.65);
        s.set_discount(discount_active, discount_value);
        s
    }

    #[test]
    fn discounted_session() {
        let s = station(true, 0.1);
        assert_eq!(session_cost(10.0, 5.0, &s, Utc::now()), 45.0);
    }

    #[test]
    fn undiscounted_session() {
        let s = station(false, 0.1);
        assert_eq!(session_cost(10.0, 5.0, &s, Utc::now()), 50.0);
    }

    #[test]
    fn zero_consumption_costs_nothing() {
        let s = station(true, 0.25);
        assert_eq!(session_cost(0.0, 0.45, &s, Utc::now()), 0.0);
    }

    #[test]
    fn window_gates_the_discount() {
        let mut s = station(true, 0.2);
        s.discount_start = NaiveTime::from_hms_opt(9, 0, 0);
        s.discount_end = NaiveTime::from_hms_opt(17, 0, 0);

        let inside = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let outside = Utc.with_ymd_and_hms(2025, 6, 15, 20, 0, 0).unwrap();

        assert_eq!(session_cost(10.0, 1.0, &s, inside), 8.0);
        assert_eq!(session_cost(10.0, 1.0, &s, outside), 10.0);
    }
}
