//! Station domain entity

use chrono::{DateTime, NaiveTime, Utc};

/// Physical charging site grouping one or more slots.
///
/// A station carries an optional discount: a fraction in `[0, 1)` applied
/// to session pricing while the discount is active. When a time-of-day
/// window is configured, the discount only applies to bookings whose start
/// time falls inside `[discount_start, discount_end)`.
#[derive(Debug, Clone)]
pub struct Station {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Operator account owning this station
    pub operator_id: Option<i64>,
    pub discount_active: bool,
    /// Discount fraction in `[0, 1)`
    pub discount_value: f64,
    /// Start of the time-of-day discount window (inclusive)
    pub discount_start: Option<NaiveTime>,
    /// End of the time-of-day discount window (exclusive)
    pub discount_end: Option<NaiveTime>,
}

impl Station {
    pub fn new(id: i64, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            name: name.into(),
            latitude,
            longitude,
            operator_id: None,
            discount_active: false,
            discount_value: 0.0,
            discount_start: None,
            discount_end: None,
        }
    }

    /// Toggle the discount. Operator action.
    pub fn set_discount(&mut self, active: bool, value: f64) {
        self.discount_active = active;
        self.discount_value = value;
    }

    /// Discount fraction applicable at `at`, or `0.0` when inactive or
    /// outside the configured window.
    ///
    /// Windows are half-open `[start, end)`. A window with `start > end`
    /// wraps over midnight (e.g. 22:00–06:00).
    pub fn discount_fraction_at(&self, at: DateTime<Utc>) -> f64 {
        if !self.discount_active {
            return 0.0;
        }
        match (self.discount_start, self.discount_end) {
            (Some(start), Some(end)) => {
                let t = at.time();
                let in_window = if start <= end {
                    start <= t && t < end
                } else {
                    t >= start || t < end
                };
                if in_window {
                    self.discount_value
                } else {
                    0.0
                }
            }
            // No window configured: the active flag alone governs.
            _ => self.discount_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, hour, minute, 0).unwrap()
    }

    fn discounted_station() -> Station {
        let mut s = Station::new(1, "Campus North", 40.64, -8.65);
        s.set_discount(true, 0.1);
        s
    }

    #[test]
    fn inactive_discount_is_zero() {
        let s = Station::new(1, "Campus North", 40.64, -8.65);
        assert_eq!(s.discount_fraction_at(at(12, 0)), 0.0);
    }

    #[test]
    fn active_discount_without_window_always_applies() {
        let s = discounted_station();
        assert_eq!(s.discount_fraction_at(at(3, 0)), 0.1);
        assert_eq!(s.discount_fraction_at(at(23, 59)), 0.1);
    }

    #[test]
    fn window_is_half_open() {
        let mut s = discounted_station();
        s.discount_start = NaiveTime::from_hms_opt(9, 0, 0);
        s.discount_end = NaiveTime::from_hms_opt(17, 0, 0);

        assert_eq!(s.discount_fraction_at(at(9, 0)), 0.1);
        assert_eq!(s.discount_fraction_at(at(16, 59)), 0.1);
        assert_eq!(s.discount_fraction_at(at(17, 0)), 0.0);
        assert_eq!(s.discount_fraction_at(at(8, 59)), 0.0);
    }

    #[test]
    fn overnight_window_wraps_midnight() {
        let mut s = discounted_station();
        s.discount_start = NaiveTime::from_hms_opt(22, 0, 0);
        s.discount_end = NaiveTime::from_hms_opt(6, 0, 0);

        assert_eq!(s.discount_fraction_at(at(23, 0)), 0.1);
        assert_eq!(s.discount_fraction_at(at(2, 0)), 0.1);
        assert_eq!(s.discount_fraction_at(at(6, 0)), 0.0);
        assert_eq!(s.discount_fraction_at(at(12, 0)), 0.0);
    }

    #[test]
    fn window_ignored_while_inactive() {
        let mut s = discounted_station();
        s.discount_active = false;
        s.discount_start = NaiveTime::from_hms_opt(0, 0, 0);
        s.discount_end = NaiveTime::from_hms_opt(23, 59, 59);
        assert_eq!(s.discount_fraction_at(at(12, 0)), 0.0);
    }
}
