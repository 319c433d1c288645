//! Observability port for the reservation lifecycle
//!
//! The lifecycle manager reports outcomes through this trait instead of
//! touching a metrics registry directly. Implementations must never block
//! or fail the primary operation; calls happen outside any storage write.

use std::time::Duration;

/// Sink for reservation lifecycle events.
pub trait ReservationTelemetry: Send + Sync {
    /// A reservation was created successfully.
    fn reservation_created(&self, station_name: &str, elapsed: Duration);

    /// A creation attempt failed a precondition or a storage write.
    fn reservation_failed(&self);

    /// An ACTIVE reservation was canceled.
    fn reservation_canceled(&self);
}

/// Prometheus-backed telemetry using the `metrics` facade.
///
/// Counters:
/// - `reservations_total`
/// - `reservations_active` (gauge, incremented/decremented)
/// - `reservations_canceled_total`
/// - `reservations_errors_total`
/// - `reservations_by_station_total` with a `station` label
///
/// Histogram:
/// - `reservation_creation_seconds`
pub struct MetricsTelemetry;

impl ReservationTelemetry for MetricsTelemetry {
    fn reservation_created(&self, station_name: &str, elapsed: Duration) {
        metrics::counter!("reservations_total").increment(1);
        metrics::gauge!("reservations_active").increment(1.0);
        metrics::counter!("reservations_by_station_total", "station" => station_name.to_string())
            .increment(1);
        metrics::histogram!("reservation_creation_seconds").record(elapsed.as_secs_f64());
    }

    fn reservation_failed(&self) {
        metrics::counter!("reservations_errors_total").increment(1);
    }

    fn reservation_canceled(&self) {
        metrics::gauge!("reservations_active").decrement(1.0);
        metrics::counter!("reservations_canceled_total").increment(1);
    }
}

/// Telemetry sink that discards everything. Used in tests.
pub struct NoopTelemetry;

impl ReservationTelemetry for NoopTelemetry {
    fn reservation_created(&self, _station_name: &str, _elapsed: Duration) {}
    fn reservation_failed(&self) {}
    fn reservation_canceled(&self) {}
}
