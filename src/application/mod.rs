//! Business logic and use cases

pub mod pricing;
pub mod reservations;
pub mod slots;
pub mod stations;
pub mod statistics;
pub mod telemetry;
pub mod users;

pub use reservations::{CreateReservation, ReservationService};
pub use slots::{SlotService, SlotUpsert};
pub use stations::StationService;
pub use statistics::{ClientStats, StatisticsService, WeeklyConsumption};
pub use telemetry::{MetricsTelemetry, NoopTelemetry, ReservationTelemetry};
pub use users::UserService;
