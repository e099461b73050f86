//! Domain model types for daily delivery routing.
//!
//! Provides orders with their delivery day, per-stop aggregated volumes,
//! evaluated routes with their metrics, and daily/weekly plans.

mod order;
mod plan;
mod route;
mod volumes;

pub use order::{Order, ParseWeekdayError, Weekday};
pub use plan::{DayPlan, PlanTotals, WeeklyPlan};
pub use route::{PlannedRoute, RouteMetrics};
pub use volumes::StopVolumes;
