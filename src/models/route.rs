//! Route metrics and evaluated routes.

use serde::Serialize;

/// Distance, time, and load figures of a route, with its feasibility flags.
///
/// Distance and hour fields are rounded to two decimals; volume is not.
/// A route with a missing distance segment carries infinite distance and
/// hours, is never capacity-feasible, and records the offending pair in
/// `missing_distance`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteMetrics {
    /// Total distance travelled, depot to depot.
    pub total_distance: f64,
    /// Hours behind the wheel.
    pub drive_hours: f64,
    /// On-duty hours: driving, unloading, and the mandatory break when required.
    pub duty_hours: f64,
    /// Cargo volume delivered on the route.
    pub total_volume: f64,
    /// `true` if the volume fits the trailer and every segment has a distance.
    pub capacity_feasible: bool,
    /// `true` if drive or duty hours exceed the single-shift thresholds.
    pub needs_overnight_rest: bool,
    /// First segment whose distance is unknown, if any.
    pub missing_distance: Option<(usize, usize)>,
}

impl RouteMetrics {
    /// Metrics for a route that cannot be driven because `(from, to)` has no distance.
    pub fn unreachable(from: usize, to: usize, total_volume: f64) -> Self {
        Self {
            total_distance: f64::INFINITY,
            drive_hours: f64::INFINITY,
            duty_hours: f64::INFINITY,
            total_volume,
            capacity_feasible: false,
            needs_overnight_rest: false,
            missing_distance: Some((from, to)),
        }
    }

    /// `false` if some segment of the route has no known distance.
    pub fn is_reachable(&self) -> bool {
        self.missing_distance.is_none()
    }

    /// Share of the trailer used, in `[0, ∞)`.
    pub fn capacity_utilization(&self, max_capacity: f64) -> f64 {
        self.total_volume / max_capacity
    }
}

/// A finished route with its evaluated metrics.
///
/// `stops` starts and ends with the depot placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedRoute {
    pub stops: Vec<usize>,
    pub metrics: RouteMetrics,
}

impl PlannedRoute {
    /// Customer stops in visit order, depot excluded.
    pub fn customers(&self) -> &[usize] {
        if self.stops.len() < 2 {
            return &[];
        }
        &self.stops[1..self.stops.len() - 1]
    }

    /// Number of customer stops.
    pub fn num_stops(&self) -> usize {
        self.customers().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable() {
        let m = RouteMetrics::unreachable(0, 7, 120.0);
        assert!(!m.is_reachable());
        assert!(!m.capacity_feasible);
        assert!(m.total_distance.is_infinite());
        assert!(m.duty_hours.is_infinite());
        assert_eq!(m.missing_distance, Some((0, 7)));
        assert_eq!(m.total_volume, 120.0);
    }

    #[test]
    fn test_planned_route_customers() {
        let route = PlannedRoute {
            stops: vec![0, 5, 3, 0],
            metrics: RouteMetrics::unreachable(0, 5, 0.0),
        };
        assert_eq!(route.customers(), &[5, 3]);
        assert_eq!(route.num_stops(), 2);
    }

    #[test]
    fn test_capacity_utilization() {
        let mut m = RouteMetrics::unreachable(0, 1, 1600.0);
        m.missing_distance = None;
        assert!((m.capacity_utilization(3200.0) - 0.5).abs() < 1e-10);
    }
}
