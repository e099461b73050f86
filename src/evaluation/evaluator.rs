//! Route evaluator that computes distance, hours-of-service, and load.

use crate::config::DispatchConfig;
use crate::distance::DistanceMatrix;
use crate::error::EvaluationError;
use crate::models::{RouteMetrics, StopVolumes};

/// Evaluates depot-to-depot routes against hours-of-service rules and
/// trailer capacity.
///
/// Driving time is distance over the configured average speed. Each customer
/// stop adds its unloading time to duty hours only. If the route exceeds the
/// drive or duty threshold, it needs an overnight rest and the mandatory
/// break is added to duty hours; such routes stay usable.
///
/// # Examples
///
/// ```
/// use u_dispatch::config::DispatchConfig;
/// use u_dispatch::distance::DistanceMatrix;
/// use u_dispatch::evaluation::RouteEvaluator;
/// use u_dispatch::models::StopVolumes;
///
/// let mut dm = DistanceMatrix::new(vec![1905, 5]);
/// dm.set(1905, 5, 50.0);
/// dm.set(5, 1905, 50.0);
/// let volumes: StopVolumes = [(5, 800.0)].into_iter().collect();
/// let config = DispatchConfig::default().with_depot_code(1905);
///
/// let evaluator = RouteEvaluator::new(&dm, &volumes, &config);
/// let metrics = evaluator.evaluate(&[0, 5, 0]).unwrap();
/// assert_eq!(metrics.total_distance, 100.0);
/// assert_eq!(metrics.drive_hours, 2.5);
/// assert!(metrics.capacity_feasible);
/// ```
pub struct RouteEvaluator<'a> {
    distances: &'a DistanceMatrix,
    volumes: &'a StopVolumes,
    config: &'a DispatchConfig,
}

impl<'a> RouteEvaluator<'a> {
    /// Creates a new evaluator over one day's volumes.
    pub fn new(
        distances: &'a DistanceMatrix,
        volumes: &'a StopVolumes,
        config: &'a DispatchConfig,
    ) -> Self {
        Self {
            distances,
            volumes,
            config,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &DispatchConfig {
        self.config
    }

    /// Distance matrix in use.
    pub fn distances(&self) -> &DistanceMatrix {
        self.distances
    }

    /// Aggregated volumes of the day being evaluated.
    pub fn volumes(&self) -> &StopVolumes {
        self.volumes
    }

    /// Distance of a single segment, `None` if unknown or unusable.
    ///
    /// The depot placeholder is looked up under the configured depot code.
    pub fn distance(&self, from: usize, to: usize) -> Option<f64> {
        self.distances
            .get(self.config.resolve(from), self.config.resolve(to))
            .filter(|d| d.is_finite() && *d >= 0.0)
    }

    /// Evaluates a route given as `[depot, c1, ..., ck, depot]`.
    ///
    /// Returns unreachable metrics (never an error) if a segment has no distance.
    ///
    /// # Errors
    ///
    /// The route is shorter than three nodes, does not start and end at the
    /// depot, visits the depot in between, or visits a stop without volume.
    pub fn evaluate(&self, route: &[usize]) -> Result<RouteMetrics, EvaluationError> {
        let depot = self.config.depot_placeholder;
        self.check_shape(route)?;

        let mut total_volume = 0.0;
        let mut unload_hours = Vec::with_capacity(route.len() - 2);
        for &stop in &route[1..route.len() - 1] {
            let volume = self
                .volumes
                .get(stop)
                .ok_or(EvaluationError::MissingVolume { stop })?;
            total_volume += volume;
            unload_hours.push(self.config.unload_minutes(volume) / 60.0);
        }

        let mut total_distance = 0.0;
        let mut drive_hours = 0.0;
        let mut duty_hours = 0.0;
        for (k, pair) in route.windows(2).enumerate() {
            let (u, v) = (pair[0], pair[1]);
            let Some(d) = self.distance(u, v) else {
                return Ok(RouteMetrics::unreachable(u, v, total_volume));
            };
            total_distance += d;
            let segment_drive = d / self.config.average_speed;
            drive_hours += segment_drive;
            duty_hours += segment_drive;

            if v != depot {
                duty_hours += unload_hours[k];
            }
        }

        let needs_overnight_rest =
            drive_hours > self.config.max_drive_hours || duty_hours > self.config.max_duty_hours;
        if needs_overnight_rest {
            duty_hours += self.config.mandatory_break_hours;
        }

        Ok(RouteMetrics {
            total_distance: round2(total_distance),
            drive_hours: round2(drive_hours),
            duty_hours: round2(duty_hours),
            total_volume,
            capacity_feasible: total_volume <= self.config.max_capacity,
            needs_overnight_rest,
            missing_distance: None,
        })
    }

    /// Evaluates the route visiting `customers` in order, depot added at both ends.
    pub fn evaluate_customers(&self, customers: &[usize]) -> Result<RouteMetrics, EvaluationError> {
        let depot = self.config.depot_placeholder;
        let mut route = Vec::with_capacity(customers.len() + 2);
        route.push(depot);
        route.extend_from_slice(customers);
        route.push(depot);
        self.evaluate(&route)
    }

    fn check_shape(&self, route: &[usize]) -> Result<(), EvaluationError> {
        let depot = self.config.depot_placeholder;
        if route.len() < 3 {
            return Err(EvaluationError::DegenerateRoute { len: route.len() });
        }
        if route[0] != depot || route[route.len() - 1] != depot {
            return Err(EvaluationError::DepotMisplaced {
                route: route.to_vec(),
            });
        }
        if let Some(offset) = route[1..route.len() - 1]
            .iter()
            .position(|&s| self.config.is_depot(s))
        {
            return Err(EvaluationError::DepotInInterior {
                position: offset + 1,
            });
        }
        Ok(())
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
