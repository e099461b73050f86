//! Clarke-Wright savings algorithm.
//!
//! # Algorithm
//!
//! The savings algorithm (Clarke & Wright, 1964) starts with each customer
//! on its own route (depot → customer → depot). It then merges routes by
//! computing the "savings" of combining the end of one route with the start
//! of another:
//!
//! ```text
//! s(i, j) = d(0, i) + d(0, j) - d(i, j)
//! ```
//!
//! Pairs are visited once, in decreasing order of savings. A pair merges two
//! routes only when `i` ends one route and `j` starts the other (or the
//! reverse), and the evaluator finds the concatenated route reachable and
//! within trailer capacity. When both orientations apply (two single-stop
//! routes), the second is tried only if the first is rejected. Routes needing
//! an overnight rest are accepted. A rejected pair is never retried.
//!
//! # Complexity
//!
//! O(n² log n) pair sorting plus one route evaluation per candidate merge.
//!
//! # Reference
//!
//! Clarke, G. & Wright, J.W. (1964). "Scheduling of Vehicles from a Central
//! Depot to a Number of Delivery Points", *Operations Research* 12(4), 568-581.

use std::collections::HashMap;

use tracing::debug;

use crate::error::DispatchError;
use crate::evaluation::RouteEvaluator;
use crate::models::RouteMetrics;

/// A savings value for merging two customers' routes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Saving {
    pub i: usize,
    pub j: usize,
    pub value: f64,
}

/// Savings of serving `i` and `j` on one route instead of two.
///
/// The inter-customer leg is read in ascending code order, falling back to
/// the opposite direction when that entry is missing, so the value is the
/// same for `(i, j)` and `(j, i)`. Returns `None` if a depot leg is unknown
/// or the customers are not connected in either direction.
pub fn pair_saving(evaluator: &RouteEvaluator<'_>, i: usize, j: usize) -> Option<f64> {
    let depot = evaluator.config().depot_placeholder;
    let (lo, hi) = if i <= j { (i, j) } else { (j, i) };
    let d_0i = evaluator.distance(depot, i)?;
    let d_0j = evaluator.distance(depot, j)?;
    let d_ij = evaluator
        .distance(lo, hi)
        .or_else(|| evaluator.distance(hi, lo))?;
    Some(d_0i + d_0j - d_ij)
}

/// Computes savings for every unordered pair of the day's stops, sorted by
/// decreasing value.
///
/// Pairs are enumerated in the stops' first-seen order; the sort is stable,
/// so equal savings keep that order. Pairs with an unknown distance are left
/// out: no route joining them can be reachable.
pub fn savings_list(evaluator: &RouteEvaluator<'_>) -> Vec<Saving> {
    let stops = evaluator.volumes().stops();
    let n = stops.len();
    let mut savings = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for a in 0..n {
        for b in (a + 1)..n {
            let (i, j) = (stops[a], stops[b]);
            match pair_saving(evaluator, i, j) {
                Some(value) => savings.push(Saving { i, j, value }),
                None => debug!(i, j, "skipping pair with unknown distance"),
            }
        }
    }

    savings.sort_by(|a, b| b.value.total_cmp(&a.value));
    savings
}

/// Active routes with a reverse index from stop to the slot holding it.
///
/// Routes hold customer stops only; the depot is implicit at both ends.
/// A merge retires both source slots and appends the merged route in a new
/// slot, so slot order is the order routes were created.
struct RouteSet {
    slots: Vec<Option<Vec<usize>>>,
    route_of: HashMap<usize, usize>,
    active: usize,
}

impl RouteSet {
    fn singletons(stops: &[usize]) -> Self {
        let slots = stops.iter().map(|&s| Some(vec![s])).collect();
        let route_of = stops.iter().enumerate().map(|(k, &s)| (s, k)).collect();
        Self {
            slots,
            route_of,
            active: stops.len(),
        }
    }

    fn route_of(&self, stop: usize) -> Option<usize> {
        self.route_of.get(&stop).copied()
    }

    fn members(&self, slot: usize) -> &[usize] {
        self.slots[slot].as_deref().unwrap_or(&[])
    }

    /// Replaces the routes in `first` and `second` by `merged`.
    fn replace(&mut self, first: usize, second: usize, merged: Vec<usize>) -> usize {
        let slot = self.slots.len();
        for &stop in &merged {
            self.route_of.insert(stop, slot);
        }
        self.slots[first] = None;
        self.slots[second] = None;
        self.slots.push(Some(merged));
        self.active -= 1;
        slot
    }

    fn len(&self) -> usize {
        self.active
    }

    fn into_routes(self, depot: usize) -> Vec<Vec<usize>> {
        self.slots
            .into_iter()
            .flatten()
            .map(|members| {
                let mut route = Vec::with_capacity(members.len() + 2);
                route.push(depot);
                route.extend(members);
                route.push(depot);
                route
            })
            .collect()
    }
}

/// Returns `true` if a merged route with these metrics may replace its sources.
fn accepts(evaluator: &RouteEvaluator<'_>, metrics: &RouteMetrics) -> bool {
    let within_ceiling = evaluator
        .config()
        .duty_hour_ceiling
        .map_or(true, |ceiling| metrics.duty_hours <= ceiling);
    metrics.is_reachable() && metrics.capacity_feasible && within_ceiling
}

/// Builds one day's routes with the Clarke-Wright savings algorithm.
///
/// Every stop of the evaluator's volume set ends up in exactly one route.
/// Each returned route starts and ends with the depot placeholder. Routes
/// untouched by merges come first, in stop order, followed by merged routes
/// in the order they were formed.
///
/// # Errors
///
/// [`DispatchError::DepotNotInMatrix`] if the day has stops but the distance
/// matrix has no row for the depot.
///
/// # Examples
///
/// ```
/// use u_dispatch::config::DispatchConfig;
/// use u_dispatch::constructive::clarke_wright_savings;
/// use u_dispatch::distance::DistanceMatrix;
/// use u_dispatch::evaluation::RouteEvaluator;
/// use u_dispatch::models::StopVolumes;
///
/// let mut dm = DistanceMatrix::new(vec![0, 1, 2]);
/// for (a, b, d) in [(0, 1, 30.0), (0, 2, 40.0), (1, 2, 10.0)] {
///     dm.set(a, b, d);
///     dm.set(b, a, d);
/// }
/// let volumes: StopVolumes = [(1, 500.0), (2, 700.0)].into_iter().collect();
/// let config = DispatchConfig::default();
/// let evaluator = RouteEvaluator::new(&dm, &volumes, &config);
///
/// let routes = clarke_wright_savings(&evaluator).unwrap();
/// assert_eq!(routes, vec![vec![0, 1, 2, 0]]);
/// ```
pub fn clarke_wright_savings(
    evaluator: &RouteEvaluator<'_>,
) -> Result<Vec<Vec<usize>>, DispatchError> {
    let depot = evaluator.config().depot_placeholder;
    let stops = evaluator.volumes().stops();
    if stops.is_empty() {
        return Ok(Vec::new());
    }
    let depot_code = evaluator.config().depot();
    if !evaluator.distances().contains(depot_code) {
        return Err(DispatchError::DepotNotInMatrix { code: depot_code });
    }

    let savings = savings_list(evaluator);
    let mut routes = RouteSet::singletons(stops);

    for saving in &savings {
        let (Some(ri), Some(rj)) = (routes.route_of(saving.i), routes.route_of(saving.j)) else {
            continue;
        };

        // Skip if same route
        if ri == rj {
            continue;
        }

        let route_i = routes.members(ri);
        let route_j = routes.members(rj);
        let mut orientations = Vec::with_capacity(2);
        if route_i.last() == Some(&saving.i) && route_j.first() == Some(&saving.j) {
            orientations.push((ri, rj));
        }
        if route_i.first() == Some(&saving.i) && route_j.last() == Some(&saving.j) {
            orientations.push((rj, ri));
        }

        for (first, second) in orientations {
            let mut merged = routes.members(first).to_vec();
            merged.extend_from_slice(routes.members(second));

            let metrics = evaluator.evaluate_customers(&merged)?;
            if accepts(evaluator, &metrics) {
                debug!(
                    i = saving.i,
                    j = saving.j,
                    saving = saving.value,
                    volume = metrics.total_volume,
                    overnight = metrics.needs_overnight_rest,
                    "merged routes"
                );
                routes.replace(first, second, merged);
                break;
            }
            debug!(
                i = saving.i,
                j = saving.j,
                volume = metrics.total_volume,
                reachable = metrics.is_reachable(),
                "rejected merge"
            );
        }
    }

    debug!(
        stops = stops.len(),
        pairs = savings.len(),
        routes = routes.len(),
        "savings construction finished"
    );
    Ok(routes.into_routes(depot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DispatchConfig;
    use crate::distance::DistanceMatrix;
    use crate::models::StopVolumes;

    const DEPOT: usize = 1905;

    fn matrix(labels: Vec<usize>, edges: &[(usize, usize, f64)]) -> DistanceMatrix {
        let mut dm = DistanceMatrix::new(labels);
        for &(a, b, d) in edges {
            dm.set(a, b, d);
            dm.set(b, a, d);
        }
        dm
    }

    fn config() -> DispatchConfig {
        DispatchConfig::default().with_depot_code(DEPOT)
    }

    /// Three customers: s(A,B) = 190 > s(A,C) = 150 > s(B,C) = 120.
    fn triangle() -> DistanceMatrix {
        matrix(
            vec![DEPOT, 1, 2, 3],
            &[
                (DEPOT, 1, 100.0),
                (DEPOT, 2, 100.0),
                (DEPOT, 3, 100.0),
                (1, 2, 10.0),
                (1, 3, 50.0),
                (2, 3, 80.0),
            ],
        )
    }

    #[test]
    fn test_cw_single_customer() {
        let dm = matrix(vec![DEPOT, 5], &[(DEPOT, 5, 50.0)]);
        let volumes: StopVolumes = [(5, 400.0)].into_iter().collect();
        let cfg = config();
        let eval = RouteEvaluator::new(&dm, &volumes, &cfg);
        let routes = clarke_wright_savings(&eval).expect("solvable");
        assert_eq!(routes, vec![vec![0, 5, 0]]);
        let m = eval.evaluate(&routes[0]).expect("valid route");
        assert_eq!(m.total_distance, 100.0);
        assert_eq!(m.drive_hours, 2.5);
        assert!(m.capacity_feasible);
    }

    #[test]
    fn test_cw_empty() {
        let dm = matrix(vec![DEPOT], &[]);
        let volumes = StopVolumes::new();
        let cfg = config();
        let eval = RouteEvaluator::new(&dm, &volumes, &cfg);
        assert!(clarke_wright_savings(&eval).expect("empty day").is_empty());
    }

    #[test]
    fn test_cw_capacity_stops_third_merge() {
        let dm = triangle();
        let volumes: StopVolumes = [(1, 1500.0), (2, 1500.0), (3, 1000.0)].into_iter().collect();
        let cfg = config();
        let eval = RouteEvaluator::new(&dm, &volumes, &cfg);
        let routes = clarke_wright_savings(&eval).expect("solvable");
        assert_eq!(routes, vec![vec![0, 3, 0], vec![0, 1, 2, 0]]);
    }

    #[test]
    fn test_cw_all_merged_when_capacity_allows() {
        let dm = triangle();
        let volumes: StopVolumes = [(1, 500.0), (2, 500.0), (3, 500.0)].into_iter().collect();
        let cfg = config();
        let eval = RouteEvaluator::new(&dm, &volumes, &cfg);
        let routes = clarke_wright_savings(&eval).expect("solvable");
        // (1,2) -> [1,2]; (1,3): 1 starts [1,2], 3 ends [3] -> [3,1,2]
        assert_eq!(routes, vec![vec![0, 3, 1, 2, 0]]);
    }

    #[test]
    fn test_cw_interior_stop_not_mergeable() {
        let dm = matrix(
            vec![DEPOT, 1, 2, 3, 4],
            &[
                (DEPOT, 1, 10.0),
                (DEPOT, 2, 20.0),
                (DEPOT, 3, 30.0),
                (DEPOT, 4, 25.0),
                (1, 2, 10.0),
                (1, 3, 20.0),
                (2, 3, 10.0),
                (1, 4, 35.0),
                (2, 4, 5.0),
                (3, 4, 55.0),
            ],
        );
        let volumes: StopVolumes = [(1, 10.0), (2, 10.0), (3, 10.0), (4, 10.0)]
            .into_iter()
            .collect();
        let cfg = config();
        let eval = RouteEvaluator::new(&dm, &volumes, &cfg);
        // Order: (2,3)=40, (2,4)=40, (1,2)=20, (1,3)=20, (1,4)=0, (3,4)=0.
        // After [4,2,3] forms, (1,2) is skipped because 2 is interior;
        // (1,3) then appends 1 after 3.
        let routes = clarke_wright_savings(&eval).expect("solvable");
        assert_eq!(routes, vec![vec![0, 4, 2, 3, 1, 0]]);
    }

    #[test]
    fn test_cw_missing_depot_distance_never_merged() {
        // No depot leg to customer 3
        let dm = matrix(
            vec![DEPOT, 1, 2, 3],
            &[
                (DEPOT, 1, 100.0),
                (DEPOT, 2, 100.0),
                (1, 2, 10.0),
                (1, 3, 5.0),
                (2, 3, 5.0),
            ],
        );
        let volumes: StopVolumes = [(1, 10.0), (2, 10.0), (3, 10.0)].into_iter().collect();
        let cfg = config();
        let eval = RouteEvaluator::new(&dm, &volumes, &cfg);

        assert!(!eval.evaluate(&[0, 3, 0]).expect("shape").is_reachable());
        assert!(!eval.evaluate(&[0, 1, 3, 0]).expect("shape").is_reachable());

        let routes = clarke_wright_savings(&eval).expect("solvable");
        assert_eq!(routes, vec![vec![0, 3, 0], vec![0, 1, 2, 0]]);
    }

    #[test]
    fn test_cw_one_way_leg_merges_in_reachable_direction() {
        // Only 2 -> 1 is known; pair (1, 2) first tries [1, 2], then [2, 1]
        let mut dm = matrix(vec![DEPOT, 1, 2], &[(DEPOT, 1, 100.0), (DEPOT, 2, 100.0)]);
        dm.set(2, 1, 10.0);
        let volumes: StopVolumes = [(1, 10.0), (2, 10.0)].into_iter().collect();
        let cfg = config();
        let eval = RouteEvaluator::new(&dm, &volumes, &cfg);

        assert_eq!(pair_saving(&eval, 1, 2), Some(190.0));
        assert_eq!(pair_saving(&eval, 2, 1), Some(190.0));
        assert!(!eval.evaluate(&[0, 1, 2, 0]).expect("shape").is_reachable());
        assert!(eval.evaluate(&[0, 2, 1, 0]).expect("shape").is_reachable());

        let routes = clarke_wright_savings(&eval).expect("solvable");
        assert_eq!(routes, vec![vec![0, 2, 1, 0]]);
    }

    #[test]
    fn test_cw_unconnected_customers_stay_apart() {
        let dm = matrix(vec![DEPOT, 1, 2], &[(DEPOT, 1, 100.0), (DEPOT, 2, 100.0)]);
        let volumes: StopVolumes = [(1, 10.0), (2, 10.0)].into_iter().collect();
        let cfg = config();
        let eval = RouteEvaluator::new(&dm, &volumes, &cfg);
        assert!(savings_list(&eval).is_empty());
        let routes = clarke_wright_savings(&eval).expect("solvable");
        assert_eq!(routes, vec![vec![0, 1, 0], vec![0, 2, 0]]);
    }

    #[test]
    fn test_cw_uses_configured_depot_code() {
        // Matrix keyed by the real depot code only
        let dm = triangle();
        assert!(!dm.contains(0));
        let volumes: StopVolumes = [(1, 1000.0), (2, 1000.0)].into_iter().collect();
        let cfg = config();
        let eval = RouteEvaluator::new(&dm, &volumes, &cfg);
        let routes = clarke_wright_savings(&eval).expect("solvable");
        assert_eq!(routes, vec![vec![0, 1, 2, 0]]);
    }

    #[test]
    fn test_cw_overnight_rest_accepted() {
        // 300 + 20 + 300 miles = 15.5h driving
        let dm = matrix(
            vec![DEPOT, 1, 2],
            &[(DEPOT, 1, 300.0), (DEPOT, 2, 300.0), (1, 2, 20.0)],
        );
        let volumes: StopVolumes = [(1, 1000.0), (2, 1000.0)].into_iter().collect();
        let cfg = config();
        let eval = RouteEvaluator::new(&dm, &volumes, &cfg);
        let routes = clarke_wright_savings(&eval).expect("solvable");
        assert_eq!(routes, vec![vec![0, 1, 2, 0]]);
        let m = eval.evaluate(&routes[0]).expect("valid route");
        assert!(m.needs_overnight_rest);
        assert!(m.duty_hours > 14.0);
        assert!(m.capacity_feasible);
    }

    #[test]
    fn test_cw_duty_ceiling_rejects() {
        let dm = matrix(
            vec![DEPOT, 1, 2],
            &[(DEPOT, 1, 300.0), (DEPOT, 2, 300.0), (1, 2, 20.0)],
        );
        let volumes: StopVolumes = [(1, 1000.0), (2, 1000.0)].into_iter().collect();
        let cfg = config().with_duty_hour_ceiling(24.0);
        let eval = RouteEvaluator::new(&dm, &volumes, &cfg);
        let routes = clarke_wright_savings(&eval).expect("solvable");
        assert_eq!(routes.len(), 2);
    }

    #[test]
    fn test_cw_depot_not_in_matrix() {
        let dm = DistanceMatrix::new(vec![1, 2]);
        let volumes: StopVolumes = [(1, 10.0)].into_iter().collect();
        let cfg = config();
        let eval = RouteEvaluator::new(&dm, &volumes, &cfg);
        assert!(matches!(
            clarke_wright_savings(&eval),
            Err(DispatchError::DepotNotInMatrix { code: DEPOT })
        ));
    }

    #[test]
    fn test_savings_sorted_and_symmetric() {
        let dm = triangle();
        let volumes: StopVolumes = [(1, 1.0), (2, 1.0), (3, 1.0)].into_iter().collect();
        let cfg = config();
        let eval = RouteEvaluator::new(&dm, &volumes, &cfg);
        let savings = savings_list(&eval);
        let values: Vec<f64> = savings.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![190.0, 150.0, 120.0]);
        assert_eq!(pair_saving(&eval, 1, 3), pair_saving(&eval, 3, 1));
    }

    #[test]
    fn test_savings_ties_keep_enumeration_order() {
        // All customers equidistant: every saving is equal
        let dm = matrix(
            vec![DEPOT, 7, 3, 5],
            &[
                (DEPOT, 7, 10.0),
                (DEPOT, 3, 10.0),
                (DEPOT, 5, 10.0),
                (7, 3, 10.0),
                (7, 5, 10.0),
                (3, 5, 10.0),
            ],
        );
        let volumes: StopVolumes = [(7, 1.0), (3, 1.0), (5, 1.0)].into_iter().collect();
        let cfg = config();
        let eval = RouteEvaluator::new(&dm, &volumes, &cfg);
        let pairs: Vec<(usize, usize)> = savings_list(&eval).iter().map(|s| (s.i, s.j)).collect();
        assert_eq!(pairs, vec![(7, 3), (7, 5), (3, 5)]);
    }

    #[test]
    fn test_cw_deterministic() {
        let dm = triangle();
        let volumes: StopVolumes = [(2, 900.0), (3, 1200.0), (1, 1100.0)].into_iter().collect();
        let cfg = config();
        let eval = RouteEvaluator::new(&dm, &volumes, &cfg);
        let first = clarke_wright_savings(&eval).expect("solvable");
        let second = clarke_wright_savings(&eval).expect("solvable");
        assert_eq!(first, second);
    }
}
