//! Weekly planning: one independent savings solve per delivery day.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::DispatchConfig;
use crate::constructive::clarke_wright_savings;
use crate::distance::DistanceMatrix;
use crate::error::DispatchError;
use crate::evaluation::RouteEvaluator;
use crate::models::{DayPlan, Order, PlannedRoute, StopVolumes, Weekday, WeeklyPlan};

/// Options for [`plan_week`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanOptions {
    /// Solve the days concurrently. The result is identical to a sequential run.
    pub parallel: bool,
}

/// Builds and evaluates the routes for one day's aggregated volumes.
///
/// # Errors
///
/// Fails only on structural problems: the depot missing from the matrix, or
/// a route the evaluator cannot accept as input.
pub fn solve_day(
    volumes: &StopVolumes,
    distances: &DistanceMatrix,
    config: &DispatchConfig,
) -> Result<Vec<PlannedRoute>, DispatchError> {
    let evaluator = RouteEvaluator::new(distances, volumes, config);
    let routes = clarke_wright_savings(&evaluator)?;

    routes
        .into_iter()
        .map(|stops| {
            let metrics = evaluator.evaluate(&stops)?;
            if let Some((from, to)) = metrics.missing_distance {
                warn!(?stops, from, to, "route has a segment without distance");
            }
            Ok(PlannedRoute { stops, metrics })
        })
        .collect()
}

fn plan_day(
    day: Weekday,
    orders: &[Order],
    distances: &DistanceMatrix,
    config: &DispatchConfig,
) -> Result<DayPlan, DispatchError> {
    let volumes = StopVolumes::from_orders(orders.iter().filter(|o| o.day == day));
    if volumes.is_empty() {
        return Ok(DayPlan::empty(day));
    }

    let routes = solve_day(&volumes, distances, config)?;
    let plan = DayPlan { day, routes };
    let totals = plan.totals();
    info!(
        %day,
        customers = volumes.len(),
        routes = totals.num_routes,
        distance = totals.total_distance,
        duty_hours = totals.duty_hours,
        overnight = totals.overnight_rests,
        "day solved"
    );
    Ok(plan)
}

/// Plans every delivery day of the week.
///
/// Orders are grouped by day; each day is solved from scratch with no state
/// shared between days. Days without orders are present with no routes.
/// Orders addressed to the depot itself are skipped.
///
/// # Errors
///
/// Invalid configuration, or the depot missing from the distance matrix
/// while there are orders to route.
///
/// # Examples
///
/// ```
/// use u_dispatch::config::DispatchConfig;
/// use u_dispatch::distance::DistanceMatrix;
/// use u_dispatch::models::{Order, Weekday};
/// use u_dispatch::planner::{plan_week, PlanOptions};
///
/// let mut dm = DistanceMatrix::new(vec![0, 1, 2]);
/// for (a, b, d) in [(0, 1, 30.0), (0, 2, 40.0), (1, 2, 10.0)] {
///     dm.set(a, b, d);
///     dm.set(b, a, d);
/// }
/// let orders = vec![
///     Order::new(1, 500.0, Weekday::Mon),
///     Order::new(2, 700.0, Weekday::Mon),
///     Order::new(2, 100.0, Weekday::Thu),
/// ];
///
/// let plan = plan_week(&orders, &dm, &DispatchConfig::default(), PlanOptions::default()).unwrap();
/// assert_eq!(plan.days.len(), 5);
/// assert_eq!(plan.day(Weekday::Mon).unwrap().num_routes(), 1);
/// assert_eq!(plan.day(Weekday::Tue).unwrap().num_routes(), 0);
/// assert_eq!(plan.weekly_totals().total_distance, 80.0 + 80.0);
/// ```
pub fn plan_week(
    orders: &[Order],
    distances: &DistanceMatrix,
    config: &DispatchConfig,
    options: PlanOptions,
) -> Result<WeeklyPlan, DispatchError> {
    config.validate()?;
    let depot = config.depot();
    if !orders.is_empty() && !distances.contains(depot) {
        return Err(DispatchError::DepotNotInMatrix { code: depot });
    }

    let customer_orders: Vec<Order> = orders
        .iter()
        .filter(|o| !config.is_depot(o.destination))
        .cloned()
        .collect();
    let skipped = orders.len() - customer_orders.len();
    if skipped > 0 {
        warn!(depot, skipped, "skipping orders addressed to the depot");
    }
    let orders = customer_orders.as_slice();

    let days: &[Weekday] = &Weekday::ALL;
    let days = if options.parallel {
        days.par_iter()
            .map(|&day| plan_day(day, orders, distances, config))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        days.iter()
            .map(|&day| plan_day(day, orders, distances, config))
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(WeeklyPlan {
        days,
        weeks_per_year: config.weeks_per_year,
    })
}
