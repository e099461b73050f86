//! Daily and weekly plans.

use serde::Serialize;

use super::{PlannedRoute, Weekday};

/// Aggregate figures over a set of routes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PlanTotals {
    pub num_routes: usize,
    pub total_distance: f64,
    pub duty_hours: f64,
    pub overnight_rests: usize,
}

impl PlanTotals {
    fn from_routes<'a, I: IntoIterator<Item = &'a PlannedRoute>>(routes: I) -> Self {
        routes.into_iter().fold(Self::default(), |mut acc, route| {
            acc.num_routes += 1;
            acc.total_distance += route.metrics.total_distance;
            acc.duty_hours += route.metrics.duty_hours;
            if route.metrics.needs_overnight_rest {
                acc.overnight_rests += 1;
            }
            acc
        })
    }

    /// Adds another set of totals to this one.
    pub fn accumulate(&mut self, other: &PlanTotals) {
        self.num_routes += other.num_routes;
        self.total_distance += other.total_distance;
        self.duty_hours += other.duty_hours;
        self.overnight_rests += other.overnight_rests;
    }

    /// Scales every figure by `factor`; counts are rounded to the nearest integer.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            num_routes: (self.num_routes as f64 * factor).round() as usize,
            total_distance: self.total_distance * factor,
            duty_hours: self.duty_hours * factor,
            overnight_rests: (self.overnight_rests as f64 * factor).round() as usize,
        }
    }
}

/// The routes driven on one delivery day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPlan {
    pub day: Weekday,
    pub routes: Vec<PlannedRoute>,
}

impl DayPlan {
    /// A day without orders.
    pub fn empty(day: Weekday) -> Self {
        Self {
            day,
            routes: Vec::new(),
        }
    }

    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Totals over this day's routes.
    pub fn totals(&self) -> PlanTotals {
        PlanTotals::from_routes(&self.routes)
    }
}

/// Plans for every delivery day of a week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyPlan {
    pub days: Vec<DayPlan>,
    pub weeks_per_year: f64,
}

impl WeeklyPlan {
    /// Returns the plan for `day`, if present.
    pub fn day(&self, day: Weekday) -> Option<&DayPlan> {
        self.days.iter().find(|p| p.day == day)
    }

    /// Iterates over all routes of the week, in day order.
    pub fn routes(&self) -> impl Iterator<Item = (Weekday, &PlannedRoute)> {
        self.days
            .iter()
            .flat_map(|p| p.routes.iter().map(move |r| (p.day, r)))
    }

    /// Totals over the whole week.
    pub fn weekly_totals(&self) -> PlanTotals {
        let mut totals = PlanTotals::default();
        for day in &self.days {
            totals.accumulate(&day.totals());
        }
        totals
    }

    /// Weekly totals extrapolated to a year.
    pub fn annual_estimate(&self) -> PlanTotals {
        self.weekly_totals().scaled(self.weeks_per_year)
    }
}
