//! Schedule report.

use std::io::Write;

use serde::Serialize;

use crate::config::DispatchConfig;
use crate::error::DataError;
use crate::models::{PlanTotals, WeeklyPlan};

#[derive(Debug, Default, Serialize)]
struct ScheduleRow {
    #[serde(rename = "Type")]
    kind: Option<&'static str>,
    #[serde(rename = "Day")]
    day: Option<String>,
    #[serde(rename = "Total_Miles")]
    total_miles: Option<f64>,
    #[serde(rename = "Duty_Hours")]
    duty_hours: Option<f64>,
    #[serde(rename = "Sleeper_Required")]
    sleeper_required: Option<String>,
    #[serde(rename = "Route_Structure")]
    route_structure: Option<String>,
    #[serde(rename = "Stops_Count")]
    stops_count: Option<usize>,
    #[serde(rename = "Capacity_Util")]
    capacity_util: Option<String>,
}

impl ScheduleRow {
    fn totals(kind: &'static str, day: String, totals: &PlanTotals) -> Self {
        Self {
            kind: Some(kind),
            day: Some(day),
            total_miles: Some(round2(totals.total_distance)),
            duty_hours: Some(round2(totals.duty_hours)),
            sleeper_required: Some(totals.overnight_rests.to_string()),
            ..Self::default()
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Writes the weekly schedule as CSV.
///
/// One `Route Detail` row per route in day order, then a blank separator
/// row, a `WEEKLY TOTAL` row, and an `ANNUAL ESTIMATE` row.
///
/// # Examples
///
/// ```
/// use u_dispatch::config::DispatchConfig;
/// use u_dispatch::io::write_schedule;
/// use u_dispatch::models::WeeklyPlan;
///
/// let plan = WeeklyPlan { days: vec![], weeks_per_year: 52.0 };
/// let mut out = Vec::new();
/// write_schedule(&mut out, &plan, &DispatchConfig::default()).unwrap();
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.starts_with("Type,Day,Total_Miles,Duty_Hours,Sleeper_Required,"));
/// assert!(text.contains("ANNUAL ESTIMATE,52 Weeks,0.0,0.0,0"));
/// ```
pub fn write_schedule<W: Write>(
    writer: W,
    plan: &WeeklyPlan,
    config: &DispatchConfig,
) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);

    for (day, route) in plan.routes() {
        let metrics = &route.metrics;
        wtr.serialize(ScheduleRow {
            kind: Some("Route Detail"),
            day: Some(day.to_string()),
            total_miles: Some(metrics.total_distance),
            duty_hours: Some(metrics.duty_hours),
            sleeper_required: Some(
                if metrics.needs_overnight_rest { "Yes" } else { "No" }.to_string(),
            ),
            route_structure: Some(format!("{:?}", route.stops)),
            stops_count: Some(route.num_stops()),
            capacity_util: Some(format!(
                "{:.1}%",
                metrics.capacity_utilization(config.max_capacity) * 100.0
            )),
        })?;
    }

    wtr.serialize(ScheduleRow::default())?;
    wtr.serialize(ScheduleRow::totals(
        "WEEKLY TOTAL",
        "ALL".to_string(),
        &plan.weekly_totals(),
    ))?;
    wtr.serialize(ScheduleRow::totals(
        "ANNUAL ESTIMATE",
        format!("{} Weeks", plan.weeks_per_year),
        &plan.annual_estimate(),
    ))?;
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayPlan, PlannedRoute, RouteMetrics, Weekday};

    fn plan() -> WeeklyPlan {
        let metrics = RouteMetrics {
            total_distance: 210.0,
            drive_hours: 5.25,
            duty_hours: 6.75,
            total_volume: 3010.0,
            capacity_feasible: true,
            needs_overnight_rest: false,
            missing_distance: None,
        };
        let far = RouteMetrics {
            total_distance: 620.0,
            drive_hours: 15.5,
            duty_hours: 26.5,
            total_volume: 2000.0,
            capacity_feasible: true,
            needs_overnight_rest: true,
            missing_distance: None,
        };
        WeeklyPlan {
            days: vec![
                DayPlan {
                    day: Weekday::Mon,
                    routes: vec![PlannedRoute {
                        stops: vec![0, 255, 209, 0],
                        metrics,
                    }],
                },
                DayPlan::empty(Weekday::Tue),
                DayPlan {
                    day: Weekday::Wed,
                    routes: vec![PlannedRoute {
                        stops: vec![0, 77, 0],
                        metrics: far,
                    }],
                },
            ],
            weeks_per_year: 52.0,
        }
    }

    #[test]
    fn test_write_schedule() {
        let mut out = Vec::new();
        write_schedule(&mut out, &plan(), &DispatchConfig::default()).expect("writable");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Type,Day,Total_Miles,Duty_Hours,Sleeper_Required,Route_Structure,Stops_Count,Capacity_Util",
                "Route Detail,Mon,210.0,6.75,No,\"[0, 255, 209, 0]\",2,94.1%",
                "Route Detail,Wed,620.0,26.5,Yes,\"[0, 77, 0]\",1,62.5%",
                ",,,,,,,",
                "WEEKLY TOTAL,ALL,830.0,33.25,1,,,",
                "ANNUAL ESTIMATE,52 Weeks,43160.0,1729.0,52,,,",
            ]
        );
    }
}
