//! Orders and delivery days.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A delivery weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl Weekday {
    /// All delivery days in calendar order.
    pub const ALL: [Weekday; 5] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];

    /// Three-letter label (`"Mon"`, `"Tue"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
        }
    }

    fn full_stem(&self) -> &'static str {
        match self {
            Weekday::Mon => "mon",
            Weekday::Tue => "tues",
            Weekday::Wed => "wednes",
            Weekday::Thu => "thurs",
            Weekday::Fri => "fri",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a delivery weekday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWeekdayError(pub String);

impl fmt::Display for ParseWeekdayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a delivery weekday", self.0)
    }
}

impl std::error::Error for ParseWeekdayError {}

impl FromStr for Weekday {
    type Err = ParseWeekdayError;

    /// Accepts three-letter abbreviations and full names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let day = match lower.get(..3) {
            Some("mon") => Weekday::Mon,
            Some("tue") => Weekday::Tue,
            Some("wed") => Weekday::Wed,
            Some("thu") => Weekday::Thu,
            Some("fri") => Weekday::Fri,
            _ => return Err(ParseWeekdayError(s.to_string())),
        };
        if lower.len() == 3 || lower == format!("{}day", day.full_stem()) {
            Ok(day)
        } else {
            Err(ParseWeekdayError(s.to_string()))
        }
    }
}

/// One shipment to a destination on a given day.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::{Order, Weekday};
///
/// let order = Order::new(255, 1200.0, Weekday::Tue);
/// assert_eq!(order.destination, 255);
/// assert_eq!(order.day, Weekday::Tue);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Destination location code.
    pub destination: usize,
    /// Cargo volume, non-negative.
    pub volume: f64,
    /// Delivery day.
    pub day: Weekday,
}

impl Order {
    /// Creates a new order.
    pub fn new(destination: usize, volume: f64, day: Weekday) -> Self {
        Self {
            destination,
            volume,
            day,
        }
    }
}
