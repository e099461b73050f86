//! CSV ingestion of orders and distances, and CSV schedule reporting.
//!
//! - [`read_orders`] / [`write_orders`]: order table
//! - [`read_distance_matrix`] / [`write_distance_matrix`]: square distance table
//! - [`write_schedule`]: per-route schedule with weekly and annual totals

mod distances;
mod orders;
mod report;

pub use distances::{read_distance_matrix, write_distance_matrix};
pub use orders::{read_orders, write_orders, OrderBook};
pub use report::write_schedule;

/// Normalizes a column name: lowercase, without spaces, underscores, or dashes.
///
/// A few common synonyms are folded onto the canonical order columns.
fn canonical_column(name: &str) -> String {
    let key: String = name
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect();
    match key.as_str() {
        "destination" | "zip" | "zipcode" => "tozip".to_string(),
        "volume" => "cube".to_string(),
        "day" | "weekday" => "dayofweek".to_string(),
        "id" => "orderid".to_string(),
        _ => key,
    }
}

/// Converts a numeric cell into a location code; rejects fractions and negatives.
fn location_code(value: f64) -> Option<usize> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= usize::MAX as f64 {
        Some(value as usize)
    } else {
        None
    }
}

/// Parses a label such as `"255"` or `"255.0"` into a location code.
fn parse_code(label: &str) -> Option<usize> {
    label.trim().parse::<f64>().ok().and_then(location_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_column() {
        assert_eq!(canonical_column("TOZIP"), "tozip");
        assert_eq!(canonical_column(" To_Zip "), "tozip");
        assert_eq!(canonical_column("DayOfWeek"), "dayofweek");
        assert_eq!(canonical_column("Day"), "dayofweek");
        assert_eq!(canonical_column("Volume"), "cube");
        assert_eq!(canonical_column("ORDER-ID"), "orderid");
        assert_eq!(canonical_column("Unnamed: 0"), "unnamed:0");
    }

    #[test]
    fn test_location_code() {
        assert_eq!(location_code(255.0), Some(255));
        assert_eq!(location_code(0.0), Some(0));
        assert_eq!(location_code(2.5), None);
        assert_eq!(location_code(-1.0), None);
        assert_eq!(location_code(f64::NAN), None);
    }

    #[test]
    fn test_parse_code() {
        assert_eq!(parse_code("1905"), Some(1905));
        assert_eq!(parse_code(" 1905.0 "), Some(1905));
        assert_eq!(parse_code("DC"), None);
        assert_eq!(parse_code(""), None);
    }
}
