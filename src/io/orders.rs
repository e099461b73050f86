//! Order table ingestion.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{canonical_column, location_code};
use crate::error::DataError;
use crate::models::{Order, Weekday};

/// Orders read from a table, with the depot code found among them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBook {
    /// Customer orders, in file order.
    pub orders: Vec<Order>,
    /// Destination of the depot self-order (order id 0), if the table has one.
    pub depot_code: Option<usize>,
    /// Rows dropped as malformed.
    pub dropped: usize,
}

#[derive(Debug, Deserialize)]
struct OrderRecord {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    orderid: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    tozip: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    cube: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    dayofweek: Option<String>,
}

const REQUIRED: [&str; 3] = ["tozip", "cube", "dayofweek"];

/// Reads orders from CSV.
///
/// Column names are matched loosely (`TOZIP`, `to_zip`, `Destination` all
/// name the destination). Rows with an unreadable destination, volume, or
/// day, or a negative volume, are dropped. The row with order id 0 is the
/// depot's own entry: it is not an order, but its destination is reported
/// as [`OrderBook::depot_code`] and orders to that code are dropped.
///
/// # Examples
///
/// ```
/// use u_dispatch::io::read_orders;
/// use u_dispatch::models::Weekday;
///
/// let data = "ORDERID,TOZIP,CUBE,DayOfWeek\n0,1905,0,Mon\n1,255,1200,Mon\n2,209,oops,Tue\n";
/// let book = read_orders(data.as_bytes()).unwrap();
/// assert_eq!(book.depot_code, Some(1905));
/// assert_eq!(book.orders.len(), 1);
/// assert_eq!(book.orders[0].day, Weekday::Mon);
/// assert_eq!(book.dropped, 1);
/// ```
pub fn read_orders<R: Read>(reader: R) -> Result<OrderBook, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: csv::StringRecord = rdr.headers()?.iter().map(canonical_column).collect();
    for column in REQUIRED {
        if !headers.iter().any(|h| h == column) {
            return Err(DataError::MissingColumn {
                file: "orders",
                column,
            });
        }
    }
    rdr.set_headers(headers);

    let mut book = OrderBook::default();
    for (row, result) in rdr.deserialize::<OrderRecord>().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                warn!(row, %err, "dropping unreadable order row");
                book.dropped += 1;
                continue;
            }
        };

        let destination = record.tozip.and_then(location_code);
        if record.orderid == Some(0.0) {
            if book.depot_code.is_none() {
                book.depot_code = destination;
            }
            continue;
        }

        let volume = record.cube.filter(|v| v.is_finite() && *v >= 0.0);
        let day = record
            .dayofweek
            .as_deref()
            .and_then(|d| d.parse::<Weekday>().ok());
        match (destination, volume, day) {
            (Some(destination), Some(volume), Some(day)) => {
                book.orders.push(Order::new(destination, volume, day));
            }
            _ => {
                warn!(row, ?record, "dropping malformed order row");
                book.dropped += 1;
            }
        }
    }

    if let Some(depot) = book.depot_code {
        let before = book.orders.len();
        book.orders.retain(|o| o.destination != depot);
        let removed = before - book.orders.len();
        if removed > 0 {
            warn!(depot, removed, "dropping orders addressed to the depot");
            book.dropped += removed;
        }
    }

    info!(
        orders = book.orders.len(),
        dropped = book.dropped,
        depot = ?book.depot_code,
        "orders loaded"
    );
    Ok(book)
}

#[derive(Serialize)]
#[serde(rename_all = "UPPERCASE")]
struct OrderRow {
    orderid: usize,
    tozip: usize,
    cube: f64,
    #[serde(rename = "DayOfWeek")]
    day_of_week: Weekday,
}

/// Writes orders as CSV, preceded by the depot's own row (order id 0).
pub fn write_orders<W: Write>(
    writer: W,
    orders: &[Order],
    depot_code: usize,
) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.serialize(OrderRow {
        orderid: 0,
        tozip: depot_code,
        cube: 0.0,
        day_of_week: Weekday::Mon,
    })?;
    for (k, order) in orders.iter().enumerate() {
        wtr.serialize(OrderRow {
            orderid: k + 1,
            tozip: order.destination,
            cube: order.volume,
            day_of_week: order.day,
        })?;
    }
    wtr.flush()?;
    Ok(())
}
