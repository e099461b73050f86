//! Distance table ingestion.

use std::io::{Read, Write};

use tracing::{info, warn};

use super::parse_code;
use crate::distance::DistanceMatrix;
use crate::error::DataError;

/// Reads a square distance table from CSV.
///
/// The header row holds destination codes after a leading index column; each
/// following row starts with its origin code. Empty, unparsable, or negative
/// cells are missing entries. Codes may be written as `255` or `255.0`.
///
/// Lookups are by real location code; route placeholders are mapped through
/// [`DispatchConfig::resolve`](crate::config::DispatchConfig::resolve).
///
/// # Examples
///
/// ```
/// use u_dispatch::io::read_distance_matrix;
///
/// let data = ",1905,255\n1905,0,50\n255,50,\n";
/// let dm = read_distance_matrix(data.as_bytes()).unwrap();
/// assert_eq!(dm.get(1905, 255), Some(50.0));
/// assert_eq!(dm.get(255, 255), None);
/// ```
pub fn read_distance_matrix<R: Read>(reader: R) -> Result<DistanceMatrix, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns = rdr
        .headers()?
        .iter()
        .skip(1)
        .map(|label| {
            parse_code(label).ok_or_else(|| DataError::BadMatrixLabel {
                label: label.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let Some(label) = record.get(0) else {
            continue;
        };
        let origin = parse_code(label).ok_or_else(|| DataError::BadMatrixLabel {
            label: label.to_string(),
        })?;
        let cells: Vec<Option<f64>> = record
            .iter()
            .skip(1)
            .map(|cell| cell.parse::<f64>().ok().filter(|d| d.is_finite() && *d >= 0.0))
            .collect();
        if cells.len() != columns.len() {
            warn!(
                origin,
                cells = cells.len(),
                expected = columns.len(),
                "distance row length differs from header"
            );
        }
        rows.push((origin, cells));
    }

    if columns.is_empty() || rows.is_empty() {
        return Err(DataError::EmptyMatrix);
    }

    let mut labels = columns.clone();
    for (origin, _) in &rows {
        if !labels.contains(origin) {
            labels.push(*origin);
        }
    }

    let mut matrix = DistanceMatrix::new(labels);
    for (origin, cells) in rows {
        for (&destination, cell) in columns.iter().zip(cells) {
            if let Some(d) = cell {
                matrix.set(origin, destination, d);
            }
        }
    }

    info!(
        locations = matrix.size(),
        missing = matrix.num_missing(),
        "distance matrix loaded"
    );
    Ok(matrix)
}

/// Writes a matrix as a square CSV table; missing cells are left empty.
pub fn write_distance_matrix<W: Write>(
    writer: W,
    matrix: &DistanceMatrix,
) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    let labels = matrix.labels();

    let mut header = vec![String::new()];
    header.extend(labels.iter().map(|l| l.to_string()));
    wtr.write_record(&header)?;

    for &from in labels {
        let mut row = vec![from.to_string()];
        row.extend(
            labels
                .iter()
                .map(|&to| matrix.get(from, to).map(|d| d.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}
