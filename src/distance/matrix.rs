//! Labelled distance matrix.

use std::collections::HashMap;

/// A dense n×n distance matrix keyed by location code, stored in row-major order.
///
/// Cells may be missing. A missing cell is reported as `None` by [`get`](Self::get),
/// never as zero. Route identifiers such as the depot placeholder are mapped
/// onto matrix codes by [`DispatchConfig::resolve`](crate::config::DispatchConfig::resolve)
/// before lookup.
///
/// # Examples
///
/// ```
/// use u_dispatch::distance::DistanceMatrix;
///
/// let mut dm = DistanceMatrix::new(vec![1905, 255, 209]);
/// dm.set(1905, 255, 50.0);
/// assert_eq!(dm.get(1905, 255), Some(50.0));
/// assert_eq!(dm.get(0, 255), None);
/// assert_eq!(dm.get(255, 209), None);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    labels: Vec<usize>,
    index: HashMap<usize, usize>,
    data: Vec<Option<f64>>,
}

impl DistanceMatrix {
    /// Creates a matrix over the given location codes with every cell missing.
    ///
    /// Repeated labels keep their first position.
    pub fn new(labels: Vec<usize>) -> Self {
        let size = labels.len();
        Self {
            index: Self::build_index(&labels),
            labels,
            data: vec![None; size * size],
        }
    }

    /// Creates a matrix from an explicit row-major grid.
    ///
    /// Returns `None` if the data length doesn't match `labels.len()²`.
    pub fn from_data(labels: Vec<usize>, data: Vec<Option<f64>>) -> Option<Self> {
        if data.len() != labels.len() * labels.len() {
            return None;
        }
        Some(Self {
            index: Self::build_index(&labels),
            labels,
            data,
        })
    }

    fn build_index(labels: &[usize]) -> HashMap<usize, usize> {
        let mut index = HashMap::with_capacity(labels.len());
        for (pos, &label) in labels.iter().enumerate() {
            index.entry(label).or_insert(pos);
        }
        index
    }

    fn position(&self, code: usize) -> Option<usize> {
        self.index.get(&code).copied()
    }

    /// Returns the distance from `from` to `to`, or `None` if the entry is missing.
    pub fn get(&self, from: usize, to: usize) -> Option<f64> {
        let row = self.position(from)?;
        let col = self.position(to)?;
        self.data[row * self.labels.len() + col]
    }

    /// Sets the distance from `from` to `to`.
    ///
    /// Returns `false` (and stores nothing) if either location is unknown.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) -> bool {
        match (self.position(from), self.position(to)) {
            (Some(row), Some(col)) => {
                let size = self.labels.len();
                self.data[row * size + col] = Some(distance);
                true
            }
            _ => false,
        }
    }

    /// Returns `true` if the location has a row in this matrix.
    pub fn contains(&self, id: usize) -> bool {
        self.position(id).is_some()
    }

    /// Location codes in row order.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    /// Number of missing cells, diagonal excluded.
    pub fn num_missing(&self) -> usize {
        let size = self.labels.len();
        self.data
            .iter()
            .enumerate()
            .filter(|(k, cell)| k / size != k % size && cell.is_none())
            .count()
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    ///
    /// A cell missing on one side only counts as asymmetric.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        let size = self.labels.len();
        for i in 0..size {
            for j in (i + 1)..size {
                match (self.data[i * size + j], self.data[j * size + i]) {
                    (Some(a), Some(b)) if (a - b).abs() <= tol => {}
                    (None, None) => {}
                    _ => return false,
                }
            }
        }
        true
    }
}
