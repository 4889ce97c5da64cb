//! Validated TSP instances
//!
//! An instance is an ordered list of unique location labels plus an n×n
//! distance matrix. Position 0 is the implicit tour start.

use salesman_common::{Error, Result};
use std::collections::HashSet;

/// Flat n×n cost matrix where `data[i * n + j]` = distance from location i to j.
///
/// Not required to be symmetric; the diagonal is ignored by the formulation.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Build from row-major rows, rejecting non-square or non-finite input.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);

        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(Error::InvalidInput(format!(
                    "Distance matrix must be square: row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
            for (j, &d) in row.iter().enumerate() {
                if !d.is_finite() {
                    return Err(Error::InvalidInput(format!(
                        "Distance from {i} to {j} is not a finite number"
                    )));
                }
                data.push(d);
            }
        }

        Ok(Self { n, data })
    }

    /// Dimension of the matrix
    pub fn n(&self) -> usize {
        self.n
    }

    /// Distance from i to j
    #[inline]
    pub fn cost(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// True when d[i][j] == d[j][i] for every pair
    pub fn is_symmetric(&self) -> bool {
        (0..self.n).all(|i| (i + 1..self.n).all(|j| self.cost(i, j) == self.cost(j, i)))
    }
}

/// A validated request: labels and a matching distance matrix
#[derive(Debug, Clone)]
pub struct Instance {
    labels: Vec<String>,
    distances: DistanceMatrix,
}

impl Instance {
    /// Validate labels against the distance rows.
    ///
    /// Fails with `InvalidInput` when there are no labels, when labels repeat,
    /// or when the matrix is not square with dimension equal to the label count.
    /// Non-negativity and symmetry are deliberately not checked.
    pub fn new(labels: Vec<String>, rows: &[Vec<f64>]) -> Result<Self> {
        let n = labels.len();
        if n == 0 {
            return Err(Error::InvalidInput(
                "At least one location is required".to_string(),
            ));
        }

        if rows.len() != n || rows.iter().any(|row| row.len() != n) {
            return Err(Error::InvalidInput(format!(
                "Distance matrix must be square and match number of cities ({} cities, {} rows)",
                n,
                rows.len()
            )));
        }

        let mut seen = HashSet::with_capacity(n);
        for label in &labels {
            if !seen.insert(label.as_str()) {
                return Err(Error::InvalidInput(format!(
                    "Duplicate location label '{label}'"
                )));
            }
        }

        let distances = DistanceMatrix::from_rows(rows)?;

        Ok(Self { labels, distances })
    }

    /// Number of locations
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Never true for a validated instance
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Location labels in request order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Distance matrix, indexed like `labels`
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }
}
