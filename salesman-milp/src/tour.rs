//! Closed tours and their label mapping

use crate::instance::DistanceMatrix;

/// A closed tour in index space, plus the objective the solver reported
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    /// n+1 indices, first == last == 0
    order: Vec<usize>,
    objective: f64,
}

impl Tour {
    pub fn new(order: Vec<usize>, objective: f64) -> Self {
        Self { order, objective }
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Map indices to location labels
    pub fn labels(&self, labels: &[String]) -> Vec<String> {
        self.order.iter().map(|&i| labels[i].clone()).collect()
    }

    /// Sum of distances along consecutive tour edges.
    pub fn edge_cost(&self, distances: &DistanceMatrix) -> f64 {
        self.order
            .windows(2)
            .map(|w| distances.cost(w[0], w[1]))
            .sum()
    }
}

/// Final answer for one request
#[derive(Debug, Clone, PartialEq)]
pub struct TourSolution {
    /// Closed tour as labels (n+1 entries, first == last)
    pub best_path: Vec<String>,
    /// Objective value reported by the solver
    pub min_cost: f64,
    /// Same tour in index space
    pub order: Vec<usize>,
}
