//! Solver boundary
//!
//! The combinatorial search is delegated to an external MILP backend. The
//! core only needs `optimize(model) -> outcome`; any backend implementing
//! [`MilpSolver`] can be swapped in.

use serde::Deserialize;
use std::time::Duration;

use salesman_common::SolveFailure;

use crate::formulation::TspModel;

/// Solver settings passed explicitly into every call.
///
/// Read-only once built; shared by concurrent requests without locking.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Wall-clock budget per solve in seconds (`None` = unlimited)
    pub time_limit_secs: Option<f64>,
    /// Let the backend's own log output through
    pub log_output: bool,
    /// Edge variables strictly above this value count as used
    pub rounding_threshold: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: None,
            log_output: false,
            rounding_threshold: 0.5,
        }
    }
}

impl SolverConfig {
    /// Time budget as a `Duration`; negative or non-finite values mean unlimited
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_secs = Some(limit.as_secs_f64());
        self
    }
}

/// n×n boolean matrix: `is_used(i, j)` means edge i→j is in the tour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentMatrix {
    n: usize,
    used: Vec<bool>,
}

impl AssignmentMatrix {
    /// All edges unused
    pub fn new(n: usize) -> Self {
        Self {
            n,
            used: vec![false; n * n],
        }
    }

    /// Mark the given directed edges as used
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Self {
        let mut matrix = Self::new(n);
        for &(i, j) in edges {
            matrix.set(i, j, true);
        }
        matrix
    }

    /// Threshold a flat row-major matrix of relaxed values
    pub fn from_values(n: usize, values: &[f64], threshold: f64) -> Self {
        debug_assert_eq!(values.len(), n * n);
        Self {
            n,
            used: values.iter().map(|&v| v > threshold).collect(),
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn set(&mut self, i: usize, j: usize, used: bool) {
        self.used[i * self.n + j] = used;
    }

    #[inline]
    pub fn is_used(&self, i: usize, j: usize) -> bool {
        self.used[i * self.n + j]
    }

    /// Targets of all used edges leaving `i`
    pub fn successors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.n).filter(move |&j| self.is_used(i, j))
    }

    /// Number of used edges
    pub fn edge_count(&self) -> usize {
        self.used.iter().filter(|&&u| u).count()
    }
}

/// Result of one optimization call
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    Optimal {
        assignment: AssignmentMatrix,
        objective: f64,
    },
    Infeasible,
    Unbounded,
    TimedOut,
    Error(String),
}

impl SolveOutcome {
    /// Optimal payload, or the failure a caller should surface.
    /// Non-optimal outcomes never expose a solution matrix.
    pub fn into_optimal(self) -> Result<(AssignmentMatrix, f64), SolveFailure> {
        match self {
            SolveOutcome::Optimal {
                assignment,
                objective,
            } => Ok((assignment, objective)),
            SolveOutcome::Infeasible => Err(SolveFailure::Infeasible),
            SolveOutcome::Unbounded => Err(SolveFailure::Unbounded),
            SolveOutcome::TimedOut => Err(SolveFailure::TimedOut),
            SolveOutcome::Error(msg) => Err(SolveFailure::Backend(msg)),
        }
    }
}

/// A MILP backend able to optimize a [`TspModel`].
///
/// Implementations must build independent state per call: the same solver
/// instance is shared by concurrent requests.
pub trait MilpSolver: Send + Sync {
    /// Backend name for logs and the health endpoint
    fn name(&self) -> &'static str;

    fn optimize(&self, model: &TspModel, config: &SolverConfig) -> SolveOutcome;
}
