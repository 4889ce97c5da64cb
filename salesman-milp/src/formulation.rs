//! MILP formulation of the TSP
//!
//! Builds a solver-agnostic model description from an n×n distance matrix:
//!
//! - binary `x[i,j]` for every ordered pair i ≠ j ("edge i→j is used")
//! - continuous, sign-free `u[i]` for every node i ≠ 0 (visit order potential)
//! - objective: minimize Σ d[i][j]·x[i,j]
//! - out-degree and in-degree of every node equal to 1
//! - Miller–Tucker–Zemlin: u[i] − u[j] + n·x[i,j] ≤ n − 1 for i, j ∈ [1, n−1], i ≠ j
//!
//! The MTZ constraints are anchored at node 0: any cycle avoiding node 0 would
//! need a strictly increasing `u` along itself, which is impossible. The anchor
//! is also the tour start used by the extractor.

use crate::instance::DistanceMatrix;

/// Node that anchors the subtour-elimination constraints and starts every tour
pub const START: usize = 0;

/// A decision variable of the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Var {
    /// Edge `from → to` is part of the tour (binary)
    Edge { from: usize, to: usize },
    /// Visit order potential of a non-start node (continuous, free)
    Order(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Binary,
    Continuous,
}

impl Var {
    pub fn kind(self) -> VarKind {
        match self {
            Var::Edge { .. } => VarKind::Binary,
            Var::Order(_) => VarKind::Continuous,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Eq,
    Le,
}

/// What a constraint enforces, kept for logging and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    OutDegree(usize),
    InDegree(usize),
    Subtour { from: usize, to: usize },
}

/// `Σ coeff·var (sense) rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub kind: ConstraintKind,
    pub terms: Vec<(Var, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

/// Complete model description for one instance.
///
/// Owned by a single request; backends translate it into their own problem
/// representation and never mutate it.
#[derive(Debug, Clone)]
pub struct TspModel {
    n: usize,
    objective: Vec<(Var, f64)>,
    constraints: Vec<LinearConstraint>,
}

impl TspModel {
    /// Number of locations
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn objective(&self) -> &[(Var, f64)] {
        &self.objective
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// n·(n−1) edge variables
    pub fn edge_variable_count(&self) -> usize {
        self.n * self.n.saturating_sub(1)
    }

    /// n−1 order variables
    pub fn order_variable_count(&self) -> usize {
        self.n.saturating_sub(1)
    }

    pub fn variable_count(&self) -> usize {
        self.edge_variable_count() + self.order_variable_count()
    }

    /// Dense column index of a variable: edges first (row-major, diagonal
    /// skipped), then order potentials for nodes 1..n.
    pub fn column(&self, var: Var) -> usize {
        match var {
            Var::Edge { from, to } => {
                debug_assert!(from != to && from < self.n && to < self.n);
                let offset = if to < from { to } else { to - 1 };
                from * (self.n - 1) + offset
            }
            Var::Order(i) => {
                debug_assert!(i >= 1 && i < self.n);
                self.edge_variable_count() + (i - 1)
            }
        }
    }

    /// All variables in column order
    pub fn variables(&self) -> impl Iterator<Item = Var> + '_ {
        let n = self.n;
        let edges = (0..n).flat_map(move |from| {
            (0..n)
                .filter(move |&to| to != from)
                .map(move |to| Var::Edge { from, to })
        });
        edges.chain((1..n).map(Var::Order))
    }

}

/// Build the MTZ model for a distance matrix.
///
/// The matrix type already guarantees squareness; dimension agreement with
/// the label list is checked when the `Instance` is built.
pub fn formulate(distances: &DistanceMatrix) -> TspModel {
    let n = distances.n();

    let mut objective = Vec::with_capacity(n * n.saturating_sub(1));
    for i in 0..n {
        for j in 0..n {
            if i != j {
                objective.push((Var::Edge { from: i, to: j }, distances.cost(i, j)));
            }
        }
    }

    let mtz_count = n.saturating_sub(1) * n.saturating_sub(2);
    let mut constraints = Vec::with_capacity(2 * n + mtz_count);

    // Degree constraints: exactly one edge leaves and one edge enters each node
    for i in 0..n {
        let outgoing = (0..n)
            .filter(|&j| j != i)
            .map(|j| (Var::Edge { from: i, to: j }, 1.0))
            .collect();
        constraints.push(LinearConstraint {
            kind: ConstraintKind::OutDegree(i),
            terms: outgoing,
            sense: Sense::Eq,
            rhs: 1.0,
        });

        let incoming = (0..n)
            .filter(|&j| j != i)
            .map(|j| (Var::Edge { from: j, to: i }, 1.0))
            .collect();
        constraints.push(LinearConstraint {
            kind: ConstraintKind::InDegree(i),
            terms: incoming,
            sense: Sense::Eq,
            rhs: 1.0,
        });
    }

    // Subtour elimination, anchored at START
    let big_m = n as f64;
    for i in (START + 1)..n {
        for j in (START + 1)..n {
            if i == j {
                continue;
            }
            constraints.push(LinearConstraint {
                kind: ConstraintKind::Subtour { from: i, to: j },
                terms: vec![
                    (Var::Order(i), 1.0),
                    (Var::Order(j), -1.0),
                    (Var::Edge { from: i, to: j }, big_m),
                ],
                sense: Sense::Le,
                rhs: big_m - 1.0,
            });
        }
    }

    TspModel {
        n,
        objective,
        constraints,
    }
}
