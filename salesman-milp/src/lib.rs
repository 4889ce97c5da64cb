//! Exact TSP through a MILP formulation
//!
//! Pipeline for one request:
//!
//! 1. [`Instance::new`] validates labels against the distance matrix
//! 2. [`formulate`] builds the Miller–Tucker–Zemlin model
//! 3. a [`MilpSolver`] backend optimizes it
//! 4. [`extract_tour`] walks the binary assignment into a closed tour
//!
//! Nothing is shared between requests except the read-only solver and its
//! [`SolverConfig`].

pub mod extract;
pub mod formulation;
pub mod instance;
pub mod microlp;
pub mod solver;
pub mod tour;

pub use extract::extract_tour;
pub use formulation::{formulate, TspModel, START};
pub use instance::{DistanceMatrix, Instance};
pub use microlp::MicroLpSolver;
pub use solver::{AssignmentMatrix, MilpSolver, SolveOutcome, SolverConfig};
pub use tour::{Tour, TourSolution};

use salesman_common::{Error, Result};
use std::time::Instant;
use tracing::{debug, info, info_span, warn};

/// Validate a raw request and solve it.
///
/// Validation failures are returned before the solver is touched.
pub fn solve(
    labels: Vec<String>,
    rows: &[Vec<f64>],
    solver: &dyn MilpSolver,
    config: &SolverConfig,
) -> Result<TourSolution> {
    let instance = Instance::new(labels, rows)?;
    solve_instance(&instance, solver, config)
}

/// Solve a validated instance to optimality.
///
/// Fails with `SolveFailed` on any non-optimal outcome and with
/// `TourReconstruction` if the optimal assignment is not one Hamiltonian cycle.
pub fn solve_instance(
    instance: &Instance,
    solver: &dyn MilpSolver,
    config: &SolverConfig,
) -> Result<TourSolution> {
    let n = instance.len();
    let span = info_span!("solve", n, solver = solver.name());
    let _enter = span.enter();
    let start = Instant::now();

    // A single location has no off-diagonal edge, so the degree constraints
    // cannot be satisfied; the only closed tour is the trivial one.
    if n == 1 {
        debug!("single location, solver skipped");
        let label = instance.labels()[START].clone();
        return Ok(TourSolution {
            best_path: vec![label.clone(), label],
            min_cost: 0.0,
            order: vec![START, START],
        });
    }

    let model = formulate(instance.distances());
    debug!(
        variables = model.variable_count(),
        constraints = model.constraints().len(),
        symmetric = instance.distances().is_symmetric(),
        "model formulated"
    );

    let (assignment, objective) = solver.optimize(&model, config).into_optimal()?;

    if assignment.n() != n {
        return Err(Error::TourReconstruction(format!(
            "solver returned a {}x{} assignment for {} locations",
            assignment.n(),
            assignment.n(),
            n
        )));
    }

    let tour = Tour::new(extract_tour(&assignment)?, objective);

    let recomputed = tour.edge_cost(instance.distances());
    if (recomputed - objective).abs() > 1e-6 * objective.abs().max(1.0) {
        warn!(
            objective,
            recomputed, "solver objective differs from the tour's edge sum"
        );
    }

    info!(
        cost = objective,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "optimal tour found"
    );

    Ok(TourSolution {
        best_path: tour.labels(instance.labels()),
        min_cost: tour.objective(),
        order: tour.order().to_vec(),
    })
}
