//! One-shot solving from a JSON request file (the `solve` command)

use std::path::Path;

use salesman_common::Result;
use salesman_milp::{MilpSolver, SolverConfig};

use crate::server::tsp::{TspRequest, TspResponse};

/// Read a `POST /tsp`-shaped JSON file and solve it
pub fn solve_file(
    path: &Path,
    solver: &dyn MilpSolver,
    config: &SolverConfig,
) -> Result<TspResponse> {
    let text = std::fs::read_to_string(path)?;
    let request: TspRequest = serde_json::from_str(&text)?;
    let solution = salesman_milp::solve(request.cities, &request.distances, solver, config)?;
    Ok(solution.into())
}
