//! Tour reconstruction from the solver's assignment matrix
//!
//! Starting at node 0, follow the unique used outgoing edge of each node until
//! every node has been visited, then close the cycle. The walk is bounded to n
//! steps and fails on anything that is not a single Hamiltonian cycle:
//! disjoint sub-cycles, nodes without (or with several) outgoing edges, or a
//! last node that does not lead back to the start.

use salesman_common::{Error, Result};

use crate::formulation::START;
use crate::solver::AssignmentMatrix;

/// Walk the directed cycle through `assignment`.
///
/// Returns n+1 node indices, starting and ending at node 0.
pub fn extract_tour(assignment: &AssignmentMatrix) -> Result<Vec<usize>> {
    let n = assignment.n();
    if n == 0 {
        return Err(Error::TourReconstruction(
            "assignment matrix is empty".to_string(),
        ));
    }

    let mut visited = vec![false; n];
    let mut tour = Vec::with_capacity(n + 1);
    let mut current = START;

    for step in 0..n {
        if visited[current] {
            return Err(Error::TourReconstruction(format!(
                "walk returned to node {} after visiting {} of {} nodes (disconnected sub-cycles)",
                current, step, n
            )));
        }
        visited[current] = true;
        tour.push(current);
        current = successor(assignment, current)?;
    }

    if current != START {
        return Err(Error::TourReconstruction(format!(
            "after visiting all {n} nodes the walk continues to node {current} instead of closing at node {START}"
        )));
    }

    tour.push(START);
    Ok(tour)
}

/// The single used edge leaving `node`
fn successor(assignment: &AssignmentMatrix, node: usize) -> Result<usize> {
    let mut targets = assignment.successors(node);
    match (targets.next(), targets.next()) {
        (Some(next), None) => Ok(next),
        (None, _) => Err(Error::TourReconstruction(format!(
            "node {node} has no outgoing edge"
        ))),
        (Some(a), Some(b)) => Err(Error::TourReconstruction(format!(
            "node {node} has several outgoing edges (to {a} and {b})"
        ))),
    }
}
