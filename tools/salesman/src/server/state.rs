//! Server state shared by all requests
//!
//! Everything here is read-only after startup. Each request formulates and
//! solves its own model; only the (stateless) backend and its configuration
//! are shared.

use std::sync::Arc;

use salesman_milp::{MilpSolver, SolverConfig};

use crate::config::ServerConfig;

pub struct ServerState {
    pub solver: Arc<dyn MilpSolver>,
    pub solver_config: SolverConfig,
    pub max_locations: usize,
}

impl ServerState {
    pub fn new(solver: Arc<dyn MilpSolver>, config: &ServerConfig) -> Self {
        Self {
            solver,
            solver_config: config.solver.clone(),
            max_locations: config.max_locations,
        }
    }
}
