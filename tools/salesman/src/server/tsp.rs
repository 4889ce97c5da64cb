//! `POST /tsp` - optimal closed tour through all locations
//!
//! The request carries location labels and a row-major distance matrix
//! (row i, column j = distance from i to j). The tour always starts and ends
//! at the first location.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use utoipa::ToSchema;

use super::api::{ApiError, ErrorResponse};
use super::state::ServerState;

/// Request for TSP optimization
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct TspRequest {
    /// Location labels; the first one is the start of the tour
    #[schema(example = json!(["A", "B", "C", "D"]))]
    pub cities: Vec<String>,
    /// n×n distances, `distances[i][j]` = cost from city i to city j
    #[schema(example = json!([[0, 1, 1.414, 1], [1, 0, 1, 1.414], [1.414, 1, 0, 1], [1, 1.414, 1, 0]]))]
    pub distances: Vec<Vec<f64>>,
}

/// Optimal closed tour
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct TspResponse {
    /// n+1 labels, first == last
    #[schema(example = json!(["A", "B", "C", "D", "A"]))]
    pub best_path: Vec<String>,
    /// Total tour cost
    #[schema(example = 4.0)]
    pub min_cost: f64,
}

impl From<salesman_milp::TourSolution> for TspResponse {
    fn from(solution: salesman_milp::TourSolution) -> Self {
        Self {
            best_path: solution.best_path,
            min_cost: solution.min_cost,
        }
    }
}

/// Solve a TSP instance to optimality
#[utoipa::path(
    post,
    path = "/tsp",
    request_body = TspRequest,
    responses(
        (status = 200, description = "Optimal tour found", body = TspResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "No optimal solution found", body = ErrorResponse),
        (status = 504, description = "Solver time budget exceeded", body = ErrorResponse),
    ),
    tag = "tsp"
)]
pub async fn tsp_handler(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<TspRequest>,
) -> Result<Json<TspResponse>, ApiError> {
    let n = req.cities.len();
    if n > state.max_locations {
        return Err(ApiError::too_many_locations(n, state.max_locations));
    }

    // The solve is CPU-bound; keep it off the async workers
    let worker_state = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || {
        salesman_milp::solve(
            req.cities,
            &req.distances,
            worker_state.solver.as_ref(),
            &worker_state.solver_config,
        )
    })
    .await
    .map_err(|e| ApiError::internal(format!("solver task failed: {e}")))?;

    match result {
        Ok(solution) => Ok(Json(solution.into())),
        Err(e) => {
            warn!(n, error = %e, "tsp request failed");
            Err(e.into())
        }
    }
}
