//! End-to-end tests for the HTTP API
//!
//! Each test binds an ephemeral port, serves the real router and talks to it
//! over HTTP.

use serde_json::{json, Value};
use std::sync::Arc;

use salesman::server::tsp::TspResponse;
use salesman::server::{build_router, ServerState};
use salesman::ServerConfig;
use salesman_milp::{
    AssignmentMatrix, MicroLpSolver, MilpSolver, SolveOutcome, SolverConfig, TspModel,
};

/// Always answers with the same outcome
struct FixedSolver(SolveOutcome);

impl MilpSolver for FixedSolver {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn optimize(&self, _model: &TspModel, _config: &SolverConfig) -> SolveOutcome {
        self.0.clone()
    }
}

async fn spawn_server(solver: Arc<dyn MilpSolver>, config: ServerConfig) -> String {
    let state = Arc::new(ServerState::new(solver, &config));
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn unit_square_body() -> Value {
    let d = std::f64::consts::SQRT_2;
    json!({
        "cities": ["A", "B", "C", "D"],
        "distances": [
            [0.0, 1.0, d, 1.0],
            [1.0, 0.0, 1.0, d],
            [d, 1.0, 0.0, 1.0],
            [1.0, d, 1.0, 0.0]
        ]
    })
}

#[tokio::test]
async fn test_tsp_unit_square() {
    let base = spawn_server(Arc::new(MicroLpSolver::new()), ServerConfig::default()).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/tsp"))
        .json(&unit_square_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: TspResponse = resp.json().await.unwrap();
    assert_eq!(body.best_path.len(), 5);
    assert_eq!(body.best_path.first(), body.best_path.last());
    assert!((body.min_cost - 4.0).abs() < 1e-6, "cost {}", body.min_cost);
}

#[tokio::test]
async fn test_tsp_hexagon() {
    // Regular hexagon with unit radius: sides have length 1, perimeter 6
    let points: Vec<(f64, f64)> = (0..6)
        .map(|k| {
            let a = k as f64 * std::f64::consts::PI / 3.0;
            (a.cos(), a.sin())
        })
        .collect();
    let distances: Vec<Vec<f64>> = points
        .iter()
        .map(|a| {
            points
                .iter()
                .map(|b| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt())
                .collect()
        })
        .collect();
    let base = spawn_server(Arc::new(MicroLpSolver::new()), ServerConfig::default()).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/tsp"))
        .json(&json!({
            "cities": ["P0", "P1", "P2", "P3", "P4", "P5"],
            "distances": distances
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: TspResponse = resp.json().await.unwrap();
    assert_eq!(body.best_path.len(), 7);
    assert_eq!(body.best_path[0], "P0");
    assert_eq!(body.best_path.last().map(String::as_str), Some("P0"));
    assert!((body.min_cost - 6.0).abs() < 1e-6, "cost {}", body.min_cost);
}

#[tokio::test]
async fn test_tsp_dimension_mismatch_is_400() {
    let base = spawn_server(Arc::new(MicroLpSolver::new()), ServerConfig::default()).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/tsp"))
        .json(&json!({
            "cities": ["A", "B", "C"],
            "distances": [[0, 1], [1, 0]]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "InvalidInput");
}

#[tokio::test]
async fn test_tsp_too_many_locations_is_400() {
    let config = ServerConfig {
        max_locations: 3,
        ..ServerConfig::default()
    };
    let base = spawn_server(Arc::new(MicroLpSolver::new()), config).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/tsp"))
        .json(&unit_square_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "TooManyLocations");
}

#[tokio::test]
async fn test_tsp_solver_failure_is_500() {
    let base = spawn_server(
        Arc::new(FixedSolver(SolveOutcome::Infeasible)),
        ServerConfig::default(),
    )
    .await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/tsp"))
        .json(&unit_square_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "SolveFailed");
}

#[tokio::test]
async fn test_tsp_timeout_is_504() {
    let base = spawn_server(
        Arc::new(FixedSolver(SolveOutcome::TimedOut)),
        ServerConfig::default(),
    )
    .await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/tsp"))
        .json(&unit_square_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 504);
}

#[tokio::test]
async fn test_tsp_sub_cycles_are_500() {
    let solver = FixedSolver(SolveOutcome::Optimal {
        assignment: AssignmentMatrix::from_edges(4, &[(0, 1), (1, 0), (2, 3), (3, 2)]),
        objective: 4.0,
    });
    let base = spawn_server(Arc::new(solver), ServerConfig::default()).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/tsp"))
        .json(&unit_square_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "TourReconstruction");
}

#[tokio::test]
async fn test_malformed_json_is_client_error() {
    let base = spawn_server(Arc::new(MicroLpSolver::new()), ServerConfig::default()).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/tsp"))
        .header("content-type", "application/json")
        .body(r#"{"cities": "A,B"}"#)
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_client_error(), "status {}", resp.status());
}

#[tokio::test]
async fn test_health() {
    let base = spawn_server(Arc::new(MicroLpSolver::new()), ServerConfig::default()).await;

    let body: Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["solver"], "microlp");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let base = spawn_server(Arc::new(MicroLpSolver::new()), ServerConfig::default()).await;

    let body: Value = reqwest::get(format!("{base}/api-docs/openapi.json"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body["paths"]["/tsp"]["post"].is_object());
}
