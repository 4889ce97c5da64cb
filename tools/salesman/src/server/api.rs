//! HTTP API with Axum and Utoipa

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use salesman_common::{Error, SolveFailure};

use super::state::ServerState;
use super::tsp::{tsp_handler, TspRequest, TspResponse};
use crate::config::ServerConfig;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(super::tsp::tsp_handler, health),
    components(schemas(TspRequest, TspResponse, ErrorResponse, HealthResponse)),
    info(
        title = "Salesman API",
        version = "1.0.0",
        description = "Exact travelling salesman tours via a MILP formulation"
    )
)]
struct ApiDoc;

/// Build the Axum router
pub fn build_router(state: Arc<ServerState>, config: &ServerConfig) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/tsp", post(tsp_handler))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
        .with_state(state)
}

/// `"*"` anywhere in the list allows any origin
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

// ============ Errors ============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    /// Machine-readable code: InvalidInput, TooManyLocations, SolveFailed, TourReconstruction
    pub code: String,
}

/// Error returned by handlers, rendered as `ErrorResponse` JSON
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, error: String) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error,
                code: code.to_string(),
            },
        }
    }

    pub fn too_many_locations(n: usize, max: usize) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "TooManyLocations",
            format!("{n} locations requested, at most {max} supported"),
        )
    }

    pub fn internal(error: String) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal", error)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            Error::SolveFailed(SolveFailure::TimedOut) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.code(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// ============ Health ============

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Active MILP backend
    pub solver: String,
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is healthy", body = HealthResponse),
    )
)]
async fn health(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        solver: state.solver.name().to_string(),
    })
}
