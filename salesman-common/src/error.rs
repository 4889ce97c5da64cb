//! Error types for the salesman toolkit
//!
//! Three failure families matter to callers:
//! - `InvalidInput`: the request itself is malformed (client fault, never retried)
//! - `SolveFailed`: the MILP backend did not return an optimal solution
//! - `TourReconstruction`: the backend's assignment is not a single Hamiltonian cycle
//!
//! The last one always indicates a formulation or backend contract bug and must
//! be surfaced as-is.

use std::fmt;

/// Why the MILP backend did not produce an optimal solution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveFailure {
    /// The model has no feasible assignment
    Infeasible,
    /// The objective is unbounded below
    Unbounded,
    /// The configured time budget elapsed before optimality was proven
    TimedOut,
    /// Any other backend failure, with the backend's message
    Backend(String),
}

impl fmt::Display for SolveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveFailure::Infeasible => write!(f, "model is infeasible"),
            SolveFailure::Unbounded => write!(f, "model is unbounded"),
            SolveFailure::TimedOut => write!(f, "time limit reached before optimality"),
            SolveFailure::Backend(msg) => write!(f, "backend error: {msg}"),
        }
    }
}

/// Main error type for salesman operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or mismatched request (empty, non-square, duplicate labels...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The solver returned something other than an optimal solution
    #[error("No optimal solution found: {0}")]
    SolveFailed(SolveFailure),

    /// The solver's assignment matrix is not a single closed tour
    #[error("Tour reconstruction failed: {0}")]
    TourReconstruction(String),

    /// File I/O error (request or config files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the caller is at fault (maps to a 4xx response)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidInput(_) | Error::Json(_))
    }

    /// Short machine-readable code used in API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "InvalidInput",
            Error::SolveFailed(_) => "SolveFailed",
            Error::TourReconstruction(_) => "TourReconstruction",
            Error::Io(_) => "Io",
            Error::Json(_) => "InvalidJson",
        }
    }
}

impl From<SolveFailure> for Error {
    fn from(failure: SolveFailure) -> Self {
        Error::SolveFailed(failure)
    }
}

/// Convenience result type for salesman operations
pub type Result<T> = std::result::Result<T, Error>;
