//! Common utilities for the salesman toolkit

pub mod error;

pub use error::{Error, Result, SolveFailure};
