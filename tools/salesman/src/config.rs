//! Server configuration
//!
//! Defaults, optionally overlaid by a TOML file, then by CLI flags.
//!
//! ```toml
//! host = "127.0.0.1"
//! port = 8000
//! max_locations = 10
//! solver_workers = 2
//! cors_origins = ["http://localhost:5173"]
//!
//! [solver]
//! time_limit_secs = 30
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use salesman_milp::microlp::DEFAULT_MAX_WORKERS;
use salesman_milp::SolverConfig;

/// Front-end origin allowed by default
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest instance accepted by `POST /tsp`
    pub max_locations: usize,
    /// Allowed CORS origins; `"*"` allows any origin
    pub cors_origins: Vec<String>,
    pub body_limit_bytes: usize,
    /// Most solver threads alive at once, abandoned timed-out ones included
    pub solver_workers: usize,
    pub solver: SolverConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_locations: 12,
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            body_limit_bytes: 1024 * 1024,
            solver_workers: DEFAULT_MAX_WORKERS,
            solver: SolverConfig {
                time_limit_secs: Some(30.0),
                ..SolverConfig::default()
            },
        }
    }
}

impl ServerConfig {
    /// Read a TOML file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
