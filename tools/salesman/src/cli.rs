//! CLI commands for salesman

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use salesman_milp::SolverConfig;

use crate::config::ServerConfig;
use crate::logging::LogFormat;

#[derive(Parser)]
#[command(name = "salesman")]
#[command(about = "Optimal travelling salesman tours via MILP", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    /// Let the MILP backend's own log output through
    #[arg(long, global = true)]
    pub solver_output: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve(ServeArgs),

    /// Solve a single request file and print the JSON response
    Solve {
        /// JSON file shaped like the POST /tsp body
        #[arg(short, long)]
        input: PathBuf,

        /// Solver time budget in seconds
        #[arg(long)]
        time_limit: Option<f64>,

        /// Pretty-print the JSON response
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Solver time budget in seconds per request
    #[arg(long)]
    pub time_limit: Option<f64>,

    /// Largest accepted instance
    #[arg(long)]
    pub max_locations: Option<usize>,

    /// Most solver threads alive at once
    #[arg(long)]
    pub solver_workers: Option<usize>,

    /// Allowed CORS origin (repeatable, "*" for any)
    #[arg(long = "cors-origin")]
    pub cors_origins: Vec<String>,
}

impl ServeArgs {
    /// Defaults, then the config file, then explicit flags
    pub fn resolve_config(&self, solver_output: bool) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };

        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(limit) = self.time_limit {
            config.solver.time_limit_secs = Some(limit);
        }
        if let Some(max) = self.max_locations {
            config.max_locations = max;
        }
        if let Some(workers) = self.solver_workers {
            config.solver_workers = workers;
        }
        if !self.cors_origins.is_empty() {
            config.cors_origins = self.cors_origins.clone();
        }
        config.solver.log_output |= solver_output;

        Ok(config)
    }
}

/// Solver settings for the `solve` command
pub fn solve_config(time_limit: Option<f64>, solver_output: bool) -> SolverConfig {
    SolverConfig {
        time_limit_secs: time_limit,
        log_output: solver_output,
        ..SolverConfig::default()
    }
}
