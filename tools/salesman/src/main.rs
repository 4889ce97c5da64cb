use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use salesman::cli::{solve_config, Cli, Commands};
use salesman::logging::init_logging;
use salesman::{serve, solve_file};
use salesman_milp::MicroLpSolver;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.solver_output)?;

    match cli.command {
        Commands::Serve(args) => {
            let config = args.resolve_config(cli.solver_output)?;
            let solver = MicroLpSolver::with_max_workers(config.solver_workers);
            serve(config, Arc::new(solver)).await?;
        }
        Commands::Solve {
            input,
            time_limit,
            pretty,
        } => {
            let config = solve_config(time_limit, cli.solver_output);
            let response = tokio::task::spawn_blocking(move || {
                solve_file(&input, &MicroLpSolver::new(), &config)
                    .with_context(|| format!("solving {}", input.display()))
            })
            .await??;

            let json = if pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };
            println!("{json}");
        }
    }

    Ok(())
}
