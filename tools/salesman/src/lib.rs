pub mod cli;
pub mod config;
pub mod logging;
pub mod server;
pub mod solve;

pub use config::ServerConfig;
pub use server::serve;
pub use solve::solve_file;
