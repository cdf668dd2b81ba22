//! ## havsvakt-cli
//! **Operator entrypoint**
//! Runs the geofence alerting service, a single evaluation cycle, or a
//! one-off point-in-geofence check.

use clap::Parser;

mod commands;
mod error;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    commands::run_command(cli).await
}
