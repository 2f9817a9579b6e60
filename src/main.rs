mod cli;
mod commands;
mod config;
mod logging;
mod stations;

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use cli::{Cli, Command};
use config::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logger(cli.log_level.as_deref());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::BuildNetwork(args) => commands::build_network(args, config).await,
        Command::RouteSegments(args) => commands::route_segments(args, config).await,
        Command::IngestDemand(args) => commands::ingest_demand(args).await,
        Command::IngestSchedule(args) => commands::ingest_schedule(args).await,
        Command::Fit(args) => commands::fit(args, config).await,
        Command::Transform(args) => commands::transform(args).await,
        Command::Simulate(args) => commands::simulate(args, config).await,
    }
}
