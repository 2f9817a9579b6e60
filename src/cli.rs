use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use transitprep_core::prelude::*;

#[derive(Parser, Debug)]
#[command(
    name = "transitprep",
    version,
    about = "Prepare bus-network planning data for simulation",
    long_about = "Builds travel matrices and road geometry for station networks, turns \
                  passenger-event workbooks into demand records, and flattens scenarios \
                  into simulation requests."
)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true, env = "TRANSITPREP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `transitprep_core=trace`
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a network model with every directed station pair
    BuildNetwork(BuildNetworkArgs),
    /// Resolve road geometry along an ordered list of stations
    RouteSegments(RouteSegmentsArgs),
    /// Turn a passenger-event workbook into demand records
    IngestDemand(IngestDemandArgs),
    /// Read departure times from a schedule workbook
    IngestSchedule(IngestScheduleArgs),
    /// Ingest a workbook and fit distributions with the fitting service
    Fit(FitArgs),
    /// Flatten a scenario and its configuration into a simulation request
    Transform(TransformArgs),
    /// Transform and submit the request to the simulation engine
    Simulate(SimulateArgs),
}

#[derive(Args, Debug)]
pub struct BuildNetworkArgs {
    /// Station CSV with `id,name,lon,lat` columns
    #[arg(short, long)]
    pub stations: PathBuf,

    #[arg(long, default_value = "network")]
    pub id: String,

    #[arg(long, default_value = "")]
    pub name: String,

    /// Matrix mode, `local` or `remote`
    #[arg(long)]
    pub mode: Option<MatrixMode>,

    /// Stations per matrix request block
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Above this many stations use the local estimate, 0 for no cap
    #[arg(long)]
    pub max_remote_stations: Option<usize>,

    /// Fail instead of falling back to the local estimate
    #[arg(long)]
    pub strict: bool,

    /// Routing service key
    #[arg(long)]
    pub api_key: Option<String>,

    /// Output JSON file, stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RouteSegmentsArgs {
    /// Station CSV, rows in travel order
    #[arg(short, long)]
    pub stations: PathBuf,

    /// Fail on the first segment without road geometry
    #[arg(long)]
    pub strict: bool,

    #[arg(long)]
    pub api_key: Option<String>,

    /// Output GeoJSON file, stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DemandSource {
    /// xlsx/xls/ods workbook, one sheet per station
    #[arg(short, long)]
    pub workbook: PathBuf,

    /// JSON object mapping sheet names to station ids
    #[arg(long)]
    pub station_map: Option<PathBuf>,

    /// `raw`, `flat` or `day_template`
    #[arg(long, default_value = "raw")]
    pub mode: IngestMode,
}

#[derive(Args, Debug)]
pub struct IngestDemandArgs {
    #[command(flatten)]
    pub source: DemandSource,

    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct IngestScheduleArgs {
    #[arg(short, long)]
    pub workbook: PathBuf,

    #[arg(long)]
    pub project_id: String,

    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct FitArgs {
    #[command(flatten)]
    pub source: DemandSource,

    /// Also emit distribution rows stored under this configuration id
    #[arg(long)]
    pub configuration_id: Option<String>,

    /// Directory for the timestamped result file
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Scenario JSON document
    #[arg(long)]
    pub scenario: PathBuf,

    /// Configuration JSON document
    #[arg(long)]
    pub configuration: PathBuf,

    /// Half-open period, `HH:MM-HH:MM`
    #[arg(long)]
    pub period: String,

    /// Reporting slot length in minutes
    #[arg(long, default_value_t = 60)]
    pub time_slot: u32,
}

#[derive(Args, Debug)]
pub struct TransformArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Directory for the timestamped result file
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_build_network_flags() {
        let cli = Cli::parse_from([
            "transitprep",
            "build-network",
            "--stations",
            "stops.csv",
            "--mode",
            "local",
            "--chunk-size",
            "10",
            "--strict",
        ]);
        let Command::BuildNetwork(args) = cli.command else {
            panic!("wrong subcommand");
        };
        assert_eq!(args.mode, Some(MatrixMode::Local));
        assert_eq!(args.chunk_size, Some(10));
        assert!(args.strict);
        assert_eq!(args.id, "network");
    }

    #[test]
    fn test_ingest_mode_flag() {
        let cli = Cli::parse_from([
            "transitprep",
            "ingest-demand",
            "-w",
            "counts.xlsx",
            "--mode",
            "day-template",
        ]);
        let Command::IngestDemand(args) = cli.command else {
            panic!("wrong subcommand");
        };
        assert_eq!(args.source.mode, IngestMode::DayTemplate);
    }
}
