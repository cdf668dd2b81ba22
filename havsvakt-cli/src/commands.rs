use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use havsvakt_config::HavsvaktConfig;
use havsvakt_engine::{check_point, run_service, run_single_cycle};
use havsvakt_geometry::{GeofenceKey, GeofenceKind, LatLng};
use havsvakt_telemetry::{EventLogger, MetricsRecorder};
use tracing::{debug, warn};

use crate::error::CliError;

type CommandResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate alerts periodically until interrupted
    Run(ConfigArgs),
    /// Run one evaluation cycle and print the transitions it produced
    Evaluate(ConfigArgs),
    /// Test a single point against a geofence from a document
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Configuration file; defaults to config/havsvakt.yaml plus environment
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// YAML or JSON list of geofences
    #[arg(long)]
    pub geofences: PathBuf,
    #[arg(long)]
    pub name: String,
    /// circle or polygon
    #[arg(long, default_value = "circle")]
    pub kind: GeofenceKind,
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,
}

pub async fn run_command(cli: Cli) -> CommandResult {
    match cli.command {
        Commands::Run(args) => {
            let config = load_config(args.config.as_deref())?;
            let metrics = init(&config)?;
            run_service(&config, Arc::clone(&metrics)).await?;
            debug!("Final metrics:\n{}", metrics.gather_metrics()?);
            Ok(())
        }
        Commands::Evaluate(args) => {
            let config = load_config(args.config.as_deref())?;
            let metrics = init(&config)?;
            let report = run_single_cycle(&config, metrics).await?;

            for transition in &report.transitions {
                println!("{transition}");
            }
            for issue in &report.issues {
                warn!("{issue}");
            }
            println!(
                "{} alerts evaluated, {} enter, {} exit, {} deliveries failed",
                report.alerts_evaluated,
                report.enters(),
                report.exits(),
                report.deliveries.failed.len()
            );
            Ok(())
        }
        Commands::Check(args) => {
            EventLogger::init("warn", false);
            let key = GeofenceKey::new(args.name, args.kind);
            let check = check_point(&args.geofences, &key, LatLng::new(args.lat, args.lng)).await?;
            println!("{check}");
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<HavsvaktConfig, CliError> {
    let config = match path {
        Some(path) => HavsvaktConfig::load_from_path(path)?,
        None => HavsvaktConfig::load()?,
    };
    Ok(config)
}

fn init(config: &HavsvaktConfig) -> Result<Arc<MetricsRecorder>, CliError> {
    EventLogger::init(&config.telemetry.log_filter, config.telemetry.json);
    MetricsRecorder::new()
        .map(Arc::new)
        .map_err(|e| CliError::Metrics(e.to_string()))
}
