//! motomap - rebuild motorcycle routes from a Google location history export
//!
//! Usage:
//!   motomap --input-directory <takeout/Location History> [--start-date 2022-01-01]
//!           [--end-date 2022-12-31] [--timezone US/Pacific] [--accuracy 50]
//!           [--create-dataset --username <name> --token <token>]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use log::{error, info, warn};
use motomap::{
    config::{self, Config, DateRange, UploadRequest},
    logs,
    pipeline::{self, ExportOutcome},
};
use simplelog::LevelFilter;

#[derive(Parser)]
#[command(name = "motomap")]
#[command(about = "Rebuild motorcycle routes from a location history export", long_about = None)]
struct Cli {
    /// Directory containing Records.json and "Semantic Location History/"
    #[arg(long, default_value = ".")]
    input_directory: PathBuf,

    /// Where to write output.geojson, defaults to the input directory
    #[arg(long)]
    output_directory: Option<PathBuf>,

    /// First day to include, yyyy-mm-dd in UTC
    #[arg(long, default_value = "2022-01-01")]
    start_date: String,

    /// Last day to include, yyyy-mm-dd in UTC, defaults to now
    #[arg(long)]
    end_date: Option<String>,

    /// Timezone used for the dates in the output
    #[arg(long, default_value = "US/Pacific")]
    timezone: String,

    /// Worst accepted accuracy in meters
    #[arg(long, default_value_t = config::DEFAULT_ACCURACY_THRESHOLD)]
    accuracy: i32,

    /// Ignore pings recorded by this device (deviceTag in Records.json, e.g.
    /// 464913864). When unset, pings from every device are kept
    #[arg(long)]
    excluded_device_tag: Option<i64>,

    /// Upload the routes as a new Mapbox dataset
    #[arg(long)]
    create_dataset: bool,

    /// Mapbox username
    #[arg(long)]
    username: Option<String>,

    /// Mapbox secret token with dataset write access
    #[arg(long, env = "MAPBOX_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Also write logs to <dir>/logs/
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn to_config(&self) -> Result<Config> {
        let start_date = config::parse_date(&self.start_date)?;
        let end_date = self
            .end_date
            .as_deref()
            .map(config::parse_date)
            .transpose()?;
        let range = DateRange::from_dates(start_date, end_date, Utc::now())?;
        let mut config = Config::new(self.input_directory.clone(), range);
        if let Some(output_directory) = &self.output_directory {
            config.output_directory = output_directory.clone();
        }
        config.timezone = config::parse_timezone(&self.timezone)?;
        config.accuracy_threshold = self.accuracy;
        config.excluded_device_tag = self.excluded_device_tag;
        if self.create_dataset {
            config.upload = Some(UploadRequest {
                username: self.username.clone(),
                token: self.token.clone(),
            });
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(e) = logs::init(cli.log_dir.as_deref(), level) {
        eprintln!("Failed to initialize logging: {e:#}");
        return ExitCode::FAILURE;
    }

    let result = cli.to_config().and_then(|config| pipeline::run(&config));
    match result {
        Ok(outcome) => {
            info!(
                "{} routes written to {}",
                outcome.feature_collection.features.len(),
                outcome.output_path.display()
            );
            match outcome.export {
                ExportOutcome::Exported(report) if !report.failed.is_empty() => warn!(
                    "{} features could not be uploaded to dataset {}",
                    report.failed.len(),
                    report.dataset_id
                ),
                ExportOutcome::Failed(_) => warn!("Routes were not uploaded"),
                _ => (),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:?}");
            ExitCode::FAILURE
        }
    }
}
