use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::{
    assembler,
    config::{Config, CorrelationConfig, MapboxCredentials, UploadRequest},
    export_data,
    geojson::FeatureCollection,
    import_data::HistoryInputs,
    journey_extractor,
    mapbox::{ExportReport, FeatureExporter, MapboxExporter},
    ping_correlator,
};

/// Extract, correlate, assemble. No I/O.
pub fn build_routes(
    inputs: &HistoryInputs,
    config: &CorrelationConfig,
    generated_at: DateTime<Local>,
) -> Result<FeatureCollection> {
    let mut journeys = journey_extractor::extract_journeys(&inputs.histories, &config.range)?;
    ping_correlator::correlate(&inputs.records.locations, &mut journeys, config)?;
    Ok(assembler::assemble(journeys, &config.timezone, generated_at))
}

#[derive(Debug, PartialEq)]
pub enum ExportOutcome {
    Skipped,
    MissingCredentials,
    Exported(ExportReport),
    Failed(String),
}

pub fn export_if_requested(
    upload: Option<&UploadRequest>,
    feature_collection: &FeatureCollection,
    make_exporter: impl FnOnce(MapboxCredentials) -> Result<Box<dyn FeatureExporter>>,
) -> ExportOutcome {
    let upload = match upload {
        None => return ExportOutcome::Skipped,
        Some(upload) => upload,
    };
    let credentials = match upload.credentials() {
        Some(credentials) => credentials,
        None => {
            warn!("Dataset creation was requested but username and token were not provided.");
            return ExportOutcome::MissingCredentials;
        }
    };
    // the routes are already written at this point, a failed upload does not
    // fail the run
    let result = make_exporter(credentials)
        .and_then(|exporter| exporter.export(&feature_collection.name, &feature_collection.features));
    match result {
        Ok(report) => ExportOutcome::Exported(report),
        Err(e) => {
            error!("Dataset export failed: {e:#}");
            ExportOutcome::Failed(format!("{e:#}"))
        }
    }
}

#[derive(Debug)]
pub struct RunOutcome {
    pub output_path: PathBuf,
    pub feature_collection: FeatureCollection,
    pub export: ExportOutcome,
}

pub fn run(config: &Config) -> Result<RunOutcome> {
    info!(
        "Building routes from {} between {} and {}",
        config.input_directory.display(),
        config.range.start,
        config.range.end
    );
    let inputs = HistoryInputs::load(&config.input_directory, &config.range)?;
    let feature_collection = build_routes(&inputs, &config.correlation(), Local::now())?;
    let output_path = export_data::write_output_file(&feature_collection, &config.output_directory)?;
    let export = export_if_requested(config.upload.as_ref(), &feature_collection, |credentials| {
        let exporter: Box<dyn FeatureExporter> = Box::new(MapboxExporter::new(credentials)?);
        Ok(exporter)
    });
    Ok(RunOutcome {
        output_path,
        feature_collection,
        export,
    })
}
