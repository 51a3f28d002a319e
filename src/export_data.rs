use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::geojson::FeatureCollection;

pub const OUTPUT_FILE_NAME: &str = "output.geojson";

pub fn write_feature_collection<W: Write>(
    feature_collection: &FeatureCollection,
    mut writer: W,
) -> Result<()> {
    // `to_writer_pretty` indents with two spaces and keeps non-ascii as is
    serde_json::to_writer_pretty(&mut writer, feature_collection)?;
    writer.flush()?;
    Ok(())
}

pub fn write_output_file(feature_collection: &FeatureCollection, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    let path = output_dir.join(OUTPUT_FILE_NAME);
    let file = File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    write_feature_collection(feature_collection, BufWriter::new(file))
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(
        "Wrote {} routes to {}",
        feature_collection.features.len(),
        path.display()
    );
    Ok(path)
}
