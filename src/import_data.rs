use std::{
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{Datelike, Month};
use itertools::Itertools;
use serde::de::DeserializeOwned;

use crate::{
    config::DateRange,
    location_history::{LocationRecords, SemanticHistory},
};

pub const RECORDS_FILE_NAME: &str = "Records.json";
pub const SEMANTIC_HISTORY_DIR_NAME: &str = "Semantic Location History";

/// Everything the pipeline reads, fully loaded in memory.
#[derive(Clone, Debug, Default)]
pub struct HistoryInputs {
    pub records: LocationRecords,
    pub histories: Vec<SemanticHistory>,
}

impl HistoryInputs {
    pub fn load(input_dir: &Path, range: &DateRange) -> Result<Self> {
        let records = load_location_records(input_dir)?;
        let histories = load_semantic_histories(input_dir, range)?;
        Ok(HistoryInputs { records, histories })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))
}

pub fn load_location_records(input_dir: &Path) -> Result<LocationRecords> {
    let records: LocationRecords = read_json(&input_dir.join(RECORDS_FILE_NAME))?;
    info!("Loaded {} location records", records.locations.len());
    Ok(records)
}

// Year folders are named like `2022`. Anything else (`.DS_Store`, `1999`,
// `2035`) is not ours.
fn parse_year_folder(name: &str) -> Option<i32> {
    let bytes = name.as_bytes();
    if bytes.len() != 4
        || !name.starts_with("20")
        || !(b'0'..=b'2').contains(&bytes[2])
        || !bytes[3].is_ascii_digit()
    {
        return None;
    }
    name.parse().ok()
}

/// `2022_JANUARY.json` -> January
pub fn parse_month_file_name(name: &str) -> Result<Month> {
    let month = name
        .split(['_', '.'])
        .nth(1)
        .ok_or_else(|| anyhow!("unexpected semantic history file name: {name:?}"))?;
    month
        .parse::<Month>()
        .map_err(|_| anyhow!("unknown month {month:?} in file name {name:?}"))
}

fn sorted_dir_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))?;
    let mut paths = Vec::new();
    for entry in entries {
        paths.push(entry?.path());
    }
    Ok(paths.into_iter().sorted().collect())
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|x| x.to_str()).unwrap_or("")
}

pub fn semantic_history_files(input_dir: &Path, range: &DateRange) -> Result<Vec<PathBuf>> {
    let start = range.start.date_naive();
    let end = range.end.date_naive();
    let semantic_dir = input_dir.join(SEMANTIC_HISTORY_DIR_NAME);

    let mut files = Vec::new();
    for year_dir in sorted_dir_entries(&semantic_dir)? {
        let year = match parse_year_folder(file_name(&year_dir)) {
            Some(year) if year_dir.is_dir() => year,
            _ => {
                debug!("Skipping {}", year_dir.display());
                continue;
            }
        };
        if year < start.year() || year > end.year() {
            continue;
        }
        for path in sorted_dir_entries(&year_dir)? {
            let name = file_name(&path);
            if name.is_empty() || name.starts_with('.') || path.is_dir() {
                continue;
            }
            let month = parse_month_file_name(name)?.number_from_month();
            if (year == start.year() && month < start.month())
                || (year == end.year() && month > end.month())
            {
                continue;
            }
            files.push(path);
        }
    }
    Ok(files)
}

pub fn load_semantic_histories(input_dir: &Path, range: &DateRange) -> Result<Vec<SemanticHistory>> {
    let histories = semantic_history_files(input_dir, range)?
        .iter()
        .map(|path| read_json::<SemanticHistory>(path))
        .collect::<Result<Vec<_>>>()?;
    info!("Loaded {} semantic history documents", histories.len());
    Ok(histories)
}
