#![allow(dead_code)]

use std::fs;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use motomap::config::{CorrelationConfig, DateRange};
use motomap::location_history::{
    ActivitySegment, LocationPing, LocationRecords, SegmentDuration, SemanticHistory,
    TimelineObject,
};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

pub fn timestamp(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

pub fn ping_at(time: DateTime<Utc>, latitude: f64, longitude: f64, accuracy: i32) -> LocationPing {
    LocationPing {
        timestamp: Some(timestamp(time)),
        latitude_e7: Some((latitude * 1e7).round() as i64),
        longitude_e7: Some((longitude * 1e7).round() as i64),
        accuracy: Some(accuracy),
        ..Default::default()
    }
}

pub fn segment(activity_type: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> TimelineObject {
    TimelineObject {
        activity_segment: Some(ActivitySegment {
            activity_type: Some(activity_type.to_string()),
            duration: Some(SegmentDuration {
                start_timestamp: Some(timestamp(start)),
                end_timestamp: Some(timestamp(end)),
            }),
        }),
    }
}

pub fn motorcycling(start: DateTime<Utc>, end: DateTime<Utc>) -> TimelineObject {
    segment("MOTORCYCLING", start, end)
}

pub fn history(timeline_objects: Vec<TimelineObject>) -> SemanticHistory {
    SemanticHistory { timeline_objects }
}

pub fn year_2022() -> DateRange {
    DateRange::new(utc(2022, 1, 1, 0, 0, 0), utc(2022, 12, 31, 23, 59, 59)).unwrap()
}

pub fn correlation_config(range: DateRange) -> CorrelationConfig {
    CorrelationConfig {
        range,
        accuracy_threshold: 50,
        excluded_device_tag: Some(464913864),
        timezone: Tz::UTC,
    }
}

/// Lays out a Takeout style `Location History` folder.
pub fn write_takeout(
    dir: &Path,
    records: &LocationRecords,
    histories: &[(&str, &str, &SemanticHistory)],
) {
    fs::write(
        dir.join("Records.json"),
        serde_json::to_string(records).unwrap(),
    )
    .unwrap();
    let semantic_dir = dir.join("Semantic Location History");
    fs::create_dir_all(&semantic_dir).unwrap();
    for (year, file_name, history) in histories {
        let year_dir = semantic_dir.join(year);
        fs::create_dir_all(&year_dir).unwrap();
        fs::write(
            year_dir.join(file_name),
            serde_json::to_string(history).unwrap(),
        )
        .unwrap();
    }
}
