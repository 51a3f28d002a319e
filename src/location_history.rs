// Typed view of the Google Takeout location history files. Only the fields we
// use are modeled; everything else in the documents is ignored.
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils;

/// `Records.json`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationRecords {
    #[serde(default)]
    pub locations: Vec<LocationPing>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<String>,
    #[serde(rename = "latitudeE7", default, skip_serializing_if = "Option::is_none")]
    pub latitude_e7: Option<i64>,
    #[serde(rename = "longitudeE7", default, skip_serializing_if = "Option::is_none")]
    pub longitude_e7: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_tag: Option<i64>,
}

impl LocationPing {
    /// `Ok(None)` when the ping carries no timestamp at all.
    pub fn time(&self) -> Result<Option<DateTime<Utc>>> {
        match (&self.timestamp, &self.timestamp_ms) {
            (Some(timestamp), _) => utils::parse_utc_timestamp(timestamp).map(Some),
            (None, Some(timestamp_ms)) => utils::timestamp_from_millis(timestamp_ms).map(Some),
            (None, None) => Ok(None),
        }
    }
}

/// One `Semantic Location History/<year>/<year>_<MONTH>.json` document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticHistory {
    #[serde(default)]
    pub timeline_objects: Vec<TimelineObject>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_segment: Option<ActivitySegment>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySegment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<SegmentDuration>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentDuration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::location_history::*;

    #[test]
    fn parse_records() {
        let records: LocationRecords = serde_json::from_str(
            r#"{"locations": [
                {"latitudeE7": 377749000, "longitudeE7": -1224194000, "accuracy": 12,
                 "source": "WIFI", "deviceTag": 42, "timestamp": "2022-01-15T10:00:00.000Z"},
                {"timestampMs": "1642240800000"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(records.locations.len(), 2);
        let first = &records.locations[0];
        assert_eq!(first.latitude_e7, Some(377749000));
        assert_eq!(first.longitude_e7, Some(-1224194000));
        assert_eq!(first.accuracy, Some(12));
        assert_eq!(first.device_tag, Some(42));

        let expected = Utc.with_ymd_and_hms(2022, 1, 15, 10, 0, 0).unwrap();
        assert_eq!(first.time().unwrap(), Some(expected));
        assert_eq!(records.locations[1].time().unwrap(), Some(expected));
        assert_eq!(records.locations[1].accuracy, None);
    }

    #[test]
    fn ping_without_time() {
        assert_eq!(LocationPing::default().time().unwrap(), None);
        let ping = LocationPing {
            timestamp: Some("garbage".to_string()),
            ..Default::default()
        };
        assert!(ping.time().is_err());
    }

    #[test]
    fn parse_semantic_history() {
        let history: SemanticHistory = serde_json::from_str(
            r#"{"timelineObjects": [
                {"placeVisit": {"location": {"name": "Home"}}},
                {"activitySegment": {
                    "activityType": "MOTORCYCLING",
                    "confidence": "HIGH",
                    "duration": {"startTimestamp": "2022-01-15T10:00:00Z",
                                 "endTimestamp": "2022-01-15T10:30:00Z"}}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(history.timeline_objects.len(), 2);
        assert_eq!(history.timeline_objects[0].activity_segment, None);
        let segment = history.timeline_objects[1]
            .activity_segment
            .as_ref()
            .unwrap();
        assert_eq!(segment.activity_type.as_deref(), Some("MOTORCYCLING"));
        assert_eq!(
            segment.duration.as_ref().unwrap().end_timestamp.as_deref(),
            Some("2022-01-15T10:30:00Z")
        );
    }
}
