use anyhow::{Context, Result};

use crate::{
    config::DateRange,
    journey::Journey,
    location_history::{ActivitySegment, SemanticHistory},
    utils,
};

pub const MOTORCYCLING_ACTIVITY_TYPE: &str = "MOTORCYCLING";

pub fn is_motorcycling(segment: &ActivitySegment) -> bool {
    segment.activity_type.as_deref() == Some(MOTORCYCLING_ACTIVITY_TYPE)
}

// Journeys come out in document order and are never merged, so overlapping
// or repeated segments produce one journey each.
pub fn extract_journeys(histories: &[SemanticHistory], range: &DateRange) -> Result<Vec<Journey>> {
    let mut journeys = Vec::new();
    let mut skipped_out_of_range = 0;
    for (document_index, history) in histories.iter().enumerate() {
        for (object_index, timeline_object) in history.timeline_objects.iter().enumerate() {
            let segment = match &timeline_object.activity_segment {
                Some(segment) if is_motorcycling(segment) => segment,
                _ => continue,
            };
            let journey = journey_of_segment(segment).with_context(|| {
                format!("bad motorcycling segment (document {document_index}, timeline object {object_index})")
            })?;
            if journey.start_time < range.start || journey.end_time > range.end {
                skipped_out_of_range += 1;
                continue;
            }
            journeys.push(journey);
        }
    }
    info!(
        "Extracted {} journeys from {} documents, {} outside of the date range",
        journeys.len(),
        histories.len(),
        skipped_out_of_range
    );
    Ok(journeys)
}

fn journey_of_segment(segment: &ActivitySegment) -> Result<Journey> {
    let duration = segment
        .duration
        .as_ref()
        .ok_or_else(|| anyhow!("missing duration"))?;
    let start = duration
        .start_timestamp
        .as_deref()
        .ok_or_else(|| anyhow!("missing startTimestamp"))?;
    let end = duration
        .end_timestamp
        .as_deref()
        .ok_or_else(|| anyhow!("missing endTimestamp"))?;
    Ok(Journey::new(
        utils::parse_utc_timestamp(start)?,
        utils::parse_utc_timestamp(end)?,
    ))
}
