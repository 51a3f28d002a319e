use chrono::{DateTime, Local, Timelike};
use chrono_tz::Tz;
use geo_types::{Coord, LineString};
use itertools::Itertools;

use crate::{
    geojson::{Feature, FeatureCollection, Geometry, Properties, FEATURE_TYPE},
    journey::Journey,
    utils,
};

pub const COLLECTION_NAME_PREFIX: &str = "moto_routes_";

pub fn collection_name(generated_at: DateTime<Local>) -> String {
    let local = generated_at.naive_local();
    format!(
        "{}{}",
        COLLECTION_NAME_PREFIX,
        local.format(utils::iso_seconds_format(local.nanosecond()))
    )
}

pub fn journey_to_feature(id: usize, mut journey: Journey, timezone: &Tz) -> Feature {
    // stable, so pings with the same time keep their input order
    journey.waypoints.sort_by_key(|waypoint| waypoint.time);
    let coords: Vec<Coord<f64>> = journey
        .waypoints
        .iter()
        .map(|waypoint| Coord {
            x: waypoint.longitude,
            y: waypoint.latitude,
        })
        .collect();
    Feature {
        id: id.to_string(),
        type_: FEATURE_TYPE.to_string(),
        properties: Properties {
            ranking: 0,
            start_date: utils::format_display_time(journey.start_time, timezone),
            end_date: utils::format_display_time(journey.end_time, timezone),
        },
        geometry: Geometry {
            line_string: LineString::new(coords),
        },
    }
}

pub fn assemble(
    journeys: Vec<Journey>,
    timezone: &Tz,
    generated_at: DateTime<Local>,
) -> FeatureCollection {
    let features: Vec<Feature> = journeys
        .into_iter()
        .sorted_by_key(|journey| journey.start_time)
        .enumerate()
        .map(|(i, journey)| journey_to_feature(i + 1, journey, timezone))
        .collect();
    debug!(
        "Assembled {} features with {} coordinates in total",
        features.len(),
        features.iter().map(|f| f.geometry.len()).sum::<usize>()
    );
    FeatureCollection::new(collection_name(generated_at), features)
}
