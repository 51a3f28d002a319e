use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// A motorcycle trip as recorded by an activity segment. The bounds stay in
/// UTC; only the waypoint times are already localized for display.
#[derive(Clone, Debug, PartialEq)]
pub struct Journey {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub waypoints: Vec<Waypoint>,
}

impl Journey {
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Journey {
            start_time,
            end_time,
            waypoints: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Waypoint {
    pub latitude: f64,
    pub longitude: f64,
    pub time: DateTime<Tz>,
}
