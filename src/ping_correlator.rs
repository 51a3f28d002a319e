use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use crate::{
    config::{CorrelationConfig, DateRange},
    journey::{Journey, Waypoint},
    location_history::LocationPing,
    utils,
};

const E7: f64 = 10_000_000.0;

pub const TOLERANCE_WINDOW: Duration = Duration::minutes(5);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DiscardReason {
    OutOfRange,
    ExcludedDevice,
    MissingField,
    Inaccurate,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AcceptedPing {
    pub time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
}

pub struct PingFilter {
    pub accuracy_threshold: i32,
    pub excluded_device_tag: Option<i64>,
    pub range: DateRange,
}

impl PingFilter {
    pub fn new(config: &CorrelationConfig) -> Self {
        PingFilter {
            accuracy_threshold: config.accuracy_threshold,
            excluded_device_tag: config.excluded_device_tag,
            range: config.range,
        }
    }

    /// `Err` only for a timestamp we cannot read. Anything else that is wrong
    /// with a ping just gets it discarded.
    pub fn check(
        &self,
        ping: &LocationPing,
    ) -> Result<std::result::Result<AcceptedPing, DiscardReason>> {
        let time = match ping.time()? {
            Some(time) => time,
            None => return Ok(Err(DiscardReason::MissingField)),
        };
        if !self.range.contains(time) {
            return Ok(Err(DiscardReason::OutOfRange));
        }
        if ping.device_tag.is_some() && ping.device_tag == self.excluded_device_tag {
            return Ok(Err(DiscardReason::ExcludedDevice));
        }
        let (latitude_e7, longitude_e7, accuracy) =
            match (ping.latitude_e7, ping.longitude_e7, ping.accuracy) {
                (Some(lat), Some(lon), Some(accuracy)) => (lat, lon, accuracy),
                _ => return Ok(Err(DiscardReason::MissingField)),
            };
        // the threshold itself is still good enough
        if accuracy > self.accuracy_threshold {
            return Ok(Err(DiscardReason::Inaccurate));
        }
        Ok(Ok(AcceptedPing {
            time,
            latitude: latitude_e7 as f64 / E7,
            longitude: longitude_e7 as f64 / E7,
        }))
    }

    pub fn accept(&self, ping: &LocationPing) -> Result<Option<AcceptedPing>> {
        Ok(self.check(ping)?.ok())
    }
}

pub fn within_tolerance_window(journey: &Journey, time: DateTime<Utc>) -> bool {
    time > journey.start_time - TOLERANCE_WINDOW && time < journey.end_time + TOLERANCE_WINDOW
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CorrelationStats {
    pub total_pings: usize,
    pub accepted_pings: usize,
    pub out_of_range: usize,
    pub excluded_device: usize,
    pub missing_field: usize,
    pub inaccurate: usize,
    pub waypoints: usize,
}

impl CorrelationStats {
    fn record_discard(&mut self, reason: DiscardReason) {
        match reason {
            DiscardReason::OutOfRange => self.out_of_range += 1,
            DiscardReason::ExcludedDevice => self.excluded_device += 1,
            DiscardReason::MissingField => self.missing_field += 1,
            DiscardReason::Inaccurate => self.inaccurate += 1,
        }
    }
}

pub fn filter_pings(
    pings: &[LocationPing],
    filter: &PingFilter,
    stats: &mut CorrelationStats,
) -> Result<Vec<AcceptedPing>> {
    let mut accepted = Vec::new();
    for ping in pings {
        stats.total_pings += 1;
        match filter.check(ping)? {
            Ok(ping) => accepted.push(ping),
            Err(reason) => stats.record_discard(reason),
        }
    }
    stats.accepted_pings = accepted.len();
    Ok(accepted)
}

// Every journey is tested against every ping. A ping inside the window of
// several journeys ends up in all of them. Each journey only touches its own
// waypoints, and pings keep their input order within a journey.
pub fn attach_waypoints(journeys: &mut [Journey], pings: &[AcceptedPing], timezone: &Tz) -> usize {
    let mut appended = 0;
    for journey in journeys.iter_mut() {
        for ping in pings {
            if within_tolerance_window(journey, ping.time) {
                journey.waypoints.push(Waypoint {
                    latitude: ping.latitude,
                    longitude: ping.longitude,
                    time: utils::to_display_time(ping.time, timezone),
                });
                appended += 1;
            }
        }
    }
    appended
}

pub fn correlate(
    pings: &[LocationPing],
    journeys: &mut [Journey],
    config: &CorrelationConfig,
) -> Result<CorrelationStats> {
    let filter = PingFilter::new(config);
    let mut stats = CorrelationStats::default();
    let accepted = filter_pings(pings, &filter, &mut stats)?;
    stats.waypoints = attach_waypoints(journeys, &accepted, &config.timezone);
    info!(
        "Correlated {} pings against {} journeys: accepted={}, out_of_range={}, excluded_device={}, missing_field={}, inaccurate={}, waypoints={}",
        stats.total_pings,
        journeys.len(),
        stats.accepted_pings,
        stats.out_of_range,
        stats.excluded_device,
        stats.missing_field,
        stats.inaccurate,
        stats.waypoints
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use chrono_tz::Tz;

    use crate::config::{CorrelationConfig, DateRange};
    use crate::location_history::LocationPing;
    use crate::ping_correlator::*;

    fn config() -> CorrelationConfig {
        CorrelationConfig {
            range: DateRange::new(
                Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2022, 12, 31, 0, 0, 0).unwrap(),
            )
            .unwrap(),
            accuracy_threshold: 50,
            excluded_device_tag: Some(464913864),
            timezone: Tz::UTC,
        }
    }

    fn ping() -> LocationPing {
        LocationPing {
            timestamp: Some("2022-01-15T10:00:00Z".to_string()),
            latitude_e7: Some(377749000),
            longitude_e7: Some(-1224194000),
            accuracy: Some(10),
            ..Default::default()
        }
    }

    #[test]
    fn discard_reasons() {
        let filter = PingFilter::new(&config());
        assert!(filter.check(&ping()).unwrap().is_ok());

        let check = |ping: LocationPing, expected| {
            assert_eq!(filter.check(&ping).unwrap(), Err(expected));
        };
        check(
            LocationPing {
                timestamp: Some("2021-12-31T23:59:59Z".to_string()),
                ..ping()
            },
            DiscardReason::OutOfRange,
        );
        check(
            LocationPing {
                device_tag: Some(464913864),
                ..ping()
            },
            DiscardReason::ExcludedDevice,
        );
        check(
            LocationPing {
                accuracy: None,
                ..ping()
            },
            DiscardReason::MissingField,
        );
        check(
            LocationPing {
                timestamp: None,
                ..ping()
            },
            DiscardReason::MissingField,
        );
        check(
            LocationPing {
                accuracy: Some(51),
                ..ping()
            },
            DiscardReason::Inaccurate,
        );
    }

    #[test]
    fn other_devices_pass() {
        let filter = PingFilter::new(&config());
        let ping = LocationPing {
            device_tag: Some(1),
            ..ping()
        };
        assert!(filter.accept(&ping).unwrap().is_some());

        let filter = PingFilter {
            excluded_device_tag: None,
            ..PingFilter::new(&config())
        };
        let ping = LocationPing {
            device_tag: Some(464913864),
            ..ping
        };
        assert!(filter.accept(&ping).unwrap().is_some());
    }

    #[test]
    fn window_is_strict() {
        assert_eq!(TOLERANCE_WINDOW.num_seconds(), 300);
        let journey = Journey::new(
            Utc.with_ymd_and_hms(2022, 1, 15, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2022, 1, 15, 10, 30, 0).unwrap(),
        );
        let at = |h, m, s| Utc.with_ymd_and_hms(2022, 1, 15, h, m, s).unwrap();
        assert!(!within_tolerance_window(&journey, at(9, 55, 0)));
        assert!(within_tolerance_window(&journey, at(9, 55, 1)));
        assert!(within_tolerance_window(&journey, at(10, 34, 59)));
        assert!(!within_tolerance_window(&journey, at(10, 35, 0)));
    }
}
