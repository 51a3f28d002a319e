use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::utils::utc_midnight;

pub const DEFAULT_ACCURACY_THRESHOLD: i32 = 50;
pub const DEFAULT_TIMEZONE: Tz = Tz::US__Pacific;

pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Both ends are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            bail!("start {start} is after end {end}");
        }
        Ok(DateRange { start, end })
    }

    // Dates are UTC dates. Without an end date the range is open up to `now`.
    pub fn from_dates(
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let start = utc_midnight(start_date);
        let end = match end_date {
            None => now,
            Some(end_date) => {
                let next_day = end_date
                    .checked_add_days(Days::new(1))
                    .ok_or_else(|| anyhow!("end date out of range: {end_date}"))?;
                utc_midnight(next_day) - chrono::Duration::nanoseconds(1)
            }
        };
        DateRange::new(start, end)
    }

    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Everything the correlation engine needs, nothing more.
#[derive(Clone, Debug)]
pub struct CorrelationConfig {
    pub range: DateRange,
    pub accuracy_threshold: i32,
    pub excluded_device_tag: Option<i64>,
    pub timezone: Tz,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapboxCredentials {
    pub username: String,
    pub token: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadRequest {
    pub username: Option<String>,
    pub token: Option<String>,
}

impl UploadRequest {
    pub fn credentials(&self) -> Option<MapboxCredentials> {
        match (&self.username, &self.token) {
            (Some(username), Some(token)) => Some(MapboxCredentials {
                username: username.clone(),
                token: token.clone(),
            }),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub input_directory: PathBuf,
    pub output_directory: PathBuf,
    pub range: DateRange,
    pub timezone: Tz,
    pub accuracy_threshold: i32,
    pub excluded_device_tag: Option<i64>,
    pub upload: Option<UploadRequest>,
}

impl Config {
    pub fn new(input_directory: PathBuf, range: DateRange) -> Self {
        Config {
            output_directory: input_directory.clone(),
            input_directory,
            range,
            timezone: DEFAULT_TIMEZONE,
            accuracy_threshold: DEFAULT_ACCURACY_THRESHOLD,
            excluded_device_tag: None,
            upload: None,
        }
    }

    pub fn correlation(&self) -> CorrelationConfig {
        CorrelationConfig {
            range: self.range,
            accuracy_threshold: self.accuracy_threshold,
            excluded_device_tag: self.excluded_device_tag,
            timezone: self.timezone,
        }
    }
}

pub fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| anyhow!("invalid date {date:?}, expected yyyy-mm-dd: {e}"))
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| anyhow!("unknown timezone {name:?}: {e}"))
}
