use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

// Location history timestamps look like `2022-01-15T10:00:00.123Z`. The
// trailing `Z` is the only zone information we get and it always means UTC.
pub fn parse_utc_timestamp(timestamp: &str) -> Result<DateTime<Utc>> {
    let naive = match timestamp.strip_suffix('Z') {
        Some(naive) => naive,
        None => bail!("timestamp without zone marker: {timestamp:?}"),
    };
    let naive = NaiveDateTime::parse_from_str(naive, TIMESTAMP_FORMAT)
        .with_context(|| format!("invalid timestamp: {timestamp:?}"))?;
    Ok(naive.and_utc())
}

/// Older exports carry `timestampMs`, milliseconds since epoch as a string.
pub fn timestamp_from_millis(timestamp_ms: &str) -> Result<DateTime<Utc>> {
    let millis: i64 = timestamp_ms
        .parse()
        .with_context(|| format!("invalid timestampMs: {timestamp_ms:?}"))?;
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| anyhow!("timestampMs out of range: {millis}"))
}

pub fn to_display_time(time: DateTime<Utc>, timezone: &Tz) -> DateTime<Tz> {
    time.with_timezone(timezone)
}

/// Seconds are followed by a six digit fraction only when there are
/// microseconds to show, so `10:00:00` and `10:00:00.250000`.
pub fn iso_seconds_format(subsec_nanos: u32) -> &'static str {
    if subsec_nanos / 1_000 == 0 {
        "%Y-%m-%dT%H:%M:%S"
    } else {
        "%Y-%m-%dT%H:%M:%S%.6f"
    }
}

pub fn format_display_time(time: DateTime<Utc>, timezone: &Tz) -> String {
    let local = to_display_time(time, timezone);
    format!(
        "{}{}",
        local.format(iso_seconds_format(local.nanosecond())),
        local.format("%:z")
    )
}

pub fn utc_midnight(date: chrono::NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}
