use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

use crate::types::{Result, WatchError};

/// Wire format of feed timestamps, offset included.
const FEED_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Display format for rows and message text, offset dropped.
const DISPLAY_FORMAT: &str = "%a, %d %b %Y %H:%M:%S";

/// Sortable second-precision form used to namespace uploaded objects.
const OBJECT_STAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a feed timestamp string such as `"Thu, 01 Jun 2023 00:02:00 +0000"`.
pub fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_str(s, FEED_FORMAT).map_err(|source| WatchError::Format {
        value: s.to_string(),
        source,
    })
}

/// Render a timestamp for human-readable output, without the offset suffix.
pub fn format_timestamp<Tz>(t: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    t.format(DISPLAY_FORMAT).to_string()
}

/// Render an instant back into the feed's own wire format.
pub fn to_feed_timestamp<Tz>(t: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    t.format(FEED_FORMAT).to_string()
}

/// Lookback cutoff for the current run: `days_back` days before now.
pub fn compute_threshold(days_back: i64) -> DateTime<Utc> {
    threshold_at(Utc::now(), days_back)
}

/// Cutoff anchored to `00:00:05` on the target calendar day, so entries
/// published earlier in the cutoff day are excluded no matter when in the day
/// the job runs.
pub fn threshold_at(now: DateTime<Utc>, days_back: i64) -> DateTime<Utc> {
    let day = (now - Duration::days(days_back)).date_naive();
    let at_start = day
        .and_hms_opt(0, 0, 5)
        .expect("00:00:05 is a valid time of day");
    Utc.from_utc_datetime(&at_start)
}

/// Current instant in the object-naming form, second precision.
pub fn current_timestamp() -> String {
    object_timestamp(&Utc::now())
}

/// Render an instant in the object-naming form, e.g. `"2023-01-05T00:00:00"`.
pub fn object_timestamp<Tz>(t: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    t.format(OBJECT_STAMP_FORMAT).to_string()
}
