//! Number, date and duration formatting for rendered tweets.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::error::RenderError;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Timestamp layout used by the v1.1 API, e.g. `Wed Oct 10 20:19:24 +0000 2018`.
const TWITTER_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Returns the English name of a zero-based month, optionally shortened to three letters.
pub fn month_name(month0: u32, short: bool) -> &'static str {
    let name = MONTHS[(month0 % 12) as usize];
    if short {
        &name[..3]
    } else {
        name
    }
}

/// Rounds `number` to `places` decimals by shifting the decimal exponent in
/// text form, so values like `1.05` round up instead of falling to `1.0`.
fn round_to(number: f64, places: u32) -> f64 {
    let shifted = format!("{}e{}", number, places)
        .parse::<f64>()
        .unwrap_or(number)
        .round();
    format!("{}e-{}", shifted, places)
        .parse::<f64>()
        .unwrap_or(shifted)
}

/// Formats a retweet/like/follower count for display.
///
/// # Example
///
/// ```rust
/// use timeline_bff::twitter::format_counter;
///
/// assert_eq!(format_counter(999), "999");
/// assert_eq!(format_counter(1234), "1.2K");
/// assert_eq!(format_counter(3_400_000), "3.4M");
/// ```
pub fn format_counter(value: u64) -> String {
    if value < 1_000 {
        return value.to_string();
    }
    let (divisor, symbol) = if value >= 1_000_000 {
        (1e6, "M")
    } else {
        (1e3, "K")
    };
    format!("{:.1}{}", round_to(value as f64 / divisor, 1), symbol)
}

/// The creation timestamp of a tweet together with its relative-age label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetDate {
    pub created_at: String,
    pub at: String,
}

/// Parses a `created_at` value in either RFC 3339 or the v1.1 API layout.
pub fn parse_created_at(created_at: &str) -> Result<DateTime<Utc>, RenderError> {
    DateTime::parse_from_rfc3339(created_at)
        .or_else(|_| DateTime::parse_from_str(created_at, TWITTER_DATE_FORMAT))
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| RenderError::InvalidDate {
            value: created_at.to_string(),
        })
}

/// Builds the relative-age label of a tweet as seen from `now`.
///
/// Anything older than 1440 minutes but at most 1500 minutes reads `1d`;
/// older tweets show the month and day they were posted (UTC).
pub fn format_date_at(created_at: &str, now: DateTime<Utc>) -> Result<TweetDate, RenderError> {
    let created = parse_created_at(created_at)?;
    let minute_diff = ((now - created).num_milliseconds() as f64 / 60_000.0).round() as i64;

    let at = if minute_diff < 60 {
        format!("{}m", minute_diff)
    } else if minute_diff <= 1440 {
        format!("{}h", (minute_diff as f64 / 60.0).round() as i64)
    } else if minute_diff <= 1500 {
        "1d".to_string()
    } else {
        format!("{} {}", month_name(created.month0(), true), created.day())
    };

    Ok(TweetDate {
        created_at: created_at.to_string(),
        at,
    })
}

/// Builds the relative-age label of a tweet as seen from the current instant.
pub fn format_date(created_at: &str) -> Result<TweetDate, RenderError> {
    format_date_at(created_at, Utc::now())
}

fn pad_time(value: u64, pad: bool) -> String {
    if pad {
        format!("{:02}", value)
    } else {
        value.to_string()
    }
}

/// Formats a video length as `m:ss`, or `h:mm:ss` from one hour up.
/// Zero seconds yields an empty label.
pub fn format_duration(seconds: u64) -> String {
    if seconds == 0 {
        return String::new();
    }
    let hours = seconds / 3600;
    let minutes = seconds / 60 % 60;
    let secs = seconds % 60;

    let hours_part = if hours > 0 {
        format!("{}:", hours)
    } else {
        String::new()
    };
    format!(
        "{}{}:{}",
        hours_part,
        pad_time(minutes, hours > 0),
        pad_time(secs, true)
    )
}
