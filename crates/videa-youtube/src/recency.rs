//! Human-readable publish-recency labels.

use chrono::{DateTime, Utc};

/// Whole days between `published_at` and `now`, rounded up.
///
/// A video published any fraction of a day ago counts as one day; only a
/// publish instant equal to `now` yields zero.
#[must_use]
pub fn days_since(published_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (now - published_at).num_seconds().abs();
    // `i64::div_ceil` is still unstable (`int_roundings`); `seconds` is
    // non-negative after `.abs()`, so compute on `u64` where it is stable.
    (seconds as u64).div_ceil(86_400) as i64
}

/// Buckets an elapsed-day count into the display label.
///
/// Monotonic with elapsed time: `0` → "Today", `1` → "1 day ago", `2..=6` →
/// "N days ago", `7..=29` → weeks (floor of 7), `30..` → months (floor of 30).
#[must_use]
pub fn recency_label(days: i64) -> String {
    match days {
        i64::MIN..=0 => "Today".to_owned(),
        1 => "1 day ago".to_owned(),
        2..=6 => format!("{days} days ago"),
        7..=29 => {
            let weeks = days / 7;
            if weeks == 1 {
                "1 week ago".to_owned()
            } else {
                format!("{weeks} weeks ago")
            }
        }
        _ => {
            let months = days / 30;
            if months == 1 {
                "1 month ago".to_owned()
            } else {
                format!("{months} months ago")
            }
        }
    }
}

/// Label for a publish timestamp relative to `now`.
#[must_use]
pub fn published_label(published_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    recency_label(days_since(published_at, now))
}
