//! How often a "Last fetched ..." label needs repainting

use std::time::Duration;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Repaint interval for a label describing something `age` old.
///
/// Under an hour the label changes every minute or so, so it is refreshed
/// every 30 seconds; under a day every 30 minutes; older labels are
/// effectively static and get no timer (`None`).
pub fn refresh_interval_for(age: Duration) -> Option<Duration> {
    let secs = age.as_secs();
    if secs < HOUR {
        Some(Duration::from_secs(30))
    } else if secs < DAY {
        Some(Duration::from_secs(30 * MINUTE))
    } else {
        None
    }
}

/// Coarse relative age: "just now", "5 minutes ago", "3 days ago"
pub fn describe_age(age: Duration) -> String {
    let secs = age.as_secs();
    let (amount, unit) = if secs < MINUTE {
        return "just now".to_string();
    } else if secs < HOUR {
        (secs / MINUTE, "minute")
    } else if secs < DAY {
        (secs / HOUR, "hour")
    } else if secs < 30 * DAY {
        (secs / DAY, "day")
    } else if secs < 365 * DAY {
        (secs / (30 * DAY), "month")
    } else {
        (secs / (365 * DAY), "year")
    };
    if amount == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{amount} {unit}s ago")
    }
}
