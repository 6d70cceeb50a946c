//! Rounding, truncation and time humanization for the HUD.

use std::fmt;
use std::time::Duration;

const MICROS_PER_HOUR: f64 = 3_600_000_000.0;

/// Percentage of `fraction`, truncated (never rounded up) to two decimals.
pub fn percent_trunc(fraction: f64) -> f64 {
    (fraction * 10000.0).trunc() / 100.0
}

/// Source-native micro-units to whole units, truncated to two decimals.
pub fn watts_trunc(native: u64) -> f64 {
    let raw_watts = native as f64 / 1000.0 / 1000.0;
    (raw_watts * 100.0).trunc() / 100.0
}

/// Fractional hours to a duration at microsecond precision.
///
/// Returns `None` for negative or non-finite input.
pub fn hours_to_duration(hours: f64) -> Option<Duration> {
    if !hours.is_finite() || hours < 0.0 {
        return None;
    }
    Some(Duration::from_micros((hours * MICROS_PER_HOUR).round() as u64))
}

/// Formats a duration as `H:MM`.
///
/// Sub-second precision is dropped. A seconds remainder above 30 rounds the
/// minute up, 30 or below rounds down.
pub fn humanize_duration(duration: Duration) -> String {
    let mut secs = duration.as_secs();
    let remainder = secs % 60;
    if remainder > 30 {
        secs += 60 - remainder;
    } else {
        secs -= remainder;
    }

    let hours = secs / 3600;
    let minutes = (secs / 60) % 60;
    format!("{}:{:02}", hours, minutes)
}

/// Shortest round-trip decimal that always keeps a fractional part (`50.0`, `33.33`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayNumber(pub f64);

impl fmt::Display for DisplayNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}
