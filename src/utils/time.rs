//! Time formatting utilities

use std::time::Duration;

/// Format seconds as `MM:SS.mmm`, or `HH:MM:SS.mmm` once past the first hour
pub fn format_timestamp(seconds: f64) -> String {
    let total_millis = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let secs = (total_millis % 60_000) / 1000;
    let millis = total_millis % 1000;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
    } else {
        format!("{:02}:{:02}.{:03}", minutes, secs, millis)
    }
}

/// Format a wall-clock duration for display
pub fn format_elapsed(duration: Duration) -> String {
    format_timestamp(duration.as_secs_f64())
}

/// Seconds as passed on the media engine command line
pub fn engine_seconds(seconds: f64) -> String {
    format!("{:.3}", seconds)
}
