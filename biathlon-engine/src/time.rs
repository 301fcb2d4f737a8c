//! Clock and duration arithmetic
//!
//! Event timestamps are clock readings of the form `HH:MM:SS.mmm` with no date
//! component. Durations are computed by naive subtraction, so a race that
//! crosses midnight produces negative (misleading) durations. This is a known
//! limitation and is not corrected here.

use crate::types::{ClockTime, Duration, RaceError, Result};
use chrono::Timelike;
use serde::Serializer;

/// Exact textual layout of an event clock reading
const CLOCK_FORMAT: &str = "%H:%M:%S%.3f";

/// Layout of a start-window width (fractional seconds optional)
const WINDOW_FORMAT: &str = "%H:%M:%S%.f";

/// Parse a fixed-format `HH:MM:SS.mmm` clock reading
///
/// # Example
/// ```
/// use biathlon_engine::time::parse_clock;
///
/// let t = parse_clock("09:05:59.867").unwrap();
/// assert_eq!(t.to_string(), "09:05:59.867");
/// assert!(parse_clock("9:05:59").is_err());
/// ```
pub fn parse_clock(s: &str) -> Result<ClockTime> {
    if !has_clock_shape(s) {
        return Err(RaceError::InvalidClock(s.to_string()));
    }
    ClockTime::parse_from_str(s, CLOCK_FORMAT).map_err(|_| RaceError::InvalidClock(s.to_string()))
}

/// `dd:dd:dd.ddd`, checked byte by byte since chrono accepts one-digit
/// hours and any number of fraction digits
fn has_clock_shape(s: &str) -> bool {
    s.len() == 12
        && s.bytes().enumerate().all(|(i, b)| match i {
            2 | 5 => b == b':',
            8 => b == b'.',
            _ => b.is_ascii_digit(),
        })
}

/// Format a clock reading back into its `HH:MM:SS.mmm` form
pub fn format_clock(t: ClockTime) -> String {
    t.format(CLOCK_FORMAT).to_string()
}

/// Parse a start-window width such as `00:01:30` into a duration
pub fn parse_window(s: &str) -> Result<Duration> {
    let t = ClockTime::parse_from_str(s, WINDOW_FORMAT)
        .map_err(|_| RaceError::InvalidClock(s.to_string()))?;
    Ok(Duration::seconds(i64::from(t.num_seconds_from_midnight()))
        + Duration::nanoseconds(i64::from(t.nanosecond())))
}

/// Elapsed time from `from` to `to` (`to - from`, may be negative)
pub fn duration(from: ClockTime, to: ClockTime) -> Duration {
    to.signed_duration_since(from)
}

/// Duration in fractional seconds, at millisecond resolution
pub fn seconds(d: Duration) -> f64 {
    d.num_milliseconds() as f64 / 1000.0
}

/// Format a duration as zero-padded `HH:MM:SS.mmm`
///
/// Hours are not wrapped at 24. Negative durations carry a leading `-`.
pub fn format_duration(d: Duration) -> String {
    let total_ms = d.num_milliseconds();
    let sign = if total_ms < 0 { "-" } else { "" };
    let ms = total_ms.unsigned_abs();

    let hours = ms / 3_600_000;
    let minutes = (ms / 60_000) % 60;
    let secs = (ms / 1_000) % 60;
    let millis = ms % 1_000;

    format!("{}{:02}:{:02}:{:02}.{:03}", sign, hours, minutes, secs, millis)
}

/// Average speed over `distance` covered in `d`
///
/// Returns `None` when the duration is zero or negative, since no meaningful
/// speed exists for it.
pub fn speed(distance: f64, d: Duration) -> Option<f64> {
    let secs = seconds(d);
    if secs <= 0.0 {
        None
    } else {
        Some(distance / secs)
    }
}

/// Render a speed with three decimals, truncated rather than rounded
pub fn format_speed(value: f64) -> String {
    let truncated = (value * 1000.0).trunc() / 1000.0;
    format!("{:.3}", truncated)
}

pub(crate) fn serialize_duration<S: Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&format_duration(*d))
}

pub(crate) fn serialize_opt_duration<S: Serializer>(
    d: &Option<Duration>,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    match d {
        Some(d) => s.serialize_some(&format_duration(*d)),
        None => s.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(s: &str) -> ClockTime {
        parse_clock(s).unwrap()
    }

    #[test]
    fn test_parse_clock() {
        let t = clock("10:00:00.500");
        assert_eq!(duration(clock("10:00:00.000"), t).num_milliseconds(), 500);
        assert_eq!(format_clock(clock("10:00:00.000")), "10:00:00.000");
        assert_eq!(format_clock(t), "10:00:00.500");
    }

    #[test]
    fn test_parse_clock_rejects_malformed() {
        assert!(parse_clock("").is_err());
        assert!(parse_clock("10:00:00").is_err());
        assert!(parse_clock("10:00:00.5").is_err());
        assert!(parse_clock("25:00:00.000").is_err());
        assert!(parse_clock("10:61:00.000").is_err());
        assert!(parse_clock("[10:00:00.000]").is_err());
        assert!(matches!(parse_clock("ab:cd:ef.ghi"), Err(RaceError::InvalidClock(_))));
        // Twelve bytes, but not two digits per field
        assert!(parse_clock("1:00:00.0000").is_err());
        assert!(parse_clock("10:0:00.0000").is_err());
        assert!(parse_clock("10:00:00,000").is_err());
        assert!(parse_clock("+1:00:00.000").is_err());
    }

    #[test]
    fn test_parse_window() {
        assert_eq!(parse_window("00:00:30").unwrap().num_seconds(), 30);
        assert_eq!(parse_window("00:01:30").unwrap().num_seconds(), 90);
        assert_eq!(parse_window("00:00:01.250").unwrap().num_milliseconds(), 1250);
        assert!(parse_window("thirty").is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::zero()), "00:00:00.000");
        assert_eq!(format_duration(Duration::milliseconds(1_140_000)), "00:19:00.000");
        assert_eq!(format_duration(Duration::milliseconds(3_723_004)), "01:02:03.004");
        // Hours are not wrapped modulo a day
        assert_eq!(format_duration(Duration::hours(26)), "26:00:00.000");
        assert_eq!(format_duration(Duration::milliseconds(-1_500)), "-00:00:01.500");
    }

    #[test]
    fn test_duration_across_midnight_is_naive() {
        let d = duration(clock("23:59:00.000"), clock("00:01:00.000"));
        assert_eq!(d.num_seconds(), -(23 * 3600 + 58 * 60));
    }

    #[test]
    fn test_speed() {
        let d = Duration::milliseconds(1_140_000);
        let v = speed(3500.0, d).unwrap();
        assert!((v - 3.070_175).abs() < 1e-6);
        assert_eq!(speed(150.0, Duration::zero()), None);
        assert_eq!(speed(150.0, Duration::seconds(-5)), None);
    }

    #[test]
    fn test_format_speed_truncates() {
        assert_eq!(format_speed(3.0701754), "3.070");
        assert_eq!(format_speed(2.9999), "2.999");
        assert_eq!(format_speed(0.0), "0.000");
    }
}
