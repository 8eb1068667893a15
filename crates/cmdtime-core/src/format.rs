//! Elapsed-time formatting.
//!
//! Durations are broken into days, hours, minutes and seconds and rendered
//! with the insignificant leading units left out:
//!
//! ```text
//! 0.0          -> 0.000
//! 14.1         -> 14.100
//! 10934.1      -> 3:02:14.100
//! 90061.5 (p1) -> 1day, 01:01:01.5
//! ```
//!
//! The fractional part is truncated, never rounded, so `4.9999` shows as
//! `4.999` and not `5.000`.

use std::fmt::Write as _;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::duration_from_nanos;

/// Largest supported number of fractional digits.
pub const MAX_PRECISION: u8 = 9;

const SECS_PER_DAY: u64 = 86_400;

/// A duration split into display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedDuration {
    pub days: u64,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    /// Fractional seconds, truncated to `precision` digits.
    pub fraction: u32,
    pub precision: u8,
    pub pretty: String,
}

impl FormattedDuration {
    /// Seconds with the fractional digits, e.g. `14.100`.
    pub fn seconds_decimal(&self) -> String {
        if self.precision == 0 {
            self.seconds.to_string()
        } else {
            format!(
                "{}.{:0width$}",
                self.seconds,
                self.fraction,
                width = self.precision as usize
            )
        }
    }

    /// Total seconds represented by the fields (after truncation).
    pub fn total_secs(&self) -> f64 {
        let whole = self.days * SECS_PER_DAY
            + self.hours as u64 * 3600
            + self.minutes as u64 * 60
            + self.seconds as u64;
        whole as f64 + self.fraction as f64 / 10f64.powi(self.precision as i32)
    }

    /// `real <pretty>s`
    pub fn report_line(&self) -> String {
        format!("real {}s", self.pretty)
    }
}

/// Format a duration with `precision` fractional digits (clamped to 9).
pub fn format_duration(elapsed: Duration, precision: u8) -> FormattedDuration {
    let precision = precision.min(MAX_PRECISION);
    let whole = elapsed.as_secs();
    let fraction = elapsed.subsec_nanos() / 10u32.pow((MAX_PRECISION - precision) as u32);

    let days = whole / SECS_PER_DAY;
    let hours = ((whole / 3600) % 24) as u8;
    let minutes = ((whole / 60) % 60) as u8;
    let seconds = (whole % 60) as u8;

    let mut pretty = String::new();
    let mut shown = false;
    if days > 0 {
        let unit = if days == 1 { "day" } else { "days" };
        let _ = write!(pretty, "{days}{unit}, ");
        shown = true;
    }
    if shown || hours > 0 {
        let _ = write!(pretty, "{hours:02}:");
        shown = true;
    }
    if shown || minutes > 0 {
        let _ = write!(pretty, "{minutes:02}:");
    }
    let _ = write!(pretty, "{seconds:02}");
    if precision > 0 {
        let _ = write!(pretty, ".{fraction:0width$}", width = precision as usize);
    }
    // Only ever a single character: "03:02:14" -> "3:02:14", "00.5" -> "0.5".
    if pretty.starts_with('0') {
        pretty.remove(0);
    }

    FormattedDuration {
        days,
        hours,
        minutes,
        seconds,
        fraction,
        precision,
        pretty,
    }
}

/// Format fractional seconds. Negative or non-finite input clamps to zero.
pub fn format_secs(secs: f64, precision: u8) -> FormattedDuration {
    format_duration(secs_to_duration(secs), precision)
}

/// Convert fractional seconds to a `Duration`, rounding to the nearest
/// nanosecond so decimal inputs like `10934.1` keep their digits.
pub fn secs_to_duration(secs: f64) -> Duration {
    if !secs.is_finite() || secs <= 0.0 {
        return Duration::ZERO;
    }
    let nanos = (secs * 1e9).round();
    if nanos >= u128::MAX as f64 {
        return Duration::MAX;
    }
    duration_from_nanos(nanos as u128)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero() {
        let f = format_secs(0.0, 3);
        assert_eq!((f.days, f.hours, f.minutes, f.seconds, f.fraction), (0, 0, 0, 0, 0));
        assert_eq!(f.pretty, "0.000");
        assert_eq!(f.seconds_decimal(), "0.000");
    }

    #[test]
    fn hours_minutes_seconds() {
        let f = format_secs(3.0 * 3600.0 + 2.0 * 60.0 + 14.100, 3);
        assert_eq!((f.hours, f.minutes, f.seconds, f.fraction), (3, 2, 14, 100));
        assert_eq!(f.pretty, "3:02:14.100");
    }

    #[test]
    fn single_day_is_singular() {
        let f = format_secs(90061.5, 1);
        assert_eq!((f.days, f.hours, f.minutes, f.seconds, f.fraction), (1, 1, 1, 1, 5));
        assert_eq!(f.pretty, "1day, 01:01:01.5");
    }

    #[test]
    fn many_days_are_plural() {
        let f = format_secs(3.0 * 86400.0 + 5.0, 0);
        assert_eq!(f.pretty, "3days, 00:00:05");
    }

    #[test]
    fn truncates_instead_of_rounding() {
        let f = format_secs(4.9999, 3);
        assert_eq!(f.seconds, 4);
        assert_eq!(f.pretty, "4.999");
    }

    #[test]
    fn minutes_only() {
        assert_eq!(format_secs(65.25, 2).pretty, "1:05.25");
        assert_eq!(format_secs(600.0, 0).pretty, "10:00");
    }

    #[test]
    fn two_digit_seconds_keep_both_digits() {
        assert_eq!(format_secs(14.1, 3).pretty, "14.100");
        assert_eq!(format_secs(14.1, 3).seconds_decimal(), "14.100");
    }

    #[test]
    fn precision_zero_has_no_separator() {
        let f = format_secs(7.9, 0);
        assert_eq!(f.pretty, "7");
        assert_eq!(f.seconds_decimal(), "7");
        assert_eq!(format_secs(0.2, 0).pretty, "0");
    }

    #[test]
    fn precision_nine_keeps_nanos() {
        let f = format_duration(Duration::new(1, 5), 9);
        assert_eq!(f.pretty, "1.000000005");
    }

    #[test]
    fn precision_is_clamped() {
        let f = format_secs(1.5, 42);
        assert_eq!(f.precision, 9);
        assert_eq!(f.pretty, "1.500000000");
    }

    #[test]
    fn negative_and_nan_clamp_to_zero() {
        assert_eq!(format_secs(-3.0, 3).pretty, "0.000");
        assert_eq!(format_secs(f64::NAN, 1).pretty, "0.0");
    }

    #[test]
    fn report_line_wraps_pretty() {
        assert_eq!(format_secs(5.001, 3).report_line(), "real 5.001s");
    }

    #[test]
    fn total_secs_reconstructs() {
        let f = format_secs(90061.5, 1);
        assert!((f.total_secs() - 90061.5).abs() < 1e-9);
    }
}
