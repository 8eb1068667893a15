//! Values exported to the prompt after each timed command.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::format::FormattedDuration;

pub const VAR_DAYS: &str = "CMDTIME_DAYS";
pub const VAR_HOURS: &str = "CMDTIME_HOURS";
pub const VAR_MINUTES: &str = "CMDTIME_MINUTES";
pub const VAR_SECONDS: &str = "CMDTIME_SECONDS";
pub const VAR_STRING: &str = "CMDTIME_STRING";
pub const VAR_TOTAL: &str = "CMDTIME_TOTAL";

/// The query surface of the last measurement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerVars {
    pub days: u64,
    pub hours: u8,
    pub minutes: u8,
    /// Seconds with decimals, e.g. `14.100`.
    pub seconds: String,
    /// Pretty composite string, e.g. `3:02:14.100`.
    pub string: String,
    /// Raw elapsed seconds with nanosecond digits.
    pub total: String,
}

impl TimerVars {
    pub fn new(formatted: &FormattedDuration, elapsed: Duration) -> Self {
        Self {
            days: formatted.days,
            hours: formatted.hours,
            minutes: formatted.minutes,
            seconds: formatted.seconds_decimal(),
            string: formatted.pretty.clone(),
            total: format!("{}.{:09}", elapsed.as_secs(), elapsed.subsec_nanos()),
        }
    }

    /// Name/value pairs in a stable order.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            (VAR_DAYS, self.days.to_string()),
            (VAR_HOURS, self.hours.to_string()),
            (VAR_MINUTES, self.minutes.to_string()),
            (VAR_SECONDS, self.seconds.clone()),
            (VAR_STRING, self.string.clone()),
            (VAR_TOTAL, self.total.clone()),
        ]
    }

    /// POSIX shell assignments suitable for `eval`.
    pub fn to_shell(&self) -> String {
        self.pairs()
            .into_iter()
            .map(|(name, value)| format!("{name}={}\n", shell_quote(&value)))
            .collect()
    }
}

/// Single-quote a value for POSIX shells.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
