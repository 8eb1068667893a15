use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::format::secs_to_duration;

/// When a finished command gets a `real ...s` report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ThresholdRepr", into = "ThresholdRepr")]
pub enum Threshold {
    /// Report every timed command.
    Always,
    /// Never report automatically.
    Never,
    /// Report commands that took strictly longer than this.
    After(Duration),
}

impl Threshold {
    pub fn should_report(&self, elapsed: Duration) -> bool {
        match self {
            Threshold::Always => true,
            Threshold::Never => false,
            Threshold::After(limit) => elapsed > *limit,
        }
    }

    /// Seconds as a number; non-positive values mean `Always`.
    pub fn from_secs_f64(secs: f64) -> Result<Self, ConfigError> {
        if secs.is_nan() {
            return Err(ConfigError::InvalidValue {
                key: "threshold".into(),
                message: "not a number".into(),
            });
        }
        if secs <= 0.0 {
            return Ok(Threshold::Always);
        }
        if secs.is_infinite() {
            return Ok(Threshold::Never);
        }
        Ok(Threshold::After(secs_to_duration(secs)))
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold::After(Duration::from_secs(5))
    }
}

impl FromStr for Threshold {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "always" => return Ok(Threshold::Always),
            "never" => return Ok(Threshold::Never),
            _ => {}
        }
        let secs: f64 = s.parse().map_err(|_| ConfigError::InvalidValue {
            key: "threshold".into(),
            message: format!("expected seconds, 'always' or 'never', got '{s}'"),
        })?;
        Threshold::from_secs_f64(secs)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Always => f.write_str("always"),
            Threshold::Never => f.write_str("never"),
            Threshold::After(d) => write!(f, "{}", d.as_secs_f64()),
        }
    }
}

/// On-disk form: a number of seconds or one of the keywords.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ThresholdRepr {
    Secs(f64),
    Keyword(String),
}

impl TryFrom<ThresholdRepr> for Threshold {
    type Error = ConfigError;

    fn try_from(repr: ThresholdRepr) -> Result<Self, Self::Error> {
        match repr {
            ThresholdRepr::Secs(secs) => Threshold::from_secs_f64(secs),
            ThresholdRepr::Keyword(s) => s.parse(),
        }
    }
}

impl From<Threshold> for ThresholdRepr {
    fn from(t: Threshold) -> Self {
        match t {
            Threshold::After(d) => ThresholdRepr::Secs(d.as_secs_f64()),
            other => ThresholdRepr::Keyword(other.to_string()),
        }
    }
}
