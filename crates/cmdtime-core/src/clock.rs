//! Clock sampling.
//!
//! A [`Timestamp`] is a wall-clock reading with nanosecond resolution. Its
//! text form is `<secs>.<nanos>` with exactly nine fractional digits, the
//! same shape `date +%s.%N` prints, so shell hooks can pass timestamps back
//! to the CLI without losing precision.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;

use crate::error::ClockError;

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// Nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i128);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    pub fn from_nanos(nanos: i128) -> Self {
        Self(nanos)
    }

    pub fn from_secs(secs: i64) -> Self {
        Self(secs as i128 * NANOS_PER_SEC)
    }

    pub fn as_nanos(&self) -> i128 {
        self.0
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / NANOS_PER_SEC as f64
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Time elapsed from `earlier` to `self`, or zero if the clock went backwards.
    pub fn saturating_since(&self, earlier: Timestamp) -> Duration {
        let delta = self.0 - earlier.0;
        if delta <= 0 {
            return Duration::ZERO;
        }
        duration_from_nanos(delta as u128)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let secs = abs / NANOS_PER_SEC as u128;
        let nanos = abs % NANOS_PER_SEC as u128;
        write!(f, "{sign}{secs}.{nanos:09}")
    }
}

impl FromStr for Timestamp {
    type Err = ClockError;

    /// Accepts `secs`, `secs.frac` (up to nine fractional digits).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ClockError::Malformed(s.to_string());
        let text = s.trim();
        let (negative, text) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (whole, frac) = text.split_once('.').unwrap_or((text, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(malformed());
        }
        if frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let secs: i128 = if whole.is_empty() {
            0
        } else {
            if !whole.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            whole.parse().map_err(|_| malformed())?
        };
        let nanos: i128 = if frac.is_empty() {
            0
        } else {
            format!("{frac:0<9}").parse().map_err(|_| malformed())?
        };
        let total = secs
            .checked_mul(NANOS_PER_SEC)
            .and_then(|v| v.checked_add(nanos))
            .ok_or_else(malformed)?;
        Ok(Timestamp(if negative { -total } else { total }))
    }
}

pub(crate) fn duration_from_nanos(nanos: u128) -> Duration {
    let secs = (nanos / NANOS_PER_SEC as u128).min(u64::MAX as u128) as u64;
    let sub = (nanos % NANOS_PER_SEC as u128) as u32;
    Duration::new(secs, sub)
}

/// Source of timestamps.
pub trait ClockSampler {
    fn now(&mut self) -> Result<Timestamp, ClockError>;
}

impl<C: ClockSampler + ?Sized> ClockSampler for &mut C {
    fn now(&mut self) -> Result<Timestamp, ClockError> {
        (**self).now()
    }
}

impl<C: ClockSampler + ?Sized> ClockSampler for Box<C> {
    fn now(&mut self) -> Result<Timestamp, ClockError> {
        (**self).now()
    }
}

/// The system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl ClockSampler for SystemClock {
    fn now(&mut self) -> Result<Timestamp, ClockError> {
        Utc::now()
            .timestamp_nanos_opt()
            .map(|n| Timestamp(n as i128))
            .ok_or_else(|| ClockError::Unavailable("system time out of range".into()))
    }
}

/// Replays a fixed sequence of timestamps.
///
/// Used for dry runs and tests where the elapsed time must be exact.
#[derive(Debug, Default, Clone)]
pub struct ScriptedClock {
    samples: VecDeque<Timestamp>,
}

impl ScriptedClock {
    pub fn new<I: IntoIterator<Item = Timestamp>>(samples: I) -> Self {
        Self {
            samples: samples.into_iter().collect(),
        }
    }

    /// Build from nanosecond values.
    pub fn from_nanos<I: IntoIterator<Item = i128>>(samples: I) -> Self {
        Self::new(samples.into_iter().map(Timestamp::from_nanos))
    }

    pub fn push(&mut self, ts: Timestamp) {
        self.samples.push_back(ts);
    }

    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl ClockSampler for ScriptedClock {
    fn now(&mut self) -> Result<Timestamp, ClockError> {
        self.samples.pop_front().ok_or(ClockError::Exhausted)
    }
}
