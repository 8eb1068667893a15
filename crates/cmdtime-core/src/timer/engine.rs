//! Command timer state machine.
//!
//! The host shell calls [`CommandTimer::before_command`] right before a
//! user-entered line runs and [`CommandTimer::after_command`] right before
//! the next prompt. The timer owns everything the two hooks share: the
//! settings, the calibrated overhead and the last measurement.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running  -> Idle   (timed command)
//! Idle -> Bypassed -> Idle   (the "show last" command)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = CommandTimer::new(settings, SystemClock)?;
//! timer.before_command("make");
//! // ... run it ...
//! if let Some(line) = timer.after_command().and_then(|e| e.report_line()) {
//!     eprintln!("{line}");
//! }
//! ```

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::threshold::Threshold;
use crate::calibrate::OverheadCalibrator;
use crate::clock::{ClockSampler, Timestamp};
use crate::error::ClockError;
use crate::events::Event;
use crate::format::{format_duration, FormattedDuration, MAX_PRECISION};
use crate::vars::TimerVars;

pub const DEFAULT_BYPASS_COMMAND: &str = "timelast";

/// Normalised settings the timer runs with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSettings {
    pub threshold: Threshold,
    /// Fractional digits, 0..=9.
    pub precision: u8,
    /// At least 1.
    pub calibration_loops: u32,
    pub bypass_command: String,
}

impl TimerSettings {
    /// Clamp out-of-range values instead of rejecting them.
    pub fn normalized(mut self) -> Self {
        if self.precision > MAX_PRECISION {
            warn!(precision = self.precision, "precision out of range, using {MAX_PRECISION}");
            self.precision = MAX_PRECISION;
        }
        if self.calibration_loops == 0 {
            warn!("calibration_loops must be at least 1");
            self.calibration_loops = 1;
        }
        self
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            threshold: Threshold::default(),
            precision: 3,
            calibration_loops: 5,
            bypass_command: DEFAULT_BYPASS_COMMAND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running { start: Timestamp },
    /// The bypass command is running; nothing is measured.
    Bypassed,
}

/// Result of one timed command.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// `stop - start - overhead`, clamped at zero.
    pub elapsed: Duration,
    pub formatted: FormattedDuration,
    pub reported: bool,
}

impl Measurement {
    pub fn report_line(&self) -> String {
        self.formatted.report_line()
    }

    pub fn vars(&self) -> TimerVars {
        TimerVars::new(&self.formatted, self.elapsed)
    }

    pub fn to_event(&self) -> Event {
        Event::CommandFinished {
            elapsed_ns: u64::try_from(self.elapsed.as_nanos()).unwrap_or(u64::MAX),
            pretty: self.formatted.pretty.clone(),
            reported: self.reported,
            at: Utc::now(),
        }
    }
}

pub struct CommandTimer<C> {
    settings: TimerSettings,
    clock: C,
    overhead: Duration,
    state: TimerState,
    last: Option<Measurement>,
    internal: bool,
}

impl<C: ClockSampler> CommandTimer<C> {
    /// Calibrate the clock overhead and start idle.
    ///
    /// # Errors
    ///
    /// Fails if the clock cannot be sampled.
    pub fn new(settings: TimerSettings, mut clock: C) -> Result<Self, ClockError> {
        let mut calibrator = OverheadCalibrator::new(settings.calibration_loops);
        let overhead = calibrator.overhead(&mut clock)?;
        Ok(Self::with_overhead(settings, clock, overhead))
    }

    /// Build with an overhead measured elsewhere.
    pub fn with_overhead(settings: TimerSettings, clock: C, overhead: Duration) -> Self {
        Self {
            settings: settings.normalized(),
            clock,
            overhead,
            state: TimerState::Idle,
            last: None,
            internal: false,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn overhead(&self) -> Duration {
        self.overhead
    }

    pub fn last(&self) -> Option<&Measurement> {
        self.last.as_ref()
    }

    /// `real <pretty>s` for the most recent timed command.
    pub fn last_report(&self) -> Option<String> {
        self.last.as_ref().map(Measurement::report_line)
    }

    pub fn vars(&self) -> Option<TimerVars> {
        self.last.as_ref().map(Measurement::vars)
    }

    pub fn is_bypass(&self, line: &str) -> bool {
        line.trim() == self.settings.bypass_command
    }

    pub fn is_internal(&self) -> bool {
        self.internal
    }

    /// Mark the start of an evaluation the host runs for itself
    /// (prompt rendering and the like). Hooks are ignored until
    /// [`exit_internal`](Self::exit_internal).
    pub fn enter_internal(&mut self) {
        self.internal = true;
    }

    pub fn exit_internal(&mut self) {
        self.internal = false;
    }

    pub fn before_command(&mut self, line: &str) -> Option<Event> {
        if self.internal {
            return None;
        }
        if self.is_bypass(line) {
            self.state = TimerState::Bypassed;
            return Some(Event::CommandBypassed {
                command: line.trim().to_string(),
                at: Utc::now(),
            });
        }
        match self.clock.now() {
            Ok(start) => {
                self.state = TimerState::Running { start };
                debug!(command = line, %start, "command started");
                Some(Event::CommandStarted {
                    command: line.to_string(),
                    at: Utc::now(),
                })
            }
            Err(e) => {
                warn!(error = %e, "cannot sample clock, command will not be timed");
                self.state = TimerState::Idle;
                None
            }
        }
    }

    pub fn after_command(&mut self) -> Option<Event> {
        if self.internal {
            return None;
        }
        match self.state {
            TimerState::Idle => None,
            TimerState::Bypassed => {
                self.state = TimerState::Idle;
                None
            }
            TimerState::Running { start } => {
                self.state = TimerState::Idle;
                let stop = match self.clock.now() {
                    Ok(ts) => ts,
                    Err(e) => {
                        warn!(error = %e, "cannot sample clock, dropping measurement");
                        return None;
                    }
                };
                let m = self.measure(start, stop);
                debug!(elapsed = %m.formatted.pretty, reported = m.reported, "command finished");
                let event = m.to_event();
                self.last = Some(m);
                Some(event)
            }
        }
    }

    /// Elapsed time between two samples, minus overhead, formatted and
    /// checked against the threshold. Does not touch timer state.
    pub fn measure(&self, start: Timestamp, stop: Timestamp) -> Measurement {
        let elapsed = stop
            .saturating_since(start)
            .saturating_sub(self.overhead);
        let formatted = format_duration(elapsed, self.settings.precision);
        Measurement {
            elapsed,
            reported: self.settings.threshold.should_report(elapsed),
            formatted,
        }
    }
}
