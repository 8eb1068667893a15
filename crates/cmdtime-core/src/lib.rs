//! # cmdtime Core Library
//!
//! Times interactively entered shell commands and reports the wall-clock
//! duration of the slow ones as `real <elapsed>s`. The CLI binary is a thin
//! layer that connects this library to shell hooks or runs its own timed
//! REPL.
//!
//! ## Architecture
//!
//! - **Clock**: nanosecond timestamps from a [`ClockSampler`]
//! - **Calibration**: the per-sample cost of the clock, measured once and
//!   subtracted from every measurement
//! - **Formatting**: days/hours/minutes/seconds with leading units elided
//! - **Timer**: the before/after-command state machine and its threshold
//! - **Host**: lifecycle hooks and a REPL driver around them
//! - **Storage**: TOML configuration with environment overrides
//!
//! ## Key Components
//!
//! - [`CommandTimer`]: Core timer state machine
//! - [`format_duration`]: Duration to [`FormattedDuration`]
//! - [`OverheadCalibrator`]: Cached clock-overhead estimate
//! - [`Config`]: Application configuration management
//! - [`Session`]: Timed read-eval loop over a [`Host`]

pub mod calibrate;
pub mod clock;
pub mod error;
pub mod events;
pub mod format;
pub mod host;
pub mod storage;
pub mod timer;
pub mod vars;

pub use calibrate::{calibrate, OverheadCalibrator};
pub use clock::{ClockSampler, ScriptedClock, SystemClock, Timestamp};
pub use error::{ClockError, ConfigError, CoreError};
pub use events::Event;
pub use format::{format_duration, format_secs, FormattedDuration, MAX_PRECISION};
pub use host::{Host, LifecycleHooks, Session};
pub use storage::Config;
pub use timer::{CommandTimer, Measurement, Threshold, TimerSettings, TimerState};
pub use vars::TimerVars;
