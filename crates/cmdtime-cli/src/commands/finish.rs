//! Hook-mode "after command".
//!
//! The shell keeps the start timestamp and the calibrated overhead in its
//! own variables and hands them to this command before the next prompt.
//! Stdout carries assignments for `eval`; the report line goes to stderr.

use std::time::Duration;

use clap::Args;
use cmdtime_core::format::secs_to_duration;
use cmdtime_core::{ClockSampler, CommandTimer, Config, CoreError, SystemClock, Timestamp};
use tracing::debug;

#[derive(Args)]
pub struct FinishArgs {
    /// Start timestamp; missing or 0 means timing was disabled
    #[arg(long)]
    pub start: Option<Timestamp>,
    /// Stop timestamp (default: now)
    #[arg(long)]
    pub stop: Option<Timestamp>,
    /// Calibrated overhead in seconds
    #[arg(long, default_value_t = 0.0)]
    pub overhead: f64,
    /// Print the finish event as JSON instead of shell assignments
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: FinishArgs) -> Result<(), CoreError> {
    let stop = match args.stop {
        Some(ts) => ts,
        None => SystemClock.now()?,
    };
    let start = match args.start {
        Some(ts) if !ts.is_zero() => ts,
        _ => {
            debug!("no start timestamp, nothing to report");
            return Ok(());
        }
    };

    let overhead: Duration = secs_to_duration(args.overhead);
    let settings = Config::load_or_default().settings();
    let timer = CommandTimer::with_overhead(settings, SystemClock, overhead);
    let measurement = timer.measure(start, stop);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&measurement.to_event())?);
    } else {
        print!("{}", measurement.vars().to_shell());
    }
    if measurement.reported {
        eprintln!("{}", measurement.report_line());
    }
    Ok(())
}
