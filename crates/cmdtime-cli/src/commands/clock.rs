use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use clap::Args;
use cmdtime_core::{
    ClockError, ClockSampler, Config, CoreError, OverheadCalibrator, SystemClock, Timestamp,
};
use tracing::debug;

#[derive(Args)]
pub struct CalibrateArgs {
    /// Number of samples (default: calibration_loops from config)
    #[arg(long)]
    pub loops: Option<u32>,
    /// Sample by spawning `cmdtime now`, the way the shell hooks do
    #[arg(long)]
    pub spawn: bool,
}

/// Samples the clock by running a command that prints a timestamp.
///
/// The shell hooks read the clock through a child process, so calibrating
/// with this sampler captures the process-spawn cost they pay.
pub struct CommandClock {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandClock {
    pub fn new(program: PathBuf, args: Vec<String>) -> Self {
        Self { program, args }
    }

    /// `<this executable> now`
    pub fn current_exe() -> Result<Self, ClockError> {
        let exe = std::env::current_exe().map_err(|e| ClockError::Spawn {
            command: "current_exe".into(),
            message: e.to_string(),
        })?;
        Ok(Self::new(exe, vec!["now".into()]))
    }
}

impl ClockSampler for CommandClock {
    fn now(&mut self) -> Result<Timestamp, ClockError> {
        let spawn_err = |message: String| ClockError::Spawn {
            command: self.program.display().to_string(),
            message,
        };
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| spawn_err(e.to_string()))?;
        if !output.status.success() {
            return Err(spawn_err(format!("exited with {}", output.status)));
        }
        String::from_utf8_lossy(&output.stdout).trim().parse()
    }
}

/// `secs.nanos` with nine digits, the same shape as timestamps.
pub fn format_secs_exact(d: Duration) -> String {
    format!("{}.{:09}", d.as_secs(), d.subsec_nanos())
}

pub fn now() -> Result<(), CoreError> {
    let ts = SystemClock.now()?;
    println!("{ts}");
    Ok(())
}

pub fn calibrate(args: CalibrateArgs) -> Result<(), CoreError> {
    let loops = match args.loops {
        Some(n) => n,
        None => Config::load_or_default().settings().calibration_loops,
    };
    let mut calibrator = OverheadCalibrator::new(loops);
    let overhead = if args.spawn {
        let mut clock = CommandClock::current_exe()?;
        calibrator.overhead(&mut clock)?
    } else {
        calibrator.overhead(&mut SystemClock)?
    };
    debug!(loops = calibrator.loops(), spawn = args.spawn, "calibration done");
    println!("{}", format_secs_exact(overhead));
    Ok(())
}
