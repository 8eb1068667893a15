//! Sampling-overhead calibration.
//!
//! Every timed command takes two explicit clock samples (start and stop).
//! When sampling is expensive, e.g. when the shell has to spawn a process
//! to read the clock, that cost ends up inside the measurement. The
//! calibrator estimates the per-sample cost once so it can be subtracted.

use std::time::Duration;

use tracing::debug;

use crate::clock::ClockSampler;
use crate::error::ClockError;

/// Average cost of a single `clock.now()` call over `loops` samples.
///
/// `loops == 0` is treated as 1.
pub fn calibrate<C: ClockSampler>(clock: &mut C, loops: u32) -> Result<Duration, ClockError> {
    let loops = loops.max(1);
    let start = clock.now()?;
    let mut stop = start;
    for _ in 0..loops {
        stop = clock.now()?;
    }
    let overhead = stop.saturating_since(start) / loops;
    debug!(loops, overhead_ns = overhead.as_nanos() as u64, "calibrated clock overhead");
    Ok(overhead)
}

/// Caches the calibrated overhead for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct OverheadCalibrator {
    loops: u32,
    cached: Option<Duration>,
}

impl OverheadCalibrator {
    pub fn new(loops: u32) -> Self {
        Self {
            loops: loops.max(1),
            cached: None,
        }
    }

    pub fn loops(&self) -> u32 {
        self.loops
    }

    /// Return the cached overhead, calibrating on first use.
    pub fn overhead<C: ClockSampler>(&mut self, clock: &mut C) -> Result<Duration, ClockError> {
        if let Some(d) = self.cached {
            return Ok(d);
        }
        let d = calibrate(clock, self.loops)?;
        self.cached = Some(d);
        Ok(d)
    }

    pub fn cached(&self) -> Option<Duration> {
        self.cached
    }

    /// Forget the cached value; the next `overhead()` call recalibrates.
    pub fn reset(&mut self) {
        self.cached = None;
    }
}
