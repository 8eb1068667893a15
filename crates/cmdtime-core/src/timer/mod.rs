mod engine;
mod threshold;

pub use engine::{
    CommandTimer, Measurement, TimerSettings, TimerState, DEFAULT_BYPASS_COMMAND,
};
pub use threshold::Threshold;
