use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every transition of the command timer produces an Event.
/// Hosts print them with `--json`; they are also logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    CommandStarted {
        command: String,
        at: DateTime<Utc>,
    },
    /// The "show last" command ran; nothing was timed.
    CommandBypassed {
        command: String,
        at: DateTime<Utc>,
    },
    CommandFinished {
        /// Elapsed time after overhead subtraction, in nanoseconds.
        elapsed_ns: u64,
        pretty: String,
        reported: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The report line for a finished command that crossed the threshold.
    pub fn report_line(&self) -> Option<String> {
        match self {
            Event::CommandFinished {
                pretty,
                reported: true,
                ..
            } => Some(format!("real {pretty}s")),
            _ => None,
        }
    }
}
