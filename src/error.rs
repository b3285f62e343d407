//! Error types for timing and event log replay

use thiserror::Error;

/// Recoverable failures when closing a measurement
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimingError {
    #[error("Received end event for event type that was not started: {identifier}")]
    NotStarted { identifier: String },

    #[error("Clock went backwards by {millis} ms while timing {identifier}; sample dropped")]
    ClockWentBackwards { identifier: String, millis: i64 },
}

/// Failures reading a recorded event log
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Failed to read event log: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid event record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ReplayError>;
