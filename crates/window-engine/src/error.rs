//! Error types for window-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid time '{0}': expected HHMM with hour 00-23 and minute 00-59")]
    InvalidTime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// The conversion service could not produce a UTC instant. Covers transport
    /// failures, non-2xx statuses and unusable response bodies alike.
    #[error("Time conversion failed for '{location}': {reason}")]
    Conversion { location: String, reason: String },

    #[error("Constraint for '{location}' is empty: end {end} is not after start {start}")]
    EmptyInterval {
        location: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("At least {required} constraints are required, found {found}")]
    InsufficientConstraints { required: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, EngineError>;
