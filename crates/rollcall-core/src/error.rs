//! Error types for Rollcall core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-facing messages and exit codes.

use chrono::NaiveDate;
use thiserror::Error;

use crate::roster::StudentId;

/// Result type alias for Rollcall operations.
pub type Result<T> = std::result::Result<T, RollcallError>;

/// Core error type for Rollcall operations.
#[derive(Debug, Error)]
pub enum RollcallError {
    /// The request never produced a response (network, DNS, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The server refused a date before its configured minimum
    #[error("Date is earlier than the minimum allowed date {min_date}")]
    DateTooEarly { min_date: NaiveDate },

    /// A response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// An edit referenced a student that is not on the loaded roster
    #[error("Student {0} is not on the loaded roster")]
    UnknownStudent(StudentId),

    /// An operation needed a loaded roster date but none is loaded yet
    #[error("No roster date has been loaded")]
    NoDateLoaded,

    /// A roster load has been issued and not yet completed
    #[error("A roster load for {0} is still in progress")]
    LoadInProgress(NaiveDate),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<serde_json::Error> for RollcallError {
    fn from(err: serde_json::Error) -> Self {
        RollcallError::Decode(err.to_string())
    }
}
