//! Error types for task run validation.

use super::RunId;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while building or changing task runs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RunDomainError {
    /// The due date falls before the start date.
    #[error("due date {due} precedes start date {start}")]
    DueBeforeStart {
        /// Start date of the run.
        start: NaiveDate,
        /// Rejected due date.
        due: NaiveDate,
    },

    /// The completion date falls before the start date.
    #[error("completion date {done} precedes start date {start}")]
    CompletionBeforeStart {
        /// Start date of the run.
        start: NaiveDate,
        /// Rejected completion date.
        done: NaiveDate,
    },

    /// The run was already completed.
    #[error("run {run_id} was already completed on {done}")]
    AlreadyCompleted {
        /// The completed run.
        run_id: RunId,
        /// Recorded completion date.
        done: NaiveDate,
    },

    /// A text field exceeds its storage limit.
    #[error("{field} exceeds {max} characters")]
    FieldTooLong {
        /// Name of the offending field.
        field: &'static str,
        /// Maximum number of characters accepted.
        max: usize,
    },
}
