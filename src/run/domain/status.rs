//! Derived status of a task run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a run on a given day. Never stored; always derived from the
/// run's dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// No due date has been set yet.
    NeedsScheduling,
    /// Finished after the due date.
    DeliveredLate,
    /// Finished on or before the due date.
    Completed,
    /// Not finished and past the due date.
    Overdue,
    /// Not finished and due today.
    DueToday,
    /// Not finished and due in the future.
    InProgress,
}

impl RunStatus {
    /// Derives the status from a run's dates as seen on `today`.
    ///
    /// The first matching rule wins: a missing due date means the run still
    /// needs scheduling; a done date decides between late delivery and
    /// completion; otherwise `today` is compared with the due date.
    #[must_use]
    pub fn derive(due_date: Option<NaiveDate>, done_date: Option<NaiveDate>, today: NaiveDate) -> Self {
        let Some(due) = due_date else {
            return Self::NeedsScheduling;
        };
        if let Some(done) = done_date {
            return if done > due {
                Self::DeliveredLate
            } else {
                Self::Completed
            };
        }
        match today.cmp(&due) {
            std::cmp::Ordering::Greater => Self::Overdue,
            std::cmp::Ordering::Equal => Self::DueToday,
            std::cmp::Ordering::Less => Self::InProgress,
        }
    }

    /// Returns the display label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NeedsScheduling => "needs scheduling",
            Self::DeliveredLate => "delivered late",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
            Self::DueToday => "due today",
            Self::InProgress => "in progress",
        }
    }

    /// Returns `true` once the run has a done date.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::DeliveredLate | Self::Completed)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
