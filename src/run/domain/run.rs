//! Task run aggregate: one concrete occurrence of a template.

use super::{RunDomainError, RunId, RunStatus};
use crate::template::domain::TemplateId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Largest number of characters accepted for the person who finished a run.
pub const DONE_BY_MAX_LEN: usize = 150;

/// One scheduled or finished occurrence of a task template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRun {
    id: RunId,
    template_id: TemplateId,
    start_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    done_date: Option<NaiveDate>,
    notes: String,
    done_by: Option<String>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedRunData {
    /// Persisted run identifier.
    pub id: RunId,
    /// Owning template.
    pub template_id: TemplateId,
    /// Persisted start date.
    pub start_date: Option<NaiveDate>,
    /// Persisted due date.
    pub due_date: Option<NaiveDate>,
    /// Persisted completion date.
    pub done_date: Option<NaiveDate>,
    /// Persisted notes.
    pub notes: String,
    /// Persisted completing person.
    pub done_by: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl TaskRun {
    /// Creates an unfinished run for `template_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RunDomainError::DueBeforeStart`] when both dates are given
    /// and the due date comes first.
    pub fn new(
        template_id: TemplateId,
        start_date: Option<NaiveDate>,
        due_date: Option<NaiveDate>,
        clock: &impl Clock,
    ) -> Result<Self, RunDomainError> {
        ensure_due_after_start(start_date, due_date)?;
        Ok(Self {
            id: RunId::new(),
            template_id,
            start_date,
            due_date,
            done_date: None,
            notes: String::new(),
            done_by: None,
            created_at: clock.utc(),
        })
    }

    /// Sets free-form notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Reconstructs a run from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedRunData) -> Self {
        Self {
            id: data.id,
            template_id: data.template_id,
            start_date: data.start_date,
            due_date: data.due_date,
            done_date: data.done_date,
            notes: data.notes,
            done_by: data.done_by,
            created_at: data.created_at,
        }
    }

    /// Returns the run identifier.
    #[must_use]
    pub const fn id(&self) -> RunId {
        self.id
    }

    /// Returns the owning template.
    #[must_use]
    pub const fn template_id(&self) -> TemplateId {
        self.template_id
    }

    /// Returns the start date.
    #[must_use]
    pub const fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the completion date.
    #[must_use]
    pub const fn done_date(&self) -> Option<NaiveDate> {
        self.done_date
    }

    /// Returns the notes.
    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Returns who completed the run.
    #[must_use]
    pub fn done_by(&self) -> Option<&str> {
        self.done_by.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Derives the status as seen on `today`.
    #[must_use]
    pub fn status_on(&self, today: NaiveDate) -> RunStatus {
        RunStatus::derive(self.due_date, self.done_date, today)
    }

    /// Moves the due date. Passing `None` clears the schedule.
    ///
    /// # Errors
    ///
    /// Returns [`RunDomainError::DueBeforeStart`] when the new due date
    /// precedes the start date.
    pub fn reschedule(&mut self, due_date: Option<NaiveDate>) -> Result<(), RunDomainError> {
        ensure_due_after_start(self.start_date, due_date)?;
        self.due_date = due_date;
        Ok(())
    }

    /// Records completion on `done_date`.
    ///
    /// # Errors
    ///
    /// Returns [`RunDomainError::AlreadyCompleted`] when the run already has
    /// a done date, [`RunDomainError::CompletionBeforeStart`] when
    /// `done_date` precedes the start date, and
    /// [`RunDomainError::FieldTooLong`] for an oversized `done_by`.
    pub fn complete(
        &mut self,
        done_date: NaiveDate,
        done_by: Option<&str>,
    ) -> Result<(), RunDomainError> {
        if let Some(done) = self.done_date {
            return Err(RunDomainError::AlreadyCompleted {
                run_id: self.id,
                done,
            });
        }
        if let Some(start) = self.start_date.filter(|start| done_date < *start) {
            return Err(RunDomainError::CompletionBeforeStart {
                start,
                done: done_date,
            });
        }
        let person = done_by.map(str::trim).filter(|name| !name.is_empty());
        if person.is_some_and(|name| name.chars().count() > DONE_BY_MAX_LEN) {
            return Err(RunDomainError::FieldTooLong {
                field: "done_by",
                max: DONE_BY_MAX_LEN,
            });
        }

        self.done_date = Some(done_date);
        self.done_by = person.map(str::to_owned);
        Ok(())
    }
}

fn ensure_due_after_start(
    start_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
) -> Result<(), RunDomainError> {
    match (start_date, due_date) {
        (Some(start), Some(due)) if due < start => Err(RunDomainError::DueBeforeStart { start, due }),
        _ => Ok(()),
    }
}
