//! Task template aggregate root.

use super::{TaskIdPrefix, TaskIdentifier, TemplateDetails, TemplateId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reusable definition of a recurring task.
///
/// A template carries no [`TaskIdentifier`] until it is saved for the first
/// time; from then on the identifier is fixed, whatever happens to the
/// planner or sector the prefix was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTemplate {
    id: TemplateId,
    task_id: Option<TaskIdentifier>,
    details: TemplateDetails,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTemplateData {
    /// Persisted internal key.
    pub id: TemplateId,
    /// Persisted task identifier.
    pub task_id: Option<TaskIdentifier>,
    /// Persisted descriptive fields.
    pub details: TemplateDetails,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl TaskTemplate {
    /// Creates an unsaved template without a task identifier.
    #[must_use]
    pub fn new(details: TemplateDetails, clock: &impl Clock) -> Self {
        Self {
            id: TemplateId::new(),
            task_id: None,
            details,
            created_at: clock.utc(),
        }
    }

    /// Sets a caller-supplied identifier on an unsaved template, bypassing
    /// allocation. Saving an existing template ignores this value.
    #[must_use]
    pub fn with_task_id(mut self, task_id: TaskIdentifier) -> Self {
        self.task_id = Some(task_id);
        self
    }

    /// Reconstructs a template from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTemplateData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            details: data.details,
            created_at: data.created_at,
        }
    }

    /// Returns the internal key.
    #[must_use]
    pub const fn id(&self) -> TemplateId {
        self.id
    }

    /// Returns the task identifier once one has been assigned.
    #[must_use]
    pub const fn task_id(&self) -> Option<&TaskIdentifier> {
        self.task_id.as_ref()
    }

    /// Returns the descriptive fields.
    #[must_use]
    pub const fn details(&self) -> &TemplateDetails {
        &self.details
    }

    /// Returns the descriptive fields for revision.
    pub const fn details_mut(&mut self) -> &mut TemplateDetails {
        &mut self.details
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Derives the allocation prefix from the current planner and sector.
    #[must_use]
    pub fn id_prefix(&self) -> TaskIdPrefix {
        TaskIdPrefix::derive(self.details.planner.as_str(), self.details.sector.as_str())
    }

    /// Stores `task_id` unless an identifier is already present.
    ///
    /// Returns `true` when the identifier was stored.
    pub(crate) fn assign_task_id(&mut self, task_id: TaskIdentifier) -> bool {
        if self.task_id.is_some() {
            return false;
        }
        self.task_id = Some(task_id);
        true
    }

    /// Replaces the identifier with the one already on record for this
    /// template.
    pub(crate) fn keep_recorded_task_id(&mut self, recorded: Option<TaskIdentifier>) {
        if recorded.is_some() {
            self.task_id = recorded;
        }
    }
}

impl fmt::Display for TaskTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.task_id {
            Some(task_id) => write!(f, "{task_id} - {}", self.details.activity),
            None => write!(f, "NO-ID - {}", self.details.activity),
        }
    }
}
