//! Repository port for task run persistence.

use crate::run::domain::{RunFilter, RunId, TaskRun};
use crate::template::domain::TemplateId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for run repository operations.
pub type RunRepositoryResult<T> = Result<T, RunRepositoryError>;

/// Task run persistence contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRunRepository: Send + Sync {
    /// Stores a new run.
    ///
    /// # Errors
    ///
    /// Returns [`RunRepositoryError::DuplicateRun`] when the identifier is
    /// taken and [`RunRepositoryError::TemplateNotFound`] when the owning
    /// template does not exist.
    async fn store(&self, run: &TaskRun) -> RunRepositoryResult<()>;

    /// Replaces the start date, due date, and notes of a stored run.
    /// Completion fields are left as stored.
    ///
    /// # Errors
    ///
    /// Returns [`RunRepositoryError::NotFound`] when the run does not exist.
    async fn update(&self, run: &TaskRun) -> RunRepositoryResult<()>;

    /// Writes the completion date and person of `run`, but only while the
    /// stored run is still open. Of two concurrent completions exactly one
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`RunRepositoryError::AlreadyCompleted`] when the stored run
    /// already has a done date and [`RunRepositoryError::NotFound`] when it
    /// does not exist.
    async fn record_completion(&self, run: &TaskRun) -> RunRepositoryResult<()>;

    /// Finds a run by identifier.
    async fn find_by_id(&self, id: RunId) -> RunRepositoryResult<Option<TaskRun>>;

    /// Lists the runs of one template, by due date with unscheduled runs
    /// last.
    async fn find_by_template(&self, template_id: TemplateId) -> RunRepositoryResult<Vec<TaskRun>>;

    /// Lists runs matching the date and template criteria of `filter`, in
    /// the same order as [`Self::find_by_template`].
    async fn search(&self, filter: &RunFilter) -> RunRepositoryResult<Vec<TaskRun>>;
}

/// Errors returned by run repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RunRepositoryError {
    /// A run with the same identifier already exists.
    #[error("duplicate run: {0}")]
    DuplicateRun(RunId),

    /// The run was not found.
    #[error("run not found: {0}")]
    NotFound(RunId),

    /// The run was completed by someone else first.
    #[error("run already completed: {0}")]
    AlreadyCompleted(RunId),

    /// The owning template does not exist.
    #[error("template not found: {0}")]
    TemplateNotFound(TemplateId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RunRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
