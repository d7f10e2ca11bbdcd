//! Repository port for template persistence and sequence allocation.
//!
//! Writes happen through [`TaskTemplateRepository::transaction`], which runs
//! a unit of work against a [`TemplateTransaction`]. Everything done through
//! the transaction commits together or not at all, which is what lets a
//! failed template insert take its counter increment down with it.

use crate::template::domain::{
    SequenceNumber, TaskIdPrefix, TaskIdentifier, TaskTemplate, TemplateFilter, TemplateId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for template repository operations.
pub type TemplateRepositoryResult<T> = Result<T, TemplateRepositoryError>;

/// Work executed inside a single unit of work.
pub type TransactionWork<T> =
    Box<dyn FnOnce(&mut dyn TemplateTransaction) -> TemplateRepositoryResult<T> + Send>;

/// Operations available inside a unit of work.
pub trait TemplateTransaction {
    /// Allocates the next number for `prefix`.
    ///
    /// The counter row is created on first use and held under an exclusive
    /// lock until the unit of work ends, so concurrent allocations for the
    /// same prefix queue up behind each other.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateRepositoryError::Concurrency`] when the lock cannot
    /// be obtained and [`TemplateRepositoryError::SequenceExhausted`] when the
    /// counter cannot grow any further.
    fn allocate_sequence(&mut self, prefix: &TaskIdPrefix)
    -> TemplateRepositoryResult<SequenceNumber>;

    /// Raises the counter for `prefix` so it covers `number`.
    ///
    /// Used when a template arrives with an identifier in the allocator's
    /// layout: later allocations for the prefix continue above it. The
    /// counter row is locked exactly as in [`Self::allocate_sequence`] and
    /// never moves backwards.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateRepositoryError::Concurrency`] when the lock cannot
    /// be obtained.
    fn reserve_sequence(
        &mut self,
        prefix: &TaskIdPrefix,
        number: SequenceNumber,
    ) -> TemplateRepositoryResult<()>;

    /// Loads a template by internal key.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateRepositoryError::Persistence`] when the lookup fails.
    fn find_template(&mut self, id: TemplateId) -> TemplateRepositoryResult<Option<TaskTemplate>>;

    /// Inserts a template that already carries its task identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateRepositoryError::MissingTaskIdentifier`] for a
    /// template without identifier,
    /// [`TemplateRepositoryError::DuplicateTemplate`] when the key is taken,
    /// and [`TemplateRepositoryError::DuplicateTaskIdentifier`] when the
    /// identifier is.
    fn insert_template(&mut self, template: &TaskTemplate) -> TemplateRepositoryResult<()>;

    /// Updates the descriptive fields of a stored template. The stored task
    /// identifier is never rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateRepositoryError::NotFound`] when the template does
    /// not exist.
    fn update_template(&mut self, template: &TaskTemplate) -> TemplateRepositoryResult<()>;
}

/// Template persistence contract.
#[async_trait]
pub trait TaskTemplateRepository: Send + Sync {
    /// Runs `work` as one atomic unit: its effects are committed when it
    /// returns `Ok` and rolled back when it returns `Err`.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `work`, or
    /// [`TemplateRepositoryError::Concurrency`] when the unit of work cannot
    /// be started or committed.
    async fn transaction<T>(&self, work: TransactionWork<T>) -> TemplateRepositoryResult<T>
    where
        T: Send + 'static;

    /// Finds a template by internal key.
    async fn find_by_id(&self, id: TemplateId) -> TemplateRepositoryResult<Option<TaskTemplate>>;

    /// Finds a template by task identifier.
    async fn find_by_task_id(
        &self,
        task_id: &TaskIdentifier,
    ) -> TemplateRepositoryResult<Option<TaskTemplate>>;

    /// Lists templates matching `filter`, ordered by task identifier.
    async fn search(&self, filter: &TemplateFilter) -> TemplateRepositoryResult<Vec<TaskTemplate>>;

    /// Returns the last number allocated for `prefix`, or `None` when the
    /// prefix has never been used.
    async fn last_allocated(&self, prefix: &TaskIdPrefix) -> TemplateRepositoryResult<Option<u64>>;
}

/// Errors returned by template repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TemplateRepositoryError {
    /// A template with the same internal key already exists.
    #[error("duplicate template: {0}")]
    DuplicateTemplate(TemplateId),

    /// The store rejected an identifier that is already in use.
    ///
    /// Allocation under the counter lock makes this unreachable for allocated
    /// identifiers; seeing it means the allocator contract was broken or a
    /// caller supplied a clashing identifier. It must not be retried with a
    /// guessed number.
    #[error("duplicate task identifier: {0}")]
    DuplicateTaskIdentifier(TaskIdentifier),

    /// The template was not found.
    #[error("template not found: {0}")]
    NotFound(TemplateId),

    /// A template reached the store without a task identifier.
    #[error("template {0} has no task identifier")]
    MissingTaskIdentifier(TemplateId),

    /// The counter for the prefix cannot grow any further.
    #[error("sequence exhausted for prefix {0}")]
    SequenceExhausted(TaskIdPrefix),

    /// The unit of work could not complete: lock timeout, serialization
    /// failure, deadlock, or an unavailable store. Nothing was committed.
    #[error("unit of work aborted: {0}")]
    Concurrency(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TemplateRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Wraps an error that aborted the unit of work.
    pub fn concurrency(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Concurrency(Arc::new(err))
    }
}
