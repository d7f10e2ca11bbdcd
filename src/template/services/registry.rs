//! Template registry: saving, lookup, search, and counter inspection.

use super::assign_task_identifier;
use crate::template::{
    domain::{
        Activity, ClassificationName, FrequencyName, Planner, Priority, SectorName,
        SequenceNumber, TaskIdPrefix, TaskIdentifier, TaskTemplate, TemplateDetails,
        TemplateDomainError, TemplateFilter, TemplateId,
    },
    ports::{TaskTemplateRepository, TemplateRepositoryError, TemplateTransaction},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Request payload for registering a new template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterTemplateRequest {
    sector: String,
    activity: String,
    priority: u8,
    frequency: String,
    planner: Option<String>,
    kind: Option<String>,
    notes: Option<String>,
    classification: Option<String>,
    business_day: bool,
    active: bool,
    responsible: Option<String>,
    task_id: Option<String>,
}

impl RegisterTemplateRequest {
    /// Creates a request with the required template fields.
    #[must_use]
    pub fn new(
        sector: impl Into<String>,
        activity: impl Into<String>,
        priority: u8,
        frequency: impl Into<String>,
    ) -> Self {
        Self {
            sector: sector.into(),
            activity: activity.into(),
            priority,
            frequency: frequency.into(),
            planner: None,
            kind: None,
            notes: None,
            classification: None,
            business_day: true,
            active: true,
            responsible: None,
            task_id: None,
        }
    }

    /// Sets the planner label. The default planner is used otherwise.
    #[must_use]
    pub fn with_planner(mut self, planner: impl Into<String>) -> Self {
        self.planner = Some(planner.into());
        self
    }

    /// Sets the type label.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Sets free-form notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Sets the classification label.
    #[must_use]
    pub fn with_classification(mut self, classification: impl Into<String>) -> Self {
        self.classification = Some(classification.into());
        self
    }

    /// Sets whether occurrences fall on working days only.
    #[must_use]
    pub const fn with_business_day(mut self, business_day: bool) -> Self {
        self.business_day = business_day;
        self
    }

    /// Sets the active flag.
    #[must_use]
    pub const fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Sets the responsible person.
    #[must_use]
    pub fn with_responsible(mut self, responsible: impl Into<String>) -> Self {
        self.responsible = Some(responsible.into());
        self
    }

    /// Supplies an existing identifier, skipping allocation.
    #[must_use]
    pub fn with_task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    fn into_details(self) -> Result<(TemplateDetails, Option<TaskIdentifier>), TemplateDomainError> {
        let mut details = TemplateDetails::new(
            SectorName::new(self.sector)?,
            Activity::new(self.activity)?,
            Priority::from_code(self.priority)?,
            FrequencyName::new(self.frequency)?,
        );
        if let Some(planner) = self.planner {
            details.planner = Planner::new(planner)?;
        }
        details.kind = TemplateDetails::kind_from(self.kind.as_deref())?;
        details.notes = self.notes.unwrap_or_default();
        details.classification = self
            .classification
            .filter(|value| !value.trim().is_empty())
            .map(ClassificationName::new)
            .transpose()?;
        details.business_day = self.business_day;
        details.active = self.active;
        details.responsible = TemplateDetails::responsible_from(self.responsible.as_deref())?;

        let task_id = self.task_id.map(TaskIdentifier::parse).transpose()?;
        Ok((details, task_id))
    }
}

/// Service-level errors for template registry operations.
#[derive(Debug, Error)]
pub enum TemplateRegistryError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TemplateDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TemplateRepositoryError),
}

impl TemplateRegistryError {
    /// Returns `true` when the store rejected a duplicate task identifier.
    ///
    /// Such a failure means the allocator contract was broken or a caller
    /// supplied a clashing identifier; retrying cannot fix it.
    #[must_use]
    pub const fn is_integrity_violation(&self) -> bool {
        matches!(
            self,
            Self::Repository(TemplateRepositoryError::DuplicateTaskIdentifier(_))
        )
    }

    /// Returns `true` when the unit of work was aborted by lock contention or
    /// an unavailable store. Nothing was committed, so the whole save may be
    /// retried.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Repository(TemplateRepositoryError::Concurrency(_)))
    }
}

/// Result type for template registry operations.
pub type TemplateRegistryResult<T> = Result<T, TemplateRegistryError>;

/// Template registry orchestration service.
#[derive(Clone)]
pub struct TaskTemplateService<R, C>
where
    R: TaskTemplateRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskTemplateService<R, C>
where
    R: TaskTemplateRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new template registry service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Validates `request`, builds a new template, and saves it.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateRegistryError::Domain`] when validation fails and
    /// the errors of [`Self::save`] otherwise.
    pub async fn register(
        &self,
        request: RegisterTemplateRequest,
    ) -> TemplateRegistryResult<TaskTemplate> {
        let (details, task_id) = request.into_details()?;
        let mut template = TaskTemplate::new(details, &*self.clock);
        if let Some(supplied) = task_id {
            template = template.with_task_id(supplied);
        }
        self.save(template).await
    }

    /// Saves `template` in one unit of work.
    ///
    /// A template that is not yet stored gets an identifier allocated for it
    /// (unless it carries one) and is inserted. A stored template keeps the
    /// identifier on record and has its descriptive fields updated. Any
    /// failure rolls back the whole unit of work, counter increment included.
    ///
    /// Returns the template as stored.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateRegistryError::Repository`] when allocation or the
    /// write fails. See [`TemplateRegistryError::is_retryable`] and
    /// [`TemplateRegistryError::is_integrity_violation`].
    pub async fn save(&self, template: TaskTemplate) -> TemplateRegistryResult<TaskTemplate> {
        let template_id = template.id();
        let outcome = self
            .repository
            .transaction(Box::new(move |transaction: &mut dyn TemplateTransaction| {
                save_in(transaction, template)
            }))
            .await;

        outcome.map_err(|err| {
            match &err {
                TemplateRepositoryError::DuplicateTaskIdentifier(task_id) => {
                    warn!(%template_id, %task_id, "store rejected duplicate task identifier");
                }
                TemplateRepositoryError::Concurrency(cause) => {
                    warn!(%template_id, error = %cause, "template save aborted");
                }
                _ => {}
            }
            err.into()
        })
    }

    /// Allocates the next sequence number for `prefix` in its own unit of
    /// work.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateRegistryError::Repository`] when allocation fails.
    pub async fn allocate(&self, prefix: &TaskIdPrefix) -> TemplateRegistryResult<SequenceNumber> {
        let key = prefix.clone();
        let number = self
            .repository
            .transaction(Box::new(move |transaction: &mut dyn TemplateTransaction| {
                transaction.allocate_sequence(&key)
            }))
            .await?;
        Ok(number)
    }

    /// Retrieves a template by internal key.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateRegistryError::Repository`] when the lookup fails.
    pub async fn find_by_id(&self, id: TemplateId) -> TemplateRegistryResult<Option<TaskTemplate>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Retrieves a template by task identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateRegistryError::Repository`] when the lookup fails.
    pub async fn find_by_task_id(
        &self,
        task_id: &TaskIdentifier,
    ) -> TemplateRegistryResult<Option<TaskTemplate>> {
        Ok(self.repository.find_by_task_id(task_id).await?)
    }

    /// Lists templates matching `filter`, ordered by task identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateRegistryError::Repository`] when the query fails.
    pub async fn search(&self, filter: &TemplateFilter) -> TemplateRegistryResult<Vec<TaskTemplate>> {
        Ok(self.repository.search(filter).await?)
    }

    /// Returns the last number allocated for `prefix`, or `None` when the
    /// prefix has never been used.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateRegistryError::Repository`] when the lookup fails.
    pub async fn counter(&self, prefix: &TaskIdPrefix) -> TemplateRegistryResult<Option<u64>> {
        Ok(self.repository.last_allocated(prefix).await?)
    }
}

fn save_in(
    transaction: &mut dyn TemplateTransaction,
    mut template: TaskTemplate,
) -> Result<TaskTemplate, TemplateRepositoryError> {
    let Some(stored) = transaction.find_template(template.id())? else {
        assign_task_identifier(transaction, &mut template)?;
        transaction.insert_template(&template)?;
        return Ok(template);
    };

    template.keep_recorded_task_id(stored.task_id().cloned());
    transaction.update_template(&template)?;
    transaction
        .find_template(template.id())?
        .ok_or(TemplateRepositoryError::NotFound(template.id()))
}
