//! Run tracking orchestration service.

use crate::run::{
    domain::{RunDomainError, RunFilter, RunId, RunStatus, TaskRun},
    ports::{RunRepositoryError, TaskRunRepository},
};
use crate::template::{
    domain::{TaskTemplate, TemplateFilter, TemplateId, TextScope},
    ports::{TaskTemplateRepository, TemplateRepositoryError},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for scheduling a run of an existing template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRunRequest {
    template_id: TemplateId,
    start_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    notes: Option<String>,
}

impl ScheduleRunRequest {
    /// Creates a request for an unscheduled run of `template_id`.
    #[must_use]
    pub const fn new(template_id: TemplateId) -> Self {
        Self {
            template_id,
            start_date: None,
            due_date: None,
            notes: None,
        }
    }

    /// Sets the start date.
    #[must_use]
    pub const fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets free-form notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A run paired with its status on the day it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedRun {
    /// The stored run.
    pub run: TaskRun,
    /// Status derived for the current local date.
    pub status: RunStatus,
}

/// Service-level errors for run tracking operations.
#[derive(Debug, Error)]
pub enum RunTrackingError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] RunDomainError),
    /// Run repository operation failed.
    #[error(transparent)]
    Repository(#[from] RunRepositoryError),
    /// Template lookup failed.
    #[error(transparent)]
    Template(#[from] TemplateRepositoryError),
}

/// Result type for run tracking operations.
pub type RunTrackingResult<T> = Result<T, RunTrackingError>;

/// Run tracking orchestration service.
#[derive(Clone)]
pub struct RunTrackingService<R, T, C>
where
    R: TaskRunRepository,
    T: TaskTemplateRepository,
    C: Clock + Send + Sync,
{
    runs: Arc<R>,
    templates: Arc<T>,
    clock: Arc<C>,
}

impl<R, T, C> RunTrackingService<R, T, C>
where
    R: TaskRunRepository,
    T: TaskTemplateRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new run tracking service.
    #[must_use]
    pub const fn new(runs: Arc<R>, templates: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            runs,
            templates,
            clock,
        }
    }

    /// Schedules a run of an existing template.
    ///
    /// # Errors
    ///
    /// Returns [`RunRepositoryError::TemplateNotFound`] (wrapped in
    /// [`RunTrackingError::Repository`]) when the template does not exist and
    /// [`RunTrackingError::Domain`] when the due date precedes the start date.
    pub async fn schedule(&self, request: ScheduleRunRequest) -> RunTrackingResult<TrackedRun> {
        let ScheduleRunRequest {
            template_id,
            start_date,
            due_date,
            notes,
        } = request;
        if self.templates.find_by_id(template_id).await?.is_none() {
            return Err(RunRepositoryError::TemplateNotFound(template_id).into());
        }

        let mut run = TaskRun::new(template_id, start_date, due_date, &*self.clock)?;
        if let Some(text) = notes {
            run = run.with_notes(text);
        }
        self.runs.store(&run).await?;
        Ok(self.track(run))
    }

    /// Moves the due date of a run. `None` clears it.
    ///
    /// # Errors
    ///
    /// Returns [`RunRepositoryError::NotFound`] for an unknown run and
    /// [`RunTrackingError::Domain`] when the new date precedes the start date.
    pub async fn reschedule(
        &self,
        run_id: RunId,
        due_date: Option<NaiveDate>,
    ) -> RunTrackingResult<TrackedRun> {
        let mut run = self.load(run_id).await?;
        run.reschedule(due_date)?;
        self.runs.update(&run).await?;
        Ok(self.track(run))
    }

    /// Records completion of a run.
    ///
    /// # Errors
    ///
    /// Returns [`RunRepositoryError::NotFound`] for an unknown run and
    /// [`RunTrackingError::Domain`] when the run was already completed or the
    /// date precedes its start. A completion that loses a race with another
    /// one fails with [`RunRepositoryError::AlreadyCompleted`].
    pub async fn complete(
        &self,
        run_id: RunId,
        done_date: NaiveDate,
        done_by: Option<&str>,
    ) -> RunTrackingResult<TrackedRun> {
        let mut run = self.load(run_id).await?;
        run.complete(done_date, done_by)?;
        self.runs.record_completion(&run).await?;

        let tracked = self.track(run);
        info!(%run_id, %done_date, status = %tracked.status, "run completed");
        Ok(tracked)
    }

    /// Retrieves a run with its current status.
    ///
    /// # Errors
    ///
    /// Returns [`RunTrackingError::Repository`] when the lookup fails.
    pub async fn find_by_id(&self, run_id: RunId) -> RunTrackingResult<Option<TrackedRun>> {
        let run = self.runs.find_by_id(run_id).await?;
        Ok(run.map(|found| self.track(found)))
    }

    /// Lists the runs of a template by due date, unscheduled runs last.
    ///
    /// # Errors
    ///
    /// Returns [`RunTrackingError::Repository`] when the query fails.
    pub async fn list_for_template(
        &self,
        template_id: TemplateId,
    ) -> RunTrackingResult<Vec<TrackedRun>> {
        let runs = self.runs.find_by_template(template_id).await?;
        Ok(self.track_all(runs))
    }

    /// Lists runs matching `filter`.
    ///
    /// Free text is matched against the identifier and activity of each
    /// run's template.
    ///
    /// # Errors
    ///
    /// Returns [`RunTrackingError::Template`] when resolving the text
    /// criterion fails and [`RunTrackingError::Repository`] when the run
    /// query fails.
    pub async fn search(&self, filter: &RunFilter) -> RunTrackingResult<Vec<TrackedRun>> {
        let scoped = self.scope_by_text(filter).await?;
        let runs = self.runs.search(&scoped).await?;
        Ok(self.track_all(runs))
    }

    async fn scope_by_text(&self, filter: &RunFilter) -> RunTrackingResult<RunFilter> {
        let Some(text) = filter.text() else {
            return Ok(filter.clone());
        };
        let templates = self
            .templates
            .search(
                &TemplateFilter::new()
                    .with_text(text)
                    .with_text_scope(TextScope::IdentifierAndActivity),
            )
            .await?;
        let matching = templates.iter().map(TaskTemplate::id);
        let allowed: Vec<TemplateId> = match filter.template_ids() {
            Some(existing) => matching.filter(|id| existing.contains(id)).collect(),
            None => matching.collect(),
        };
        Ok(filter.clone().with_templates(allowed))
    }

    async fn load(&self, run_id: RunId) -> RunTrackingResult<TaskRun> {
        self.runs
            .find_by_id(run_id)
            .await?
            .ok_or_else(|| RunRepositoryError::NotFound(run_id).into())
    }

    fn today(&self) -> NaiveDate {
        self.clock.local().date_naive()
    }

    fn track(&self, run: TaskRun) -> TrackedRun {
        let status = run.status_on(self.today());
        TrackedRun { run, status }
    }

    fn track_all(&self, runs: Vec<TaskRun>) -> Vec<TrackedRun> {
        let today = self.today();
        runs.into_iter()
            .map(|run| {
                let status = run.status_on(today);
                TrackedRun { run, status }
            })
            .collect()
    }
}
