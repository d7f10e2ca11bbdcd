//! In-memory run repository for tests and local development.

use crate::run::{
    domain::{PersistedRunData, RunFilter, RunId, TaskRun},
    ports::{RunRepositoryError, RunRepositoryResult, TaskRunRepository},
};
use crate::template::domain::TemplateId;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory run repository.
///
/// Template existence is checked by the tracking service; this adapter has
/// no view of templates and accepts any template key.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRunRepository {
    runs: Arc<RwLock<HashMap<RunId, TaskRun>>>,
}

impl InMemoryRunRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_sorted(&self, keep: impl Fn(&TaskRun) -> bool) -> RunRepositoryResult<Vec<TaskRun>> {
        let runs = self.runs.read().map_err(|err| lock_error(&err))?;
        let mut selected: Vec<TaskRun> = runs.values().filter(|run| keep(run)).cloned().collect();
        selected.sort_by(schedule_order);
        Ok(selected)
    }
}

fn lock_error(err: &impl std::fmt::Display) -> RunRepositoryError {
    RunRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Due date ascending with unscheduled runs last, then creation time.
pub(crate) fn schedule_order(left: &TaskRun, right: &TaskRun) -> Ordering {
    let by_due = match (left.due_date(), right.due_date()) {
        (Some(left_due), Some(right_due)) => left_due.cmp(&right_due),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_due.then_with(|| left.created_at().cmp(&right.created_at()))
}

#[async_trait]
impl TaskRunRepository for InMemoryRunRepository {
    async fn store(&self, run: &TaskRun) -> RunRepositoryResult<()> {
        let mut runs = self.runs.write().map_err(|err| lock_error(&err))?;
        if runs.contains_key(&run.id()) {
            return Err(RunRepositoryError::DuplicateRun(run.id()));
        }
        runs.insert(run.id(), run.clone());
        Ok(())
    }

    async fn update(&self, run: &TaskRun) -> RunRepositoryResult<()> {
        let mut runs = self.runs.write().map_err(|err| lock_error(&err))?;
        let stored = runs
            .get_mut(&run.id())
            .ok_or(RunRepositoryError::NotFound(run.id()))?;
        *stored = TaskRun::from_persisted(PersistedRunData {
            id: stored.id(),
            template_id: stored.template_id(),
            start_date: run.start_date(),
            due_date: run.due_date(),
            done_date: stored.done_date(),
            notes: run.notes().to_owned(),
            done_by: stored.done_by().map(str::to_owned),
            created_at: stored.created_at(),
        });
        Ok(())
    }

    async fn record_completion(&self, run: &TaskRun) -> RunRepositoryResult<()> {
        let mut runs = self.runs.write().map_err(|err| lock_error(&err))?;
        let stored = runs
            .get_mut(&run.id())
            .ok_or(RunRepositoryError::NotFound(run.id()))?;
        if stored.done_date().is_some() {
            return Err(RunRepositoryError::AlreadyCompleted(run.id()));
        }
        *stored = TaskRun::from_persisted(PersistedRunData {
            id: stored.id(),
            template_id: stored.template_id(),
            start_date: stored.start_date(),
            due_date: stored.due_date(),
            done_date: run.done_date(),
            notes: stored.notes().to_owned(),
            done_by: run.done_by().map(str::to_owned),
            created_at: stored.created_at(),
        });
        Ok(())
    }

    async fn find_by_id(&self, id: RunId) -> RunRepositoryResult<Option<TaskRun>> {
        let runs = self.runs.read().map_err(|err| lock_error(&err))?;
        Ok(runs.get(&id).cloned())
    }

    async fn find_by_template(&self, template_id: TemplateId) -> RunRepositoryResult<Vec<TaskRun>> {
        self.collect_sorted(|run| run.template_id() == template_id)
    }

    async fn search(&self, filter: &RunFilter) -> RunRepositoryResult<Vec<TaskRun>> {
        self.collect_sorted(|run| filter.matches(run))
    }
}
