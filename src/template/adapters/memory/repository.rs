//! In-memory template repository for tests and local development.

use crate::template::{
    domain::{
        PersistedTemplateData, SequenceNumber, TaskIdPrefix, TaskIdentifier, TaskTemplate,
        TemplateFilter, TemplateId,
    },
    ports::{
        TaskTemplateRepository, TemplateRepositoryError, TemplateRepositoryResult,
        TemplateTransaction, TransactionWork,
    },
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory template repository.
///
/// Units of work run one at a time against a staged copy of the state, which
/// replaces the live state only when the work succeeds. Counters live in this
/// process only, so this adapter does not give uniqueness across processes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateRepository {
    state: Arc<RwLock<InMemoryTemplateState>>,
}

#[derive(Debug, Default, Clone)]
struct InMemoryTemplateState {
    templates: HashMap<TemplateId, TaskTemplate>,
    task_id_index: HashMap<TaskIdentifier, TemplateId>,
    counters: HashMap<TaskIdPrefix, u64>,
}

impl InMemoryTemplateRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: &impl std::fmt::Display) -> TemplateRepositoryError {
    TemplateRepositoryError::concurrency(std::io::Error::other(err.to_string()))
}

impl TemplateTransaction for InMemoryTemplateState {
    fn allocate_sequence(
        &mut self,
        prefix: &TaskIdPrefix,
    ) -> TemplateRepositoryResult<SequenceNumber> {
        let last_number = self.counters.entry(prefix.clone()).or_insert(0);
        let next = SequenceNumber::after(*last_number)
            .ok_or_else(|| TemplateRepositoryError::SequenceExhausted(prefix.clone()))?;
        *last_number = next.value();
        Ok(next)
    }

    fn reserve_sequence(
        &mut self,
        prefix: &TaskIdPrefix,
        number: SequenceNumber,
    ) -> TemplateRepositoryResult<()> {
        let last_number = self.counters.entry(prefix.clone()).or_insert(0);
        *last_number = (*last_number).max(number.value());
        Ok(())
    }

    fn find_template(&mut self, id: TemplateId) -> TemplateRepositoryResult<Option<TaskTemplate>> {
        Ok(self.templates.get(&id).cloned())
    }

    fn insert_template(&mut self, template: &TaskTemplate) -> TemplateRepositoryResult<()> {
        let task_id = template
            .task_id()
            .cloned()
            .ok_or(TemplateRepositoryError::MissingTaskIdentifier(template.id()))?;
        if self.templates.contains_key(&template.id()) {
            return Err(TemplateRepositoryError::DuplicateTemplate(template.id()));
        }
        if self.task_id_index.contains_key(&task_id) {
            return Err(TemplateRepositoryError::DuplicateTaskIdentifier(task_id));
        }

        self.task_id_index.insert(task_id, template.id());
        self.templates.insert(template.id(), template.clone());
        Ok(())
    }

    fn update_template(&mut self, template: &TaskTemplate) -> TemplateRepositoryResult<()> {
        let stored = self
            .templates
            .get_mut(&template.id())
            .ok_or(TemplateRepositoryError::NotFound(template.id()))?;

        *stored = TaskTemplate::from_persisted(PersistedTemplateData {
            id: stored.id(),
            task_id: stored.task_id().cloned(),
            details: template.details().clone(),
            created_at: stored.created_at(),
        });
        Ok(())
    }
}

#[async_trait]
impl TaskTemplateRepository for InMemoryTemplateRepository {
    async fn transaction<T>(&self, work: TransactionWork<T>) -> TemplateRepositoryResult<T>
    where
        T: Send + 'static,
    {
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        let mut staged = state.clone();
        let outcome = work(&mut staged)?;
        *state = staged;
        Ok(outcome)
    }

    async fn find_by_id(&self, id: TemplateId) -> TemplateRepositoryResult<Option<TaskTemplate>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state.templates.get(&id).cloned())
    }

    async fn find_by_task_id(
        &self,
        task_id: &TaskIdentifier,
    ) -> TemplateRepositoryResult<Option<TaskTemplate>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        let template = state
            .task_id_index
            .get(task_id)
            .and_then(|id| state.templates.get(id))
            .cloned();
        Ok(template)
    }

    async fn search(&self, filter: &TemplateFilter) -> TemplateRepositoryResult<Vec<TaskTemplate>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        let mut matches: Vec<TaskTemplate> = state
            .templates
            .values()
            .filter(|template| filter.matches(template))
            .cloned()
            .collect();
        matches.sort_by(|left, right| left.task_id().cmp(&right.task_id()));
        Ok(matches)
    }

    async fn last_allocated(&self, prefix: &TaskIdPrefix) -> TemplateRepositoryResult<Option<u64>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state.counters.get(prefix).copied())
    }
}
