//! `PostgreSQL` repository implementation for task runs.

use super::{
    models::{CompletionChangeset, NewRunRow, RunChangeset, RunRow},
    schema::task_runs,
};
use crate::postgres::{PgPool, get_conn_with, run_blocking_with};
use crate::run::{
    domain::{PersistedRunData, RunFilter, RunId, TaskRun},
    ports::{RunRepositoryError, RunRepositoryResult, TaskRunRepository},
};
use crate::template::domain::TemplateId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed run repository.
#[derive(Debug, Clone)]
pub struct PostgresRunRepository {
    pool: PgPool,
}

impl PostgresRunRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn run_blocking<F, T>(&self, f: F) -> RunRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> RunRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, RunRepositoryError::persistence)?;
                f(&mut connection)
            },
            RunRepositoryError::persistence,
        )
        .await
    }
}

#[async_trait]
impl TaskRunRepository for PostgresRunRepository {
    async fn store(&self, run: &TaskRun) -> RunRepositoryResult<()> {
        let new_row = to_new_row(run);
        let run_id = run.id();
        let template_id = run.template_id();
        self.run_blocking(move |connection| {
            diesel::insert_into(task_runs::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| map_insert_error(err, run_id, template_id))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, run: &TaskRun) -> RunRepositoryResult<()> {
        let changeset = RunChangeset {
            start_date: run.start_date(),
            due_date: run.due_date(),
            notes: run.notes().to_owned(),
        };
        let run_id = run.id();
        self.run_blocking(move |connection| {
            let updated = diesel::update(task_runs::table.find(run_id.into_inner()))
                .set(&changeset)
                .execute(connection)
                .map_err(RunRepositoryError::persistence)?;
            if updated == 0 {
                return Err(RunRepositoryError::NotFound(run_id));
            }
            Ok(())
        })
        .await
    }

    async fn record_completion(&self, run: &TaskRun) -> RunRepositoryResult<()> {
        let changeset = CompletionChangeset {
            done_date: run.done_date(),
            done_by: run.done_by().map(str::to_owned),
        };
        let run_id = run.id();
        self.run_blocking(move |connection| {
            let key = run_id.into_inner();
            let updated = diesel::update(
                task_runs::table
                    .find(key)
                    .filter(task_runs::done_date.is_null()),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(RunRepositoryError::persistence)?;
            if updated > 0 {
                return Ok(());
            }

            let exists: bool = diesel::select(diesel::dsl::exists(task_runs::table.find(key)))
                .get_result(connection)
                .map_err(RunRepositoryError::persistence)?;
            if exists {
                Err(RunRepositoryError::AlreadyCompleted(run_id))
            } else {
                Err(RunRepositoryError::NotFound(run_id))
            }
        })
        .await
    }

    async fn find_by_id(&self, id: RunId) -> RunRepositoryResult<Option<TaskRun>> {
        self.run_blocking(move |connection| {
            let row = task_runs::table
                .find(id.into_inner())
                .select(RunRow::as_select())
                .first::<RunRow>(connection)
                .optional()
                .map_err(RunRepositoryError::persistence)?;
            Ok(row.map(row_to_run))
        })
        .await
    }

    async fn find_by_template(&self, template_id: TemplateId) -> RunRepositoryResult<Vec<TaskRun>> {
        self.run_blocking(move |connection| {
            // Ascending order in PostgreSQL places NULL due dates last.
            let rows = task_runs::table
                .filter(task_runs::template_id.eq(template_id.into_inner()))
                .order((task_runs::due_date.asc(), task_runs::created_at.asc()))
                .select(RunRow::as_select())
                .load::<RunRow>(connection)
                .map_err(RunRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_run).collect())
        })
        .await
    }

    async fn search(&self, filter: &RunFilter) -> RunRepositoryResult<Vec<TaskRun>> {
        let criteria = filter.clone();
        self.run_blocking(move |connection| {
            let mut query = task_runs::table.select(RunRow::as_select()).into_boxed();
            let (due_from, due_until) = criteria.due_range();
            let (done_from, done_until) = criteria.done_range();
            if let Some(date) = due_from {
                query = query.filter(task_runs::due_date.ge(date));
            }
            if let Some(date) = due_until {
                query = query.filter(task_runs::due_date.le(date));
            }
            if let Some(date) = done_from {
                query = query.filter(task_runs::done_date.ge(date));
            }
            if let Some(date) = done_until {
                query = query.filter(task_runs::done_date.le(date));
            }
            if let Some(template_ids) = criteria.template_ids() {
                let keys: Vec<uuid::Uuid> = template_ids
                    .iter()
                    .copied()
                    .map(TemplateId::into_inner)
                    .collect();
                query = query.filter(task_runs::template_id.eq_any(keys));
            }

            let rows = query
                .order((task_runs::due_date.asc(), task_runs::created_at.asc()))
                .load::<RunRow>(connection)
                .map_err(RunRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_run).collect())
        })
        .await
    }
}

fn map_insert_error(err: DieselError, run_id: RunId, template_id: TemplateId) -> RunRepositoryError {
    match &err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            RunRepositoryError::DuplicateRun(run_id)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            RunRepositoryError::TemplateNotFound(template_id)
        }
        _ => RunRepositoryError::persistence(err),
    }
}

fn to_new_row(run: &TaskRun) -> NewRunRow {
    NewRunRow {
        id: run.id().into_inner(),
        template_id: run.template_id().into_inner(),
        start_date: run.start_date(),
        due_date: run.due_date(),
        done_date: run.done_date(),
        notes: run.notes().to_owned(),
        done_by: run.done_by().map(str::to_owned),
        created_at: run.created_at(),
    }
}

fn row_to_run(row: RunRow) -> TaskRun {
    TaskRun::from_persisted(PersistedRunData {
        id: RunId::from_uuid(row.id),
        template_id: TemplateId::from_uuid(row.template_id),
        start_date: row.start_date,
        due_date: row.due_date,
        done_date: row.done_date,
        notes: row.notes,
        done_by: row.done_by,
        created_at: row.created_at,
    })
}
