//! `PostgreSQL` repository implementation for templates and identifier
//! counters.

use super::{
    models::{NewCounterRow, NewTemplateRow, TemplateChangeset, TemplateRow},
    schema::{task_id_counters, task_templates},
};
use crate::config::{ConfigError, DEFAULT_LOCK_TIMEOUT_MS, DatabaseConfig};
use crate::postgres::{PgPool, get_conn_with, is_lock_contention, like_pattern, run_blocking_with};
use crate::template::{
    domain::{
        Activity, ClassificationName, FrequencyName, PersistedTemplateData, Planner, Priority,
        SectorName, SequenceNumber, TaskIdPrefix, TaskIdentifier, TaskTemplate, TemplateDetails,
        TemplateFilter, TemplateId,
    },
    ports::{
        TaskTemplateRepository, TemplateRepositoryError, TemplateRepositoryResult,
        TemplateTransaction, TransactionWork,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::time::Duration;

/// Lock wait applied to every unit of work unless configured otherwise.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(DEFAULT_LOCK_TIMEOUT_MS);

/// `PostgreSQL`-backed template repository.
///
/// Sequence allocation locks the prefix's counter row with
/// `SELECT ... FOR UPDATE`; the lock is held until the enclosing unit of work
/// commits or rolls back. Each unit of work sets `lock_timeout`, so a caller
/// stuck behind a long-running allocation fails with
/// [`TemplateRepositoryError::Concurrency`] instead of waiting forever.
#[derive(Debug, Clone)]
pub struct PostgresTemplateRepository {
    pool: PgPool,
    lock_timeout: Duration,
}

impl PostgresTemplateRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self {
            pool,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Builds the pool described by `config` and applies its lock wait.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pool`] when the pool cannot be built.
    pub fn from_config(config: &DatabaseConfig) -> Result<Self, ConfigError> {
        let pool = config.build_pool()?;
        Ok(Self::with_config(pool, config))
    }

    /// Wraps an existing pool, taking the lock wait from `config`.
    #[must_use]
    pub const fn with_config(pool: PgPool, config: &DatabaseConfig) -> Self {
        Self::new(pool).with_lock_timeout(config.lock_timeout())
    }

    /// Overrides the lock wait applied to each unit of work.
    #[must_use]
    pub const fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }

    /// Returns the lock wait applied to each unit of work.
    #[must_use]
    pub const fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn run_blocking<F, T>(&self, f: F) -> TemplateRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TemplateRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, TemplateRepositoryError::concurrency)?;
                f(&mut connection)
            },
            TemplateRepositoryError::persistence,
        )
        .await
    }
}

impl From<DieselError> for TemplateRepositoryError {
    fn from(err: DieselError) -> Self {
        if is_lock_contention(&err) {
            Self::concurrency(err)
        } else {
            Self::persistence(err)
        }
    }
}

/// Unit of work bound to one open database transaction.
struct PgTemplateTransaction<'conn> {
    connection: &'conn mut PgConnection,
}

impl TemplateTransaction for PgTemplateTransaction<'_> {
    fn allocate_sequence(
        &mut self,
        prefix: &TaskIdPrefix,
    ) -> TemplateRepositoryResult<SequenceNumber> {
        allocate_sequence(self.connection, prefix)
    }

    fn reserve_sequence(
        &mut self,
        prefix: &TaskIdPrefix,
        number: SequenceNumber,
    ) -> TemplateRepositoryResult<()> {
        reserve_sequence(self.connection, prefix, number)
    }

    fn find_template(&mut self, id: TemplateId) -> TemplateRepositoryResult<Option<TaskTemplate>> {
        find_template(self.connection, id)
    }

    fn insert_template(&mut self, template: &TaskTemplate) -> TemplateRepositoryResult<()> {
        let new_row = to_new_row(template)?;
        diesel::insert_into(task_templates::table)
            .values(&new_row)
            .execute(self.connection)
            .map_err(|err| map_insert_error(err, template))?;
        Ok(())
    }

    fn update_template(&mut self, template: &TaskTemplate) -> TemplateRepositoryResult<()> {
        let changeset = to_changeset(template.details());
        let updated = diesel::update(task_templates::table.find(template.id().into_inner()))
            .set(&changeset)
            .execute(self.connection)?;
        if updated == 0 {
            return Err(TemplateRepositoryError::NotFound(template.id()));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskTemplateRepository for PostgresTemplateRepository {
    async fn transaction<T>(&self, work: TransactionWork<T>) -> TemplateRepositoryResult<T>
    where
        T: Send + 'static,
    {
        let lock_timeout = self.lock_timeout;
        self.run_blocking(move |connection| {
            connection.transaction::<T, TemplateRepositoryError, _>(|tx_connection| {
                set_lock_timeout(tx_connection, lock_timeout)?;
                let mut transaction = PgTemplateTransaction {
                    connection: tx_connection,
                };
                work(&mut transaction)
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TemplateId) -> TemplateRepositoryResult<Option<TaskTemplate>> {
        self.run_blocking(move |connection| find_template(connection, id))
            .await
    }

    async fn find_by_task_id(
        &self,
        task_id: &TaskIdentifier,
    ) -> TemplateRepositoryResult<Option<TaskTemplate>> {
        let lookup = task_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = task_templates::table
                .filter(task_templates::task_id.eq(lookup))
                .select(TemplateRow::as_select())
                .first::<TemplateRow>(connection)
                .optional()?;
            row.map(row_to_template).transpose()
        })
        .await
    }

    async fn search(&self, filter: &TemplateFilter) -> TemplateRepositoryResult<Vec<TaskTemplate>> {
        let criteria = filter.clone();
        self.run_blocking(move |connection| {
            let mut query = task_templates::table
                .select(TemplateRow::as_select())
                .into_boxed();
            if let Some(sector) = criteria.sector() {
                query = query.filter(task_templates::sector.eq(sector.as_str().to_owned()));
            }
            if let Some(priority) = criteria.priority() {
                query = query.filter(task_templates::priority.eq(i16::from(priority.code())));
            }
            if let Some(frequency) = criteria.frequency() {
                query = query.filter(task_templates::frequency.eq(frequency.as_str().to_owned()));
            }
            if let Some(active) = criteria.active() {
                query = query.filter(task_templates::active.eq(active));
            }
            if let Some(business_day) = criteria.business_day() {
                query = query.filter(task_templates::business_day.eq(business_day));
            }
            if let Some(text) = criteria.text() {
                let pattern = like_pattern(text);
                let identifier_or_activity = task_templates::task_id
                    .ilike(pattern.clone())
                    .or(task_templates::activity.ilike(pattern.clone()));
                query = if criteria.text_scope().includes_planner() {
                    query.filter(identifier_or_activity.or(task_templates::planner.ilike(pattern)))
                } else {
                    query.filter(identifier_or_activity)
                };
            }

            let rows = query
                .order(task_templates::task_id.asc())
                .load::<TemplateRow>(connection)?;
            rows.into_iter().map(row_to_template).collect()
        })
        .await
    }

    async fn last_allocated(&self, prefix: &TaskIdPrefix) -> TemplateRepositoryResult<Option<u64>> {
        let lookup = prefix.as_str().to_owned();
        self.run_blocking(move |connection| {
            let last_number = task_id_counters::table
                .filter(task_id_counters::prefix.eq(lookup))
                .select(task_id_counters::last_number)
                .first::<i64>(connection)
                .optional()?;
            last_number
                .map(|value| u64::try_from(value).map_err(TemplateRepositoryError::persistence))
                .transpose()
        })
        .await
    }
}

/// Bounds how long statements in the current transaction wait for row locks.
fn set_lock_timeout(
    connection: &mut PgConnection,
    lock_timeout: Duration,
) -> TemplateRepositoryResult<()> {
    // SET does not accept bind parameters; the value is a plain integer.
    diesel::sql_query(format!(
        "SET LOCAL lock_timeout = '{}ms'",
        lock_timeout.as_millis()
    ))
    .execute(connection)?;
    Ok(())
}

/// Creates the counter row for `prefix` if needed, locks it, and returns
/// its last allocated number.
///
/// `ON CONFLICT DO NOTHING` makes the lazy row creation safe against a
/// concurrent first allocation: the losing insert waits for the winner and
/// then leaves the row alone.
fn lock_counter(connection: &mut PgConnection, prefix: &TaskIdPrefix) -> TemplateRepositoryResult<u64> {
    diesel::insert_into(task_id_counters::table)
        .values(&NewCounterRow {
            prefix: prefix.as_str(),
            last_number: 0,
        })
        .on_conflict(task_id_counters::prefix)
        .do_nothing()
        .execute(connection)?;

    let stored_last: i64 = task_id_counters::table
        .filter(task_id_counters::prefix.eq(prefix.as_str()))
        .select(task_id_counters::last_number)
        .for_update()
        .first(connection)?;
    u64::try_from(stored_last).map_err(TemplateRepositoryError::persistence)
}

fn store_counter(
    connection: &mut PgConnection,
    prefix: &TaskIdPrefix,
    number: SequenceNumber,
) -> TemplateRepositoryResult<()> {
    let value = i64::try_from(number.value()).map_err(TemplateRepositoryError::persistence)?;
    diesel::update(task_id_counters::table.filter(task_id_counters::prefix.eq(prefix.as_str())))
        .set(task_id_counters::last_number.eq(value))
        .execute(connection)?;
    Ok(())
}

/// Increments the counter for `prefix` under an exclusive row lock.
fn allocate_sequence(
    connection: &mut PgConnection,
    prefix: &TaskIdPrefix,
) -> TemplateRepositoryResult<SequenceNumber> {
    let last_number = lock_counter(connection, prefix)?;
    let next = SequenceNumber::after(last_number)
        .ok_or_else(|| TemplateRepositoryError::SequenceExhausted(prefix.clone()))?;
    store_counter(connection, prefix, next)?;
    Ok(next)
}

/// Raises the counter for `prefix` to `number` under the same row lock.
fn reserve_sequence(
    connection: &mut PgConnection,
    prefix: &TaskIdPrefix,
    number: SequenceNumber,
) -> TemplateRepositoryResult<()> {
    let last_number = lock_counter(connection, prefix)?;
    if number.value() > last_number {
        store_counter(connection, prefix, number)?;
    }
    Ok(())
}

fn find_template(
    connection: &mut PgConnection,
    id: TemplateId,
) -> TemplateRepositoryResult<Option<TaskTemplate>> {
    let row = task_templates::table
        .find(id.into_inner())
        .select(TemplateRow::as_select())
        .first::<TemplateRow>(connection)
        .optional()?;
    row.map(row_to_template).transpose()
}

fn map_insert_error(err: DieselError, template: &TaskTemplate) -> TemplateRepositoryError {
    let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &err else {
        return err.into();
    };

    match (info.constraint_name(), template.task_id()) {
        (Some("task_templates_pkey"), _) => TemplateRepositoryError::DuplicateTemplate(template.id()),
        (Some("task_templates_task_id_unique"), Some(task_id)) => {
            TemplateRepositoryError::DuplicateTaskIdentifier(task_id.clone())
        }
        _ => err.into(),
    }
}

fn to_new_row(template: &TaskTemplate) -> TemplateRepositoryResult<NewTemplateRow> {
    let task_id = template
        .task_id()
        .ok_or(TemplateRepositoryError::MissingTaskIdentifier(template.id()))?;
    let TemplateChangeset {
        planner,
        sector,
        kind,
        activity,
        notes,
        priority,
        frequency,
        classification,
        business_day,
        active,
        responsible,
    } = to_changeset(template.details());

    Ok(NewTemplateRow {
        id: template.id().into_inner(),
        task_id: task_id.as_str().to_owned(),
        planner,
        sector,
        kind,
        activity,
        notes,
        priority,
        frequency,
        classification,
        business_day,
        active,
        responsible,
        created_at: template.created_at(),
    })
}

fn to_changeset(details: &TemplateDetails) -> TemplateChangeset {
    TemplateChangeset {
        planner: details.planner.as_str().to_owned(),
        sector: details.sector.as_str().to_owned(),
        kind: details.kind.clone(),
        activity: details.activity.as_str().to_owned(),
        notes: details.notes.clone(),
        priority: i16::from(details.priority.code()),
        frequency: details.frequency.as_str().to_owned(),
        classification: details
            .classification
            .as_ref()
            .map(|classification| classification.as_str().to_owned()),
        business_day: details.business_day,
        active: details.active,
        responsible: details.responsible.clone(),
    }
}

fn row_to_template(row: TemplateRow) -> TemplateRepositoryResult<TaskTemplate> {
    let TemplateRow {
        id,
        task_id,
        planner,
        sector,
        kind,
        activity,
        notes,
        priority,
        frequency,
        classification,
        business_day,
        active,
        responsible,
        created_at,
    } = row;

    let priority_code = u8::try_from(priority).map_err(TemplateRepositoryError::persistence)?;
    let details = TemplateDetails {
        planner: Planner::new(planner).map_err(TemplateRepositoryError::persistence)?,
        sector: SectorName::new(sector).map_err(TemplateRepositoryError::persistence)?,
        kind,
        activity: Activity::new(activity).map_err(TemplateRepositoryError::persistence)?,
        notes,
        priority: Priority::from_code(priority_code)
            .map_err(TemplateRepositoryError::persistence)?,
        frequency: FrequencyName::new(frequency).map_err(TemplateRepositoryError::persistence)?,
        classification: classification
            .map(ClassificationName::new)
            .transpose()
            .map_err(TemplateRepositoryError::persistence)?,
        business_day,
        active,
        responsible,
    };

    Ok(TaskTemplate::from_persisted(PersistedTemplateData {
        id: TemplateId::from_uuid(id),
        task_id: Some(TaskIdentifier::parse(task_id).map_err(TemplateRepositoryError::persistence)?),
        details,
        created_at,
    }))
}
