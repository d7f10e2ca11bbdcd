//! Diesel row models for task run persistence.

use super::schema::task_runs;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for run records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_runs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RunRow {
    /// Run identifier.
    pub id: uuid::Uuid,
    /// Owning template key.
    pub template_id: uuid::Uuid,
    /// Start date.
    pub start_date: Option<NaiveDate>,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Completion date.
    pub done_date: Option<NaiveDate>,
    /// Free-form notes.
    pub notes: String,
    /// Person who completed the run.
    pub done_by: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for run records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_runs)]
pub struct NewRunRow {
    /// Run identifier.
    pub id: uuid::Uuid,
    /// Owning template key.
    pub template_id: uuid::Uuid,
    /// Start date.
    pub start_date: Option<NaiveDate>,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Completion date.
    pub done_date: Option<NaiveDate>,
    /// Free-form notes.
    pub notes: String,
    /// Person who completed the run.
    pub done_by: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Changeset for the scheduling columns. Cleared dates are written as
/// `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = task_runs)]
#[diesel(treat_none_as_null = true)]
pub struct RunChangeset {
    /// Start date.
    pub start_date: Option<NaiveDate>,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Free-form notes.
    pub notes: String,
}

/// Changeset for the completion columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = task_runs)]
#[diesel(treat_none_as_null = true)]
pub struct CompletionChangeset {
    /// Completion date.
    pub done_date: Option<NaiveDate>,
    /// Person who completed the run.
    pub done_by: Option<String>,
}
