//! Diesel row models for template persistence.

use super::schema::{task_id_counters, task_templates};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for template records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_templates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TemplateRow {
    /// Internal template key.
    pub id: uuid::Uuid,
    /// Unique human-readable identifier.
    pub task_id: String,
    /// Planner label.
    pub planner: String,
    /// Owning sector name.
    pub sector: String,
    /// Optional type label.
    pub kind: Option<String>,
    /// Work description.
    pub activity: String,
    /// Free-form notes.
    pub notes: String,
    /// Priority code.
    pub priority: i16,
    /// Recurrence label.
    pub frequency: String,
    /// Optional grouping label.
    pub classification: Option<String>,
    /// Working-day scheduling flag.
    pub business_day: bool,
    /// Active flag.
    pub active: bool,
    /// Optional person in charge.
    pub responsible: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for template records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_templates)]
pub struct NewTemplateRow {
    /// Internal template key.
    pub id: uuid::Uuid,
    /// Unique human-readable identifier.
    pub task_id: String,
    /// Planner label.
    pub planner: String,
    /// Owning sector name.
    pub sector: String,
    /// Optional type label.
    pub kind: Option<String>,
    /// Work description.
    pub activity: String,
    /// Free-form notes.
    pub notes: String,
    /// Priority code.
    pub priority: i16,
    /// Recurrence label.
    pub frequency: String,
    /// Optional grouping label.
    pub classification: Option<String>,
    /// Working-day scheduling flag.
    pub business_day: bool,
    /// Active flag.
    pub active: bool,
    /// Optional person in charge.
    pub responsible: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Changeset covering the editable template columns. The identifier and
/// creation timestamp are absent, so updates cannot touch them.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = task_templates)]
#[diesel(treat_none_as_null = true)]
pub struct TemplateChangeset {
    /// Planner label.
    pub planner: String,
    /// Owning sector name.
    pub sector: String,
    /// Optional type label.
    pub kind: Option<String>,
    /// Work description.
    pub activity: String,
    /// Free-form notes.
    pub notes: String,
    /// Priority code.
    pub priority: i16,
    /// Recurrence label.
    pub frequency: String,
    /// Optional grouping label.
    pub classification: Option<String>,
    /// Working-day scheduling flag.
    pub business_day: bool,
    /// Active flag.
    pub active: bool,
    /// Optional person in charge.
    pub responsible: Option<String>,
}

/// Insert model used to create a counter row on first allocation.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_id_counters)]
pub struct NewCounterRow<'a> {
    /// Allocation prefix.
    pub prefix: &'a str,
    /// Starting value.
    pub last_number: i64,
}
