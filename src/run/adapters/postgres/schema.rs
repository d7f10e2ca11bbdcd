//! Diesel schema for task run persistence.

diesel::table! {
    /// Task run records.
    task_runs (id) {
        /// Run identifier.
        id -> Uuid,
        /// Owning template key.
        template_id -> Uuid,
        /// Start date.
        start_date -> Nullable<Date>,
        /// Due date.
        due_date -> Nullable<Date>,
        /// Completion date.
        done_date -> Nullable<Date>,
        /// Free-form notes.
        notes -> Text,
        /// Person who completed the run.
        #[max_length = 150]
        done_by -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
