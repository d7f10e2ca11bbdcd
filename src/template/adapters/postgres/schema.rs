//! Diesel schema for task template persistence.

diesel::table! {
    /// One allocation counter per identifier prefix.
    task_id_counters (prefix) {
        /// Allocation prefix such as `CL-CAP`.
        #[max_length = 30]
        prefix -> Varchar,
        /// Last number handed out for the prefix.
        last_number -> Int8,
    }
}

diesel::table! {
    /// Task template records.
    task_templates (id) {
        /// Internal template key.
        id -> Uuid,
        /// Unique human-readable identifier.
        #[max_length = 40]
        task_id -> Varchar,
        /// Planner label.
        #[max_length = 120]
        planner -> Varchar,
        /// Owning sector name.
        #[max_length = 120]
        sector -> Varchar,
        /// Optional type label.
        #[max_length = 60]
        kind -> Nullable<Varchar>,
        /// Work description.
        #[max_length = 255]
        activity -> Varchar,
        /// Free-form notes.
        notes -> Text,
        /// Priority code from 0 to 3.
        priority -> Int2,
        /// Recurrence label.
        #[max_length = 40]
        frequency -> Varchar,
        /// Optional grouping label.
        #[max_length = 60]
        classification -> Nullable<Varchar>,
        /// Working-day scheduling flag.
        business_day -> Bool,
        /// Active flag.
        active -> Bool,
        /// Optional person in charge.
        #[max_length = 150]
        responsible -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
