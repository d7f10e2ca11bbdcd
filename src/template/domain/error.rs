//! Error types for task template validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain template values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateDomainError {
    /// A required text field is empty after trimming.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A text field exceeds its storage limit.
    #[error("{field} exceeds {max} characters")]
    FieldTooLong {
        /// Name of the offending field.
        field: &'static str,
        /// Maximum number of characters accepted.
        max: usize,
    },

    /// The priority code is outside the supported range.
    #[error("invalid priority code {0}, expected 0 to 3")]
    InvalidPriority(u8),

    /// The allocation prefix is malformed.
    #[error("invalid task identifier prefix '{0}'")]
    InvalidPrefix(String),

    /// The task identifier is malformed.
    #[error("invalid task identifier '{0}'")]
    InvalidTaskIdentifier(String),
}
