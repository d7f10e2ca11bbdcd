//! Human-readable task identifiers and their allocation keys.

use super::{TemplateDomainError, abbreviate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of initials kept from the planner label.
pub const PLANNER_ABBREVIATION_LEN: usize = 2;

/// Number of initials kept from the sector name.
pub const SECTOR_ABBREVIATION_LEN: usize = 3;

/// Width the sequence number is zero-padded to.
pub const SEQUENCE_WIDTH: usize = 6;

/// Allocation key shared by all templates with the same planner and sector
/// abbreviations, for example `CL-CAP`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskIdPrefix(String);

impl TaskIdPrefix {
    /// Largest prefix length accepted by the counter table.
    pub const MAX_LEN: usize = 30;

    /// Derives the prefix from a planner label and a sector name.
    #[must_use]
    pub fn derive(planner: &str, sector: &str) -> Self {
        Self(format!(
            "{}-{}",
            abbreviate(planner, PLANNER_ABBREVIATION_LEN),
            abbreviate(sector, SECTOR_ABBREVIATION_LEN),
        ))
    }

    /// Creates a prefix from an explicit value.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateDomainError::InvalidPrefix`] when the value is empty,
    /// longer than [`Self::MAX_LEN`] characters, or contains characters other
    /// than alphanumerics and hyphens.
    pub fn new(value: impl Into<String>) -> Result<Self, TemplateDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        let is_valid = !normalized.is_empty()
            && normalized.chars().count() <= Self::MAX_LEN
            && normalized
                .chars()
                .all(|ch| ch.is_alphanumeric() || ch == '-');
        if !is_valid {
            return Err(TemplateDomainError::InvalidPrefix(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the prefix as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskIdPrefix {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskIdPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Positive number handed out by the sequence allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceNumber(u64);

impl SequenceNumber {
    /// Largest number representable in the `PostgreSQL` counter column.
    pub const MAX: u64 = i64::MAX as u64;

    /// The first number allocated for a fresh prefix.
    pub const FIRST: Self = Self(1);

    /// Creates a sequence number, rejecting zero and values above
    /// [`Self::MAX`].
    #[must_use]
    pub const fn new(value: u64) -> Option<Self> {
        if value == 0 || value > Self::MAX {
            return None;
        }
        Some(Self(value))
    }

    /// Returns the number following a counter's last allocated value.
    ///
    /// Returns `None` once the counter is exhausted.
    #[must_use]
    pub const fn after(last_number: u64) -> Option<Self> {
        match last_number.checked_add(1) {
            Some(next) => Self::new(next),
            None => None,
        }
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique human-readable identifier of a task template, such as
/// `CL-CAP-000123`.
///
/// Identifiers are assigned once, on the first save of a template, and never
/// change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskIdentifier(String);

impl TaskIdentifier {
    /// Largest identifier length accepted by the template table.
    pub const MAX_LEN: usize = 40;

    /// Joins a prefix and an allocated number into an identifier.
    ///
    /// Numbers wider than [`SEQUENCE_WIDTH`] digits are kept in full.
    #[must_use]
    pub fn compose(prefix: &TaskIdPrefix, number: SequenceNumber) -> Self {
        Self(format!(
            "{prefix}-{number:0width$}",
            number = number.value(),
            width = SEQUENCE_WIDTH,
        ))
    }

    /// Parses an identifier supplied from outside the allocator, such as a
    /// legacy code imported with its template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateDomainError::InvalidTaskIdentifier`] when the value is
    /// empty, contains whitespace, or exceeds [`Self::MAX_LEN`] characters.
    pub fn parse(value: impl Into<String>) -> Result<Self, TemplateDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        let is_valid = !normalized.is_empty()
            && normalized.chars().count() <= Self::MAX_LEN
            && !normalized.chars().any(char::is_whitespace);
        if !is_valid {
            return Err(TemplateDomainError::InvalidTaskIdentifier(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the prefix part when the identifier follows the
    /// `{prefix}-{number}` layout.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.split().map(|(prefix, _)| prefix)
    }

    /// Returns the numeric suffix when the identifier follows the
    /// `{prefix}-{number}` layout.
    #[must_use]
    pub fn sequence_number(&self) -> Option<SequenceNumber> {
        self.split()
            .and_then(|(_, digits)| digits.parse::<u64>().ok())
            .and_then(SequenceNumber::new)
    }

    fn split(&self) -> Option<(&str, &str)> {
        self.0
            .rsplit_once('-')
            .filter(|(prefix, digits)| {
                !prefix.is_empty() && !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
            })
    }
}

impl AsRef<str> for TaskIdentifier {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
