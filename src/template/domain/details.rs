//! Descriptive fields of a task template and their validated value types.

use super::TemplateDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Planner label used when a template does not name one.
pub const DEFAULT_PLANNER: &str = "Check List";

macro_rules! bounded_label {
    ($(#[$meta:meta])* $name:ident, $field:literal, $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Largest number of characters accepted.
            pub const MAX_LEN: usize = $max;

            /// Creates a validated, trimmed label.
            ///
            /// # Errors
            ///
            /// Returns [`TemplateDomainError::EmptyField`] when the value is
            /// blank or [`TemplateDomainError::FieldTooLong`] when it exceeds
            /// [`Self::MAX_LEN`] characters.
            pub fn new(value: impl Into<String>) -> Result<Self, TemplateDomainError> {
                let raw = value.into();
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(TemplateDomainError::EmptyField { field: $field });
                }
                if trimmed.chars().count() > Self::MAX_LEN {
                    return Err(TemplateDomainError::FieldTooLong {
                        field: $field,
                        max: Self::MAX_LEN,
                    });
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Returns the label as `str`.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

bounded_label!(
    /// Name of the organizational sector owning a template.
    SectorName,
    "sector",
    120
);

bounded_label!(
    /// Description of the work a template stands for.
    Activity,
    "activity",
    255
);

bounded_label!(
    /// Recurrence label such as "Daily" or "Monthly".
    FrequencyName,
    "frequency",
    40
);

bounded_label!(
    /// Optional grouping label for templates.
    ClassificationName,
    "classification",
    60
);

/// Free-text planner label. Blank planners are allowed and abbreviate to the
/// fallback code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Planner(String);

impl Planner {
    /// Largest number of characters accepted.
    pub const MAX_LEN: usize = 120;

    /// Creates a planner label.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateDomainError::FieldTooLong`] when the trimmed value
    /// exceeds [`Self::MAX_LEN`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TemplateDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(TemplateDomainError::FieldTooLong {
                field: "planner",
                max: Self::MAX_LEN,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the label as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self(DEFAULT_PLANNER.to_owned())
    }
}

impl fmt::Display for Planner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Urgency of a template, stored as a code from 0 (most urgent) to 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Code 0.
    Critical,
    /// Code 1.
    High,
    /// Code 2.
    Medium,
    /// Code 3.
    Low,
}

impl Priority {
    /// Returns the numeric storage code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    /// Returns the human-readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Parses a storage code.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateDomainError::InvalidPriority`] for codes above 3.
    pub const fn from_code(code: u8) -> Result<Self, TemplateDomainError> {
        match code {
            0 => Ok(Self::Critical),
            1 => Ok(Self::High),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Low),
            other => Err(TemplateDomainError::InvalidPriority(other)),
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = TemplateDomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_code(value)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code(), self.description())
    }
}

/// Editable fields of a task template.
///
/// Everything except the internal key, the task identifier, and the creation
/// timestamp lives here, so revising a template can never touch its
/// identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDetails {
    /// Planner label, first half of the identifier prefix.
    pub planner: Planner,
    /// Owning sector, second half of the identifier prefix.
    pub sector: SectorName,
    /// Optional free-text type label.
    pub kind: Option<String>,
    /// Work description.
    pub activity: Activity,
    /// Free-form notes.
    pub notes: String,
    /// Urgency.
    pub priority: Priority,
    /// Recurrence label.
    pub frequency: FrequencyName,
    /// Optional grouping label.
    pub classification: Option<ClassificationName>,
    /// Whether occurrences fall on working days only.
    pub business_day: bool,
    /// Whether the template is still in use.
    pub active: bool,
    /// Optional person in charge.
    pub responsible: Option<String>,
}

impl TemplateDetails {
    /// Largest number of characters accepted for the type label.
    pub const KIND_MAX_LEN: usize = 60;

    /// Largest number of characters accepted for the responsible person.
    pub const RESPONSIBLE_MAX_LEN: usize = 150;

    /// Creates details with the default planner, working-day scheduling, and
    /// the active flag set.
    #[must_use]
    pub fn new(
        sector: SectorName,
        activity: Activity,
        priority: Priority,
        frequency: FrequencyName,
    ) -> Self {
        Self {
            planner: Planner::default(),
            sector,
            kind: None,
            activity,
            notes: String::new(),
            priority,
            frequency,
            classification: None,
            business_day: true,
            active: true,
            responsible: None,
        }
    }

    /// Normalizes an optional type label.
    ///
    /// Blank values become `None`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateDomainError::FieldTooLong`] when the label exceeds
    /// [`Self::KIND_MAX_LEN`] characters.
    pub fn kind_from(value: Option<&str>) -> Result<Option<String>, TemplateDomainError> {
        optional_text(value, "kind", Self::KIND_MAX_LEN)
    }

    /// Normalizes an optional responsible-person label.
    ///
    /// Blank values become `None`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateDomainError::FieldTooLong`] when the label exceeds
    /// [`Self::RESPONSIBLE_MAX_LEN`] characters.
    pub fn responsible_from(value: Option<&str>) -> Result<Option<String>, TemplateDomainError> {
        optional_text(value, "responsible", Self::RESPONSIBLE_MAX_LEN)
    }
}

fn optional_text(
    value: Option<&str>,
    field: &'static str,
    max: usize,
) -> Result<Option<String>, TemplateDomainError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > max {
        return Err(TemplateDomainError::FieldTooLong { field, max });
    }
    Ok(Some(trimmed.to_owned()))
}
