//! Domain model for task templates and their identifiers.
//!
//! Abbreviation, prefix derivation, and identifier composition are pure
//! functions here; allocation of sequence numbers belongs to the repository
//! port so it can share a unit of work with the template write.

mod abbreviation;
mod details;
mod error;
mod filter;
mod identifier;
mod ids;
mod template;

pub use abbreviation::{FALLBACK_ABBREVIATION, abbreviate};
pub use details::{
    Activity, ClassificationName, DEFAULT_PLANNER, FrequencyName, Planner, Priority, SectorName,
    TemplateDetails,
};
pub use error::TemplateDomainError;
pub use filter::{TemplateFilter, TextScope};
pub use identifier::{
    PLANNER_ABBREVIATION_LEN, SECTOR_ABBREVIATION_LEN, SEQUENCE_WIDTH, SequenceNumber,
    TaskIdPrefix, TaskIdentifier,
};
pub use ids::TemplateId;
pub use template::{PersistedTemplateData, TaskTemplate};
