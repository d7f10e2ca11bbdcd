//! Port contracts for task template persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by template services.

pub mod repository;

pub use repository::{
    TaskTemplateRepository, TemplateRepositoryError, TemplateRepositoryResult,
    TemplateTransaction, TransactionWork,
};
