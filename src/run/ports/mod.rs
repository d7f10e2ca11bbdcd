//! Port contracts for task run persistence.

pub mod repository;

pub use repository::{RunRepositoryError, RunRepositoryResult, TaskRunRepository};

#[cfg(test)]
pub use repository::MockTaskRunRepository;
