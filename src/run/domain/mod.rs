//! Domain model for task runs and their derived status.

mod error;
mod filter;
mod ids;
mod run;
mod status;

pub use error::RunDomainError;
pub use filter::RunFilter;
pub use ids::RunId;
pub use run::{DONE_BY_MAX_LEN, PersistedRunData, TaskRun};
pub use status::RunStatus;
