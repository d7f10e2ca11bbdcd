//! In-memory adapters for task run persistence.

mod repository;

pub use repository::InMemoryRunRepository;
