//! In-memory adapters for task template persistence.

mod repository;

pub use repository::InMemoryTemplateRepository;
