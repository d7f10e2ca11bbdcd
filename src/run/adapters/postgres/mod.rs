//! `PostgreSQL` adapters for task run persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresRunRepository;
