//! `PostgreSQL` adapters for template persistence and sequence allocation.

mod models;
mod repository;
mod schema;

pub use crate::postgres::PgPool;
pub use repository::{DEFAULT_LOCK_TIMEOUT, PostgresTemplateRepository};
