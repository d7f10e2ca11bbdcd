//! Adapter implementations of the template ports.
//!
//! - [`memory`]: process-local storage for tests
//! - [`postgres`]: Diesel-backed `PostgreSQL` storage with row-level counter
//!   locks

pub mod memory;
pub mod postgres;
