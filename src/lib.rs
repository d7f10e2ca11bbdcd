//! Taskledger: recurring task templates with collision-free identifiers.
//!
//! Templates describe recurring work per organizational sector. Each one
//! receives a human-readable identifier such as `CL-CAP-000123` on its first
//! save, built from planner and sector abbreviations and a number drawn from a
//! transactional per-prefix counter. Runs record concrete occurrences of a
//! template; their status is derived from due and done dates on every read.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: Orchestration over ports, with an injected clock
//!
//! # Modules
//!
//! - [`template`]: Templates, identifier allocation, and search
//! - [`run`]: Task runs and status derivation
//! - [`config`]: Database settings and pool construction

pub mod config;
pub mod postgres;
pub mod run;
pub mod template;

#[cfg(test)]
mod test_support;
