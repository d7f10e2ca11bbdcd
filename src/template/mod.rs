//! Task templates and their human-readable identifiers.
//!
//! A template describes a recurring piece of work owned by a sector. On its
//! first save it receives a unique identifier such as `CL-CAP-000123`, built
//! from planner and sector abbreviations plus a number allocated per prefix.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
