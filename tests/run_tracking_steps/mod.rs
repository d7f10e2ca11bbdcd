//! Step definitions for run tracking scenarios.

mod given;
mod then;
mod when;
pub mod world;
