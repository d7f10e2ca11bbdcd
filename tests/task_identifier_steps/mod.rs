//! Step definitions for task identifier scenarios.

mod given;
mod then;
