//! Task runs: concrete occurrences of templates with due and done dates.
//!
//! A run's status is never stored. It is derived from its dates and the
//! current local date every time a run is read.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
