//! Unit tests for the run module.
