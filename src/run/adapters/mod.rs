//! Adapter implementations for task run persistence.

pub mod memory;
pub mod postgres;
