//! Service layer for scheduling, completing, and listing task runs.

mod tracking;

pub use tracking::{
    RunTrackingError, RunTrackingResult, RunTrackingService, ScheduleRunRequest, TrackedRun,
};
