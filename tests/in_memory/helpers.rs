//! Shared test helpers for in-memory integration tests.

use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;
use taskledger::run::{adapters::memory::InMemoryRunRepository, services::RunTrackingService};
use taskledger::template::{
    adapters::memory::InMemoryTemplateRepository,
    services::{RegisterTemplateRequest, TaskTemplateService},
};

/// Template registry backed by the in-memory repository.
pub type Registry = TaskTemplateService<InMemoryTemplateRepository, DefaultClock>;

/// Run tracking backed by in-memory repositories.
pub type Tracking =
    RunTrackingService<InMemoryRunRepository, InMemoryTemplateRepository, DefaultClock>;

/// Registry and run tracking sharing one template store.
pub struct Services {
    /// Template registry.
    pub registry: Registry,
    /// Run tracking.
    pub tracking: Tracking,
}

/// Provides fresh services for each test.
#[fixture]
pub fn services() -> Services {
    let templates = Arc::new(InMemoryTemplateRepository::new());
    let clock = Arc::new(DefaultClock);
    Services {
        registry: TaskTemplateService::new(Arc::clone(&templates), Arc::clone(&clock)),
        tracking: RunTrackingService::new(Arc::new(InMemoryRunRepository::new()), templates, clock),
    }
}

/// Builds a registration request for the payables sector.
#[must_use]
pub fn payables(activity: &str) -> RegisterTemplateRequest {
    RegisterTemplateRequest::new("Contas a Pagar", activity, 1, "Monthly")
}
