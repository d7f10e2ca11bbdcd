//! Shared world state for run tracking BDD scenarios.

use std::sync::Arc;

use chrono::NaiveDate;
use mockable::DefaultClock;
use rstest::fixture;
use taskledger::run::{
    adapters::memory::InMemoryRunRepository,
    services::{RunTrackingError, RunTrackingService, TrackedRun},
};
use taskledger::template::{
    adapters::memory::InMemoryTemplateRepository, domain::TemplateId,
    services::TaskTemplateService,
};

/// Registry type used by the BDD world.
pub type TestRegistry = TaskTemplateService<InMemoryTemplateRepository, DefaultClock>;

/// Tracking service type used by the BDD world.
pub type TestTracking =
    RunTrackingService<InMemoryRunRepository, InMemoryTemplateRepository, DefaultClock>;

/// Scenario world for run tracking behaviour tests.
pub struct RunWorld {
    pub registry: TestRegistry,
    pub tracking: TestTracking,
    pub template_id: Option<TemplateId>,
    pub current_run: Option<TrackedRun>,
    pub last_result: Option<Result<TrackedRun, RunTrackingError>>,
}

impl RunWorld {
    /// Creates a world with both services sharing one template store.
    #[must_use]
    pub fn new() -> Self {
        let templates = Arc::new(InMemoryTemplateRepository::new());
        let clock = Arc::new(DefaultClock);
        Self {
            registry: TaskTemplateService::new(Arc::clone(&templates), Arc::clone(&clock)),
            tracking: RunTrackingService::new(
                Arc::new(InMemoryRunRepository::new()),
                templates,
                clock,
            ),
            template_id: None,
            current_run: None,
            last_result: None,
        }
    }
}

impl Default for RunWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> RunWorld {
    RunWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Parses an ISO date from a step argument.
pub fn parse_date(raw: &str) -> Result<NaiveDate, eyre::Report> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|err| eyre::eyre!("bad date {raw}: {err}"))
}
