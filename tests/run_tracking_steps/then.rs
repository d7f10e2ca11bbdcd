//! Then steps for run tracking BDD scenarios.

use super::world::RunWorld;
use eyre::eyre;
use rstest_bdd_macros::then;
use taskledger::run::{domain::RunDomainError, services::RunTrackingError};

#[then(r#"the run status is "{expected}""#)]
fn status_is(world: &RunWorld, expected: String) -> Result<(), eyre::Report> {
    let tracked = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre!("missing result in scenario world"))?
        .as_ref()
        .map_err(|err| eyre!("unexpected failure: {err}"))?;

    if tracked.status.as_str() != expected {
        return Err(eyre!("expected status {expected}, found {}", tracked.status));
    }
    Ok(())
}

#[then(r#"the run was completed by "{person}""#)]
fn completed_by(world: &RunWorld, person: String) -> Result<(), eyre::Report> {
    let tracked = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre!("missing result in scenario world"))?
        .as_ref()
        .map_err(|err| eyre!("unexpected failure: {err}"))?;

    match tracked.run.done_by() {
        Some(actual) if actual == person => Ok(()),
        other => Err(eyre!("expected completion by {person}, found {other:?}")),
    }
}

#[then("the completion is rejected")]
fn completion_rejected(world: &RunWorld) -> Result<(), eyre::Report> {
    match world.last_result.as_ref() {
        Some(Err(RunTrackingError::Domain(RunDomainError::AlreadyCompleted { .. }))) => Ok(()),
        Some(Err(err)) => Err(eyre!("expected already-completed rejection, found {err}")),
        Some(Ok(tracked)) => Err(eyre!("expected rejection, status {}", tracked.status)),
        None => Err(eyre!("missing result in scenario world")),
    }
}
