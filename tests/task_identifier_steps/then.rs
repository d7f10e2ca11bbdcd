//! Then steps for task identifier BDD scenarios.

use super::world::{IdentifierWorld, run_async};
use rstest_bdd_macros::then;
use taskledger::template::domain::TaskIdPrefix;

#[then(r#"the template identifier is "{expected}""#)]
fn identifier_is(world: &IdentifierWorld, expected: String) -> Result<(), eyre::Report> {
    let result = world
        .last_save_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing save result in scenario world"))?;
    let template = result
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected save failure: {err}"))?;
    let actual = template
        .task_id()
        .ok_or_else(|| eyre::eyre!("saved template has no identifier"))?;

    if actual.as_str() != expected {
        return Err(eyre::eyre!("expected identifier {expected}, found {actual}"));
    }
    Ok(())
}

#[then("the save is rejected as an integrity violation")]
fn save_rejected(world: &IdentifierWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_save_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing save result in scenario world"))?;
    match result {
        Err(err) if err.is_integrity_violation() => Ok(()),
        Err(err) => Err(eyre::eyre!("expected integrity violation, found {err}")),
        Ok(template) => Err(eyre::eyre!("expected rejection, saved {template}")),
    }
}

#[then(r#"no number has been drawn for prefix "{prefix}""#)]
fn no_number_drawn(world: &IdentifierWorld, prefix: String) -> Result<(), eyre::Report> {
    let key = TaskIdPrefix::new(prefix)?;
    let counter = run_async(world.service.counter(&key))
        .map_err(|err| eyre::eyre!("counter lookup failed: {err}"))?;

    if let Some(last_number) = counter {
        return Err(eyre::eyre!("expected untouched counter, found {last_number}"));
    }
    Ok(())
}

#[then(r#"the counter for prefix "{prefix}" is {expected:u64}"#)]
fn counter_is(world: &IdentifierWorld, prefix: String, expected: u64) -> Result<(), eyre::Report> {
    let key = TaskIdPrefix::new(prefix)?;
    let counter = run_async(world.service.counter(&key))
        .map_err(|err| eyre::eyre!("counter lookup failed: {err}"))?;

    if counter != Some(expected) {
        return Err(eyre::eyre!("expected counter {expected}, found {counter:?}"));
    }
    Ok(())
}
