//! When steps for run tracking BDD scenarios.

use super::world::{RunWorld, parse_date, run_async};
use eyre::eyre;
use rstest_bdd_macros::when;
use taskledger::run::services::ScheduleRunRequest;

#[when(r#"a run is scheduled starting "{start}" without a due date"#)]
fn schedule_without_due(world: &mut RunWorld, start: String) -> Result<(), eyre::Report> {
    let template_id = world
        .template_id
        .ok_or_else(|| eyre!("missing template in scenario world"))?;
    let request = ScheduleRunRequest::new(template_id).with_start_date(parse_date(&start)?);
    world.last_result = Some(run_async(world.tracking.schedule(request)));
    Ok(())
}

#[when(r#"the run is completed on "{done}" by "{person}""#)]
fn complete_run(world: &mut RunWorld, done: String, person: String) -> Result<(), eyre::Report> {
    let run_id = world
        .current_run
        .as_ref()
        .map(|tracked| tracked.run.id())
        .ok_or_else(|| eyre!("missing run in scenario world"))?;
    let done_date = parse_date(&done)?;
    world.last_result = Some(run_async(world.tracking.complete(
        run_id,
        done_date,
        Some(person.as_str()),
    )));
    Ok(())
}
