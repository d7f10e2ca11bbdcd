//! Given steps for run tracking BDD scenarios.

use super::world::{RunWorld, parse_date, run_async};
use eyre::{WrapErr, eyre};
use rstest_bdd_macros::given;
use taskledger::run::services::ScheduleRunRequest;
use taskledger::template::services::RegisterTemplateRequest;

#[given(r#"a registered template for sector "{sector}""#)]
fn registered_template(world: &mut RunWorld, sector: String) -> Result<(), eyre::Report> {
    let request = RegisterTemplateRequest::new(sector, "Reconcile supplier invoices", 1, "Monthly");
    let template = run_async(world.registry.register(request)).wrap_err("register template")?;
    world.template_id = Some(template.id());
    Ok(())
}

#[given(r#"a run scheduled from "{start}" due "{due}""#)]
fn scheduled_run(world: &mut RunWorld, start: String, due: String) -> Result<(), eyre::Report> {
    let template_id = world
        .template_id
        .ok_or_else(|| eyre!("missing template in scenario world"))?;
    let request = ScheduleRunRequest::new(template_id)
        .with_start_date(parse_date(&start)?)
        .with_due_date(parse_date(&due)?);
    let tracked = run_async(world.tracking.schedule(request)).wrap_err("schedule run")?;
    world.current_run = Some(tracked);
    Ok(())
}

#[given(r#"the run was completed on "{done}""#)]
fn run_was_completed(world: &mut RunWorld, done: String) -> Result<(), eyre::Report> {
    let run_id = world
        .current_run
        .as_ref()
        .map(|tracked| tracked.run.id())
        .ok_or_else(|| eyre!("missing run in scenario world"))?;
    let tracked = run_async(world.tracking.complete(run_id, parse_date(&done)?, None))
        .wrap_err("complete run")?;
    world.current_run = Some(tracked);
    Ok(())
}
