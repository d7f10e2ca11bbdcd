//! Given steps for task identifier BDD scenarios.

use super::world::{IdentifierWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskledger::template::services::RegisterTemplateRequest;

#[given(r#"a template for sector "{sector}" planned by "{planner}""#)]
fn template_for_sector(world: &mut IdentifierWorld, sector: String, planner: String) {
    world.pending_request = Some(
        RegisterTemplateRequest::new(sector, "Scenario activity", 1, "Monthly")
            .with_planner(planner),
    );
}

#[given(r#"{count:u64} templates already saved for sector "{sector}""#)]
fn templates_already_saved(
    world: &mut IdentifierWorld,
    count: u64,
    sector: String,
) -> Result<(), eyre::Report> {
    for index in 0..count {
        let request =
            RegisterTemplateRequest::new(sector.clone(), format!("Earlier task {index}"), 2, "Weekly");
        run_async(world.service.register(request)).wrap_err("save earlier template")?;
    }
    Ok(())
}

#[given("the template has been saved")]
fn template_has_been_saved(world: &mut IdentifierWorld) -> Result<(), eyre::Report> {
    let request = world
        .pending_request
        .take()
        .ok_or_else(|| eyre::eyre!("missing pending request in scenario world"))?;
    let saved = run_async(world.service.register(request)).wrap_err("save template")?;
    world.saved_template = Some(saved);
    Ok(())
}

#[given(r#"an imported template with identifier "{task_id}""#)]
fn imported_template(world: &mut IdentifierWorld, task_id: String) -> Result<(), eyre::Report> {
    let request = RegisterTemplateRequest::new("Contas a Pagar", "Imported task", 1, "Monthly")
        .with_task_id(task_id);
    run_async(world.service.register(request)).wrap_err("save imported template")?;
    Ok(())
}

#[given(r#"a template imported with identifier "{task_id}""#)]
fn template_imported_with(world: &mut IdentifierWorld, task_id: String) {
    world.pending_request = Some(
        RegisterTemplateRequest::new("Contas a Pagar", "Imported task", 1, "Monthly")
            .with_task_id(task_id),
    );
}
