//! Given steps for dispatch admission BDD scenarios.

use super::world::{DispatchWorld, run_async};
use eyre::WrapErr;
use fieldgate::dispatch::domain::LoadEstimate;
use rstest_bdd_macros::given;

#[given(r#"a dispatch selection with farms "{farms}""#)]
fn selection_with_farms(world: &mut DispatchWorld, farms: String) -> Result<(), eyre::Report> {
    let mut names = farms.split(',').map(str::trim);
    let first = names
        .next()
        .ok_or_else(|| eyre::eyre!("scenario must name at least one farm"))?;
    let mut selection =
        run_async(world.service.open_selection(first)).wrap_err("open dispatch selection")?;
    for name in names {
        selection = run_async(world.service.select_farm(selection.id(), name))
            .wrap_err_with(|| format!("select farm {name}"))?;
    }
    world.selection = Some(selection);
    Ok(())
}

#[given(r#"truck "{truck}" with capacity {capacity:u64} kg is assigned"#)]
fn truck_assigned(
    world: &mut DispatchWorld,
    truck: String,
    capacity: u64,
) -> Result<(), eyre::Report> {
    let selection_id = world.selection_id()?;
    let selection = run_async(world.service.assign_truck(selection_id, &truck, capacity))
        .wrap_err("assign truck")?;
    world.selection = Some(selection);
    Ok(())
}

#[given("the estimated load is {weight:u64} kg")]
fn load_estimated(world: &mut DispatchWorld, weight: u64) -> Result<(), eyre::Report> {
    let selection_id = world.selection_id()?;
    let selection = run_async(
        world
            .service
            .update_load(selection_id, LoadEstimate::new(weight, 50)),
    )
    .wrap_err("update load estimate")?;
    world.selection = Some(selection);
    Ok(())
}

#[given(r#"farm "{farm}" is deselected"#)]
fn farm_deselected(world: &mut DispatchWorld, farm: String) -> Result<(), eyre::Report> {
    let selection_id = world.selection_id()?;
    let selection = run_async(world.service.deselect_farm(selection_id, &farm))
        .wrap_err("deselect farm")?;
    world.selection = Some(selection);
    Ok(())
}

#[given(r#"the driver notifier will fail with "{reason}""#)]
fn notifier_will_fail(world: &mut DispatchWorld, reason: String) -> Result<(), eyre::Report> {
    world
        .notifier
        .fail_next(reason)
        .wrap_err("script notifier failure")
}

#[given("a dispatch has been requested")]
fn dispatch_requested(world: &mut DispatchWorld) -> Result<(), eyre::Report> {
    let selection_id = world.selection_id()?;
    run_async(world.service.request_dispatch(selection_id)).wrap_err("request dispatch")?;
    Ok(())
}
