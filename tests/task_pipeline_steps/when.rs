//! When steps for task pipeline BDD scenarios.

use super::world::{PipelineWorld, parse_user, run_async};
use rstest_bdd_macros::when;

#[when(r#"the task is completed by "{user}""#)]
fn complete_task(world: &mut PipelineWorld, user: String) -> Result<(), eyre::Report> {
    let task = world
        .task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no task seeded in scenario world"))?;
    let acting_user = parse_user(&user)?;

    let result = run_async(world.completion_pipeline().execute(task.id(), acting_user))
        .map_err(|err| eyre::eyre!("unexpected infrastructure failure: {err}"))?;
    world.last_result = Some(result);
    Ok(())
}

#[when(r#"the task is vetoed by "{user}" because "{reason}""#)]
fn veto_task(
    world: &mut PipelineWorld,
    user: String,
    reason: String,
) -> Result<(), eyre::Report> {
    let task = world
        .task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no task seeded in scenario world"))?;
    let acting_user = parse_user(&user)?;

    let result = run_async(
        world
            .veto_pipeline()
            .execute(task.id(), acting_user, Some(reason)),
    )
    .map_err(|err| eyre::eyre!("unexpected infrastructure failure: {err}"))?;
    world.last_result = Some(result);
    Ok(())
}
