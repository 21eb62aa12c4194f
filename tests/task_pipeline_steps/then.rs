//! Then steps for task pipeline BDD scenarios.

use super::world::{PipelineWorld, parse_status, run_async};
use atelier::alert::domain::AlertType;
use atelier::task::ports::TaskRepository;
use rstest_bdd_macros::then;

#[then("the pipeline succeeds")]
fn pipeline_succeeds(world: &PipelineWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing pipeline result in scenario world"))?;
    if !result.is_success() {
        return Err(eyre::eyre!(
            "expected success, got failure: {:?}",
            result.error_message()
        ));
    }
    Ok(())
}

#[then(r#"the pipeline fails mentioning "{fragment}""#)]
fn pipeline_fails_mentioning(
    world: &PipelineWorld,
    fragment: String,
) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing pipeline result in scenario world"))?;
    if result.is_success() {
        return Err(eyre::eyre!("expected failure, pipeline succeeded"));
    }
    let message = result
        .error_message()
        .ok_or_else(|| eyre::eyre!("failure carries no message"))?;
    if !message.contains(&fragment) {
        return Err(eyre::eyre!(
            "expected message containing {fragment:?}, got {message:?}"
        ));
    }
    Ok(())
}

#[then(r#"the acted-on task has status "{status}""#)]
fn acted_on_task_has_status(world: &PipelineWorld, status: String) -> Result<(), eyre::Report> {
    let expected = parse_status(&status)?;
    let task = world
        .task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no task seeded in scenario world"))?;
    let stored = run_async(world.tasks.find_by_id(task.id()))
        .map_err(|err| eyre::eyre!("task lookup failed: {err}"))?
        .ok_or_else(|| eyre::eyre!("task vanished from repository"))?;
    if stored.status() != expected {
        return Err(eyre::eyre!(
            "expected status {expected}, found {}",
            stored.status()
        ));
    }
    Ok(())
}

#[then(r#"the asset sits in the "{stage}" stage data source"#)]
fn asset_sits_in_stage_data_source(
    world: &PipelineWorld,
    stage: String,
) -> Result<(), eyre::Report> {
    let stage = world.stage_named(&stage)?;
    let expected = stage
        .data_source()
        .ok_or_else(|| eyre::eyre!("scenario stage has no data source"))?;
    let asset = world.reload_asset()?;
    if asset.current_data_source() != expected {
        return Err(eyre::eyre!(
            "expected asset in data source {expected}, found {}",
            asset.current_data_source()
        ));
    }
    Ok(())
}

#[then(r#"a successor task exists at the "{stage}" stage with status "{status}""#)]
fn successor_task_exists(
    world: &PipelineWorld,
    stage: String,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = parse_status(&status)?;
    let stage = world.stage_named(&stage)?;
    let asset = world.reload_asset()?;
    let successor = run_async(world.tasks.find_by_asset_and_stage(asset.id(), stage.id()))
        .map_err(|err| eyre::eyre!("task lookup failed: {err}"))?
        .ok_or_else(|| eyre::eyre!("no successor task at stage {}", stage.name()))?;
    if successor.status() != expected {
        return Err(eyre::eyre!(
            "expected successor status {expected}, found {}",
            successor.status()
        ));
    }
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing pipeline result in scenario world"))?;
    if result.created_task().map(atelier::task::domain::Task::id) != Some(successor.id()) {
        return Err(eyre::eyre!("pipeline result does not carry the created task"));
    }
    Ok(())
}

#[then("no successor task is created")]
fn no_successor_created(world: &PipelineWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing pipeline result in scenario world"))?;
    if result.created_task().is_some() {
        return Err(eyre::eyre!("expected no created task"));
    }
    Ok(())
}

#[then(r#"the annotation task status is "{status}""#)]
fn annotation_task_status_is(world: &PipelineWorld, status: String) -> Result<(), eyre::Report> {
    let expected = parse_status(&status)?;
    let annotation_task = world
        .annotation_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no annotation task seeded in scenario world"))?;
    let stored = run_async(world.tasks.find_by_id(annotation_task.id()))
        .map_err(|err| eyre::eyre!("task lookup failed: {err}"))?
        .ok_or_else(|| eyre::eyre!("annotation task vanished from repository"))?;
    if stored.status() != expected {
        return Err(eyre::eyre!(
            "expected annotation task status {expected}, found {}",
            stored.status()
        ));
    }
    Ok(())
}

#[then("exactly one data-integrity alert is raised")]
fn one_integrity_alert(world: &PipelineWorld) -> Result<(), eyre::Report> {
    let delivered = world
        .alerts
        .delivered()
        .map_err(|err| eyre::eyre!("alert snapshot failed: {err}"))?;
    if delivered.len() != 1 {
        return Err(eyre::eyre!("expected one alert, found {}", delivered.len()));
    }
    let alert = delivered
        .first()
        .ok_or_else(|| eyre::eyre!("alert list unexpectedly empty"))?;
    if alert.alert_type() != AlertType::DataIntegrityViolation {
        return Err(eyre::eyre!(
            "expected data-integrity alert, found {}",
            alert.alert_type()
        ));
    }
    Ok(())
}
