//! Given steps for task pipeline BDD scenarios.

use super::world::{PipelineWorld, parse_status, parse_user, run_async};
use atelier::task::domain::Asset;
use atelier::task::ports::AssetRepository;
use atelier::workflow::domain::{DataSourceId, StageType, WorkflowStageConnection};
use atelier::workflow::ports::WorkflowStageRepository;
use rstest_bdd_macros::given;

#[given("a workflow with an annotation stage and a review stage")]
fn workflow_with_two_stages(world: &mut PipelineWorld) -> Result<(), eyre::Report> {
    let annotation_source = DataSourceId::new();
    let review_source = DataSourceId::new();

    let annotate = world.seed_stage("Annotate", StageType::Annotation, 0, annotation_source)?;
    let review = world.seed_stage("Review", StageType::Revision, 1, review_source)?;
    let connection =
        WorkflowStageConnection::new(world.workflow_id, annotate.id(), review.id());
    run_async(world.stages.store_connection(&connection))
        .map_err(|err| eyre::eyre!("storing connection failed: {err}"))?;

    world
        .provisioning
        .bind_annotation_data_source(world.project_id, annotation_source)
        .map_err(|err| eyre::eyre!("binding annotation data source failed: {err}"))?;

    world.annotate = Some(annotate);
    world.review = Some(review);
    Ok(())
}

#[given(r#"an asset at the "{stage}" stage with a "{status}" task assigned to "{user}""#)]
fn asset_with_task_at_stage(
    world: &mut PipelineWorld,
    stage: String,
    status: String,
    user: String,
) -> Result<(), eyre::Report> {
    let stage = world.stage_named(&stage)?;
    let data_source = stage
        .data_source()
        .ok_or_else(|| eyre::eyre!("scenario stage has no data source"))?;

    let asset = Asset::import(world.project_id, data_source, "frame-0001.png", &*world.clock)
        .map_err(|err| eyre::eyre!("invalid asset fixture: {err}"))?;
    run_async(world.assets.store(&asset))
        .map_err(|err| eyre::eyre!("storing asset failed: {err}"))?;
    world.asset = Some(asset);

    let assignee = parse_user(&user)?;
    let task = world.seed_task(&stage, parse_status(&status)?, Some(&assignee))?;
    world.task = Some(task);
    Ok(())
}

#[given(r#"an annotation task for the asset with status "{status}""#)]
fn annotation_task_with_status(
    world: &mut PipelineWorld,
    status: String,
) -> Result<(), eyre::Report> {
    let annotate = world.stage_named("annotation")?;
    let task = world.seed_task(&annotate, parse_status(&status)?, None)?;
    world.annotation_task = Some(task);
    Ok(())
}
