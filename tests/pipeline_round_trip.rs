//! Behavioural integration test for the complete-then-veto round trip.
//!
//! Exercises both pipelines against the in-memory adapters in the flow a
//! review workflow actually produces: an annotator completes their task,
//! the asset advances to review, the reviewer starts and then vetoes the
//! review task, and the asset lands back in the project's canonical
//! annotation data source with the annotation task reopened for rework.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

use std::sync::Arc;

use atelier::alert::adapters::memory::InMemoryAlertSink;
use atelier::task::{
    adapters::memory::{
        InMemoryAssetRelocationService, InMemoryAssetRepository, InMemoryProvisioningService,
        InMemoryTaskRepository,
    },
    domain::{Asset, NewTaskData, ProjectId, TaskPriority, TaskStatus, UserId},
    ports::{AssetRepository, TaskRepository},
    services::{TaskCompletionPipeline, TaskVetoPipeline},
};
use atelier::workflow::{
    adapters::memory::InMemoryWorkflowStageRepository,
    domain::{DataSourceId, StageType, WorkflowId, WorkflowStage, WorkflowStageConnection},
    ports::WorkflowStageRepository,
    services::WorkflowTopologyService,
};
use mockable::DefaultClock;

#[tokio::test(flavor = "multi_thread")]
async fn complete_then_veto_returns_the_asset_to_annotation() {
    let clock = Arc::new(DefaultClock);
    let tasks = Arc::new(InMemoryTaskRepository::new(clock.clone()));
    let assets = Arc::new(InMemoryAssetRepository::new(clock.clone()));
    let stages = Arc::new(InMemoryWorkflowStageRepository::new());
    let resolver = Arc::new(WorkflowTopologyService::new(stages.clone()));
    let relocation = Arc::new(InMemoryAssetRelocationService::new(assets.clone()));
    let provisioning = Arc::new(InMemoryProvisioningService::new());
    let alerts = Arc::new(InMemoryAlertSink::new());

    let workflow_id = WorkflowId::new();
    let project_id = ProjectId::new();
    let annotation_source = DataSourceId::new();
    let review_source = DataSourceId::new();

    // Two-stage workflow: Annotate -> Review, each owning a data source.
    let annotate = WorkflowStage::new(workflow_id, "Annotate", StageType::Annotation, 0)
        .expect("valid stage")
        .with_data_source(annotation_source)
        .marked_initial();
    let review = WorkflowStage::new(workflow_id, "Review", StageType::Revision, 1)
        .expect("valid stage")
        .with_data_source(review_source)
        .marked_final();
    stages.store_stage(&annotate).await.expect("stage stored");
    stages.store_stage(&review).await.expect("stage stored");
    stages
        .store_connection(&WorkflowStageConnection::new(
            workflow_id,
            annotate.id(),
            review.id(),
        ))
        .await
        .expect("connection stored");
    provisioning
        .bind_annotation_data_source(project_id, annotation_source)
        .expect("binding succeeds");

    let asset = Asset::import(project_id, annotation_source, "frame-0001.png", &*clock)
        .expect("valid asset");
    assets.store(&asset).await.expect("asset stored");

    let annotator = UserId::new("user123").expect("valid user id");
    let mut annotation_task = atelier::task::domain::Task::new(
        NewTaskData {
            asset_id: asset.id(),
            project_id,
            workflow_id,
            stage_id: annotate.id(),
            status: TaskStatus::InProgress,
            priority: TaskPriority::Medium,
            due_date: None,
        },
        &*clock,
    );
    annotation_task.assign(annotator.clone(), &*clock);
    tasks.store(&annotation_task).await.expect("task stored");

    let completion = TaskCompletionPipeline::new(
        tasks.clone(),
        assets.clone(),
        stages.clone(),
        resolver.clone(),
        relocation.clone(),
        alerts.clone(),
        clock.clone(),
    );
    let veto = TaskVetoPipeline::new(
        tasks.clone(),
        assets.clone(),
        stages.clone(),
        resolver.clone(),
        relocation.clone(),
        provisioning.clone(),
        alerts.clone(),
        clock.clone(),
    );

    // The annotator finishes: asset moves forward, a review task appears.
    let completed = completion
        .execute(annotation_task.id(), annotator.clone())
        .await
        .expect("no infrastructure failure");
    assert!(completed.is_success());
    let review_task = completed.created_task().expect("review task created");
    assert_eq!(review_task.stage_id(), review.id());
    assert_eq!(review_task.status(), TaskStatus::NotStarted);
    let moved = assets
        .find_by_id(asset.id())
        .await
        .expect("lookup succeeds")
        .expect("asset exists");
    assert_eq!(moved.current_data_source(), review_source);

    // The reviewer picks the task up and rejects the work.
    let reviewer = UserId::new("reviewer-1").expect("valid user id");
    let review_task_id = review_task.id();
    tasks
        .update_status(review_task_id, TaskStatus::InProgress, &reviewer)
        .await
        .expect("status write succeeds");

    let vetoed = veto
        .execute(
            review_task_id,
            reviewer.clone(),
            Some("bounding boxes drift on frames 40-60".to_owned()),
        )
        .await
        .expect("no infrastructure failure");
    assert!(vetoed.is_success());

    // Round trip invariants: the asset is back in the canonical annotation
    // data source and the original annotation task awaits rework.
    let returned = assets
        .find_by_id(asset.id())
        .await
        .expect("lookup succeeds")
        .expect("asset exists");
    assert_eq!(returned.current_data_source(), annotation_source);

    let reopened = tasks
        .find_by_id(annotation_task.id())
        .await
        .expect("lookup succeeds")
        .expect("task exists");
    assert_eq!(reopened.status(), TaskStatus::ChangesRequired);
    assert_eq!(reopened.last_worked_on_by(), Some(&reviewer));

    let vetoed_review_task = tasks
        .find_by_id(review_task_id)
        .await
        .expect("lookup succeeds")
        .expect("task exists");
    assert_eq!(vetoed_review_task.status(), TaskStatus::Vetoed);
    assert!(alerts.delivered().expect("snapshot").is_empty());
}
