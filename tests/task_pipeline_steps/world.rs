//! Shared world state for task pipeline BDD scenarios.

use std::sync::Arc;

use atelier::alert::adapters::memory::InMemoryAlertSink;
use atelier::task::{
    adapters::memory::{
        InMemoryAssetRelocationService, InMemoryAssetRepository, InMemoryProvisioningService,
        InMemoryTaskRepository,
    },
    domain::{Asset, NewTaskData, ProjectId, Task, TaskPriority, TaskStatus, UserId},
    ports::{AssetRepository, TaskRepository},
    services::{PipelineResult, TaskCompletionPipeline, TaskVetoPipeline},
};
use atelier::workflow::{
    adapters::memory::InMemoryWorkflowStageRepository,
    domain::{DataSourceId, StageType, WorkflowId, WorkflowStage},
    ports::WorkflowStageRepository,
    services::WorkflowTopologyService,
};
use mockable::DefaultClock;
use rstest::fixture;

type TestTaskRepository = InMemoryTaskRepository<DefaultClock>;
type TestAssetRepository = InMemoryAssetRepository<DefaultClock>;

/// Scenario world for pipeline behaviour tests.
pub struct PipelineWorld {
    pub clock: Arc<DefaultClock>,
    pub tasks: Arc<TestTaskRepository>,
    pub assets: Arc<TestAssetRepository>,
    pub stages: Arc<InMemoryWorkflowStageRepository>,
    pub resolver: Arc<WorkflowTopologyService<InMemoryWorkflowStageRepository>>,
    pub relocation: Arc<InMemoryAssetRelocationService<TestAssetRepository>>,
    pub provisioning: Arc<InMemoryProvisioningService>,
    pub alerts: Arc<InMemoryAlertSink>,
    pub workflow_id: WorkflowId,
    pub project_id: ProjectId,
    pub annotate: Option<WorkflowStage>,
    pub review: Option<WorkflowStage>,
    pub asset: Option<Asset>,
    pub task: Option<Task>,
    pub annotation_task: Option<Task>,
    pub last_result: Option<PipelineResult>,
}

impl PipelineWorld {
    /// Creates a world with empty pending scenario state.
    #[must_use]
    pub fn new() -> Self {
        let clock = Arc::new(DefaultClock);
        let tasks = Arc::new(InMemoryTaskRepository::new(clock.clone()));
        let assets = Arc::new(InMemoryAssetRepository::new(clock.clone()));
        let stages = Arc::new(InMemoryWorkflowStageRepository::new());
        let resolver = Arc::new(WorkflowTopologyService::new(stages.clone()));
        let relocation = Arc::new(InMemoryAssetRelocationService::new(assets.clone()));
        Self {
            clock,
            tasks,
            assets,
            stages,
            resolver,
            relocation,
            provisioning: Arc::new(InMemoryProvisioningService::new()),
            alerts: Arc::new(InMemoryAlertSink::new()),
            workflow_id: WorkflowId::new(),
            project_id: ProjectId::new(),
            annotate: None,
            review: None,
            asset: None,
            task: None,
            annotation_task: None,
            last_result: None,
        }
    }

    /// Builds a completion pipeline over the world's collaborators.
    #[must_use]
    pub fn completion_pipeline(&self) -> TaskCompletionPipeline<DefaultClock> {
        TaskCompletionPipeline::new(
            self.tasks.clone(),
            self.assets.clone(),
            self.stages.clone(),
            self.resolver.clone(),
            self.relocation.clone(),
            self.alerts.clone(),
            self.clock.clone(),
        )
    }

    /// Builds a veto pipeline over the world's collaborators.
    #[must_use]
    pub fn veto_pipeline(&self) -> TaskVetoPipeline<DefaultClock> {
        TaskVetoPipeline::new(
            self.tasks.clone(),
            self.assets.clone(),
            self.stages.clone(),
            self.resolver.clone(),
            self.relocation.clone(),
            self.provisioning.clone(),
            self.alerts.clone(),
            self.clock.clone(),
        )
    }

    /// Returns the stage named in a scenario step.
    pub fn stage_named(&self, name: &str) -> Result<WorkflowStage, eyre::Report> {
        let stage = match name {
            "annotation" => self.annotate.clone(),
            "review" => self.review.clone(),
            other => return Err(eyre::eyre!("unknown stage name in scenario: {other}")),
        };
        stage.ok_or_else(|| eyre::eyre!("stage {name} has not been seeded"))
    }

    /// Seeds a stage into the workflow graph.
    pub fn seed_stage(
        &self,
        name: &str,
        stage_type: StageType,
        order_index: u32,
        data_source: DataSourceId,
    ) -> Result<WorkflowStage, eyre::Report> {
        let stage = WorkflowStage::new(self.workflow_id, name, stage_type, order_index)
            .map_err(|err| eyre::eyre!("invalid stage fixture: {err}"))?
            .with_data_source(data_source);
        run_async(self.stages.store_stage(&stage))
            .map_err(|err| eyre::eyre!("storing stage failed: {err}"))?;
        Ok(stage)
    }

    /// Seeds a task for the world's asset at the given stage.
    pub fn seed_task(
        &self,
        stage: &WorkflowStage,
        status: TaskStatus,
        assignee: Option<&UserId>,
    ) -> Result<Task, eyre::Report> {
        let asset = self
            .asset
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no asset seeded in scenario world"))?;
        let mut task = Task::new(
            NewTaskData {
                asset_id: asset.id(),
                project_id: self.project_id,
                workflow_id: self.workflow_id,
                stage_id: stage.id(),
                status,
                priority: TaskPriority::Medium,
                due_date: None,
            },
            &*self.clock,
        );
        if let Some(user) = assignee {
            task.assign(user.clone(), &*self.clock);
        }
        run_async(self.tasks.store(&task))
            .map_err(|err| eyre::eyre!("storing task failed: {err}"))?;
        Ok(task)
    }

    /// Reloads the world's asset from the repository.
    pub fn reload_asset(&self) -> Result<Asset, eyre::Report> {
        let asset = self
            .asset
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no asset seeded in scenario world"))?;
        run_async(self.assets.find_by_id(asset.id()))
            .map_err(|err| eyre::eyre!("asset lookup failed: {err}"))?
            .ok_or_else(|| eyre::eyre!("asset vanished from repository"))
    }
}

impl Default for PipelineWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> PipelineWorld {
    PipelineWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Parses a status literal used in feature files.
pub fn parse_status(value: &str) -> Result<TaskStatus, eyre::Report> {
    TaskStatus::try_from(value).map_err(|err| eyre::eyre!("bad status in scenario: {err}"))
}

/// Parses a user literal used in feature files.
pub fn parse_user(value: &str) -> Result<UserId, eyre::Report> {
    UserId::new(value).map_err(|err| eyre::eyre!("bad user in scenario: {err}"))
}
