//! Shared fixtures and recording doubles for pipeline tests.

use async_trait::async_trait;
use mockable::DefaultClock;
use std::sync::{Arc, Mutex};

use crate::alert::adapters::memory::InMemoryAlertSink;
use crate::task::{
    adapters::memory::{
        InMemoryAssetRelocationService, InMemoryAssetRepository, InMemoryProvisioningService,
        InMemoryTaskRepository,
    },
    domain::{Asset, AssetId, NewTaskData, ProjectId, Task, TaskPriority, TaskStatus, UserId},
    ports::{
        AssetRelocationService, AssetRepository, RelocationResult, TaskRepository,
        TaskRepositoryResult,
    },
    services::{TaskCompletionPipeline, TaskVetoPipeline},
};
use crate::task::domain::TaskId;
use crate::workflow::{
    adapters::memory::InMemoryWorkflowStageRepository,
    domain::{DataSourceId, StageId, StageType, WorkflowId, WorkflowStage,
             WorkflowStageConnection},
    ports::WorkflowStageRepository,
    services::WorkflowTopologyService,
};

pub type TestTaskRepository = InMemoryTaskRepository<DefaultClock>;
pub type TestAssetRepository = InMemoryAssetRepository<DefaultClock>;
pub type TestTopology = WorkflowTopologyService<InMemoryWorkflowStageRepository>;

/// Full in-memory collaborator set for driving pipelines in tests.
pub struct Harness {
    pub clock: Arc<DefaultClock>,
    pub tasks: Arc<TestTaskRepository>,
    pub assets: Arc<TestAssetRepository>,
    pub stages: Arc<InMemoryWorkflowStageRepository>,
    pub resolver: Arc<TestTopology>,
    pub relocation: Arc<InMemoryAssetRelocationService<TestAssetRepository>>,
    pub provisioning: Arc<InMemoryProvisioningService>,
    pub alerts: Arc<InMemoryAlertSink>,
    pub workflow_id: WorkflowId,
    pub project_id: ProjectId,
}

impl Harness {
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
        }
    }

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

    pub async fn seed_stage(
        &self,
        name: &str,
        stage_type: StageType,
        order_index: u32,
        data_source: Option<DataSourceId>,
    ) -> WorkflowStage {
        let mut stage = WorkflowStage::new(self.workflow_id, name, stage_type, order_index)
            .expect("valid stage");
        if let Some(data_source) = data_source {
            stage = stage.with_data_source(data_source);
        }
        self.stages
            .store_stage(&stage)
            .await
            .expect("stage stored");
        stage
    }

    pub async fn connect(&self, from: &WorkflowStage, to: &WorkflowStage) {
        let connection = WorkflowStageConnection::new(self.workflow_id, from.id(), to.id());
        self.stages
            .store_connection(&connection)
            .await
            .expect("connection stored");
    }

    pub async fn seed_asset(&self, data_source: DataSourceId) -> Asset {
        let asset = Asset::import(self.project_id, data_source, "frame-0001.png", &*self.clock)
            .expect("valid asset");
        self.assets.store(&asset).await.expect("asset stored");
        asset
    }

    pub async fn seed_task(
        &self,
        asset: &Asset,
        stage: &WorkflowStage,
        status: TaskStatus,
        assignee: Option<&UserId>,
    ) -> Task {
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
        self.tasks.store(&task).await.expect("task stored");
        task
    }
}

pub fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid user id")
}

/// Relocation double that refuses every transfer.
pub struct RefusingRelocationService;

#[async_trait]
impl AssetRelocationService for RefusingRelocationService {
    async fn transfer_asset_to_data_source(
        &self,
        _asset_id: AssetId,
        _data_source: DataSourceId,
    ) -> RelocationResult<bool> {
        Ok(false)
    }
}

/// Task repository decorator recording every status write.
pub struct RecordingTaskRepository {
    inner: Arc<TestTaskRepository>,
    pub status_writes: Mutex<Vec<(TaskId, TaskStatus)>>,
}

impl RecordingTaskRepository {
    pub fn new(inner: Arc<TestTaskRepository>) -> Self {
        Self {
            inner,
            status_writes: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded_writes(&self) -> Vec<(TaskId, TaskStatus)> {
        self.status_writes
            .lock()
            .expect("status write log lock")
            .clone()
    }
}

#[async_trait]
impl TaskRepository for RecordingTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        self.inner.store(task).await
    }

    async fn remove(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        self.inner.remove(id).await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_asset_and_stage(
        &self,
        asset_id: AssetId,
        stage_id: StageId,
    ) -> TaskRepositoryResult<Option<Task>> {
        self.inner.find_by_asset_and_stage(asset_id, stage_id).await
    }

    async fn list_by_asset(&self, asset_id: AssetId) -> TaskRepositoryResult<Vec<Task>> {
        self.inner.list_by_asset(asset_id).await
    }

    async fn update_status(
        &self,
        id: TaskId,
        status: TaskStatus,
        acting_user: &UserId,
    ) -> TaskRepositoryResult<Task> {
        let updated = self.inner.update_status(id, status, acting_user).await?;
        self.status_writes
            .lock()
            .expect("status write log lock")
            .push((id, status));
        Ok(updated)
    }
}
