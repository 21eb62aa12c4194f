//! Backward pipeline returning a rejected asset to annotation.

use super::{
    context::PipelineContext,
    management_step::TaskManagementStep,
    result::{PipelineError, PipelineExecutionResult, PipelineResult},
    status_step::TaskStatusUpdateStep,
    step::{PipelineStep, StepError, run_steps},
    transfer_step::AssetTransferStep,
};
use crate::alert::ports::ManagementAlertSink;
use crate::task::{
    domain::{TaskId, TaskStatus, UserId},
    ports::{
        AssetRelocationService, AssetRepository, DataSourceProvisioningService, TaskRepository,
    },
};
use crate::workflow::{
    domain::StageType,
    ports::{WorkflowStageRepository, WorkflowStageResolver},
};
use mockable::Clock;
use std::sync::Arc;

/// Pipeline executed when a reviewer rejects a task's work.
///
/// Transitions the task to [`TaskStatus::Vetoed`], relocates the asset back
/// into the project's canonical annotation data source, and restores or
/// creates the upstream annotation task in
/// [`TaskStatus::ChangesRequired`]. Vetoing is only meaningful from
/// revision and completion stages. On any step failure, already-executed
/// steps roll back in reverse order; integrity-violation messages are
/// preserved verbatim for operator triage.
pub struct TaskVetoPipeline<K>
where
    K: Clock + Send + Sync,
{
    tasks: Arc<dyn TaskRepository>,
    assets: Arc<dyn AssetRepository>,
    stages: Arc<dyn WorkflowStageRepository>,
    resolver: Arc<dyn WorkflowStageResolver>,
    relocation: Arc<dyn AssetRelocationService>,
    provisioning: Arc<dyn DataSourceProvisioningService>,
    alerts: Arc<dyn ManagementAlertSink>,
    clock: Arc<K>,
}

impl<K> TaskVetoPipeline<K>
where
    K: Clock + Send + Sync + 'static,
{
    /// Creates a veto pipeline over the given collaborators.
    #[must_use]
    #[expect(
        clippy::too_many_arguments,
        reason = "pipeline constructor wires the full collaborator set"
    )]
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        assets: Arc<dyn AssetRepository>,
        stages: Arc<dyn WorkflowStageRepository>,
        resolver: Arc<dyn WorkflowStageResolver>,
        relocation: Arc<dyn AssetRelocationService>,
        provisioning: Arc<dyn DataSourceProvisioningService>,
        alerts: Arc<dyn ManagementAlertSink>,
        clock: Arc<K>,
    ) -> Self {
        Self {
            tasks,
            assets,
            stages,
            resolver,
            relocation,
            provisioning,
            alerts,
            clock,
        }
    }

    /// Vetoes the task as `acting_user`, optionally recording a reason.
    ///
    /// Expected business failures are encoded in the returned
    /// [`PipelineResult`]; infrastructure failures surface as
    /// [`PipelineError`] once rollback has been attempted.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Persistence`] when a store or resolver call
    /// fails for infrastructure reasons.
    pub async fn execute(
        &self,
        task_id: TaskId,
        acting_user: UserId,
        reason: Option<String>,
    ) -> PipelineExecutionResult {
        let Some(task) = self.tasks.find_by_id(task_id).await? else {
            return Ok(PipelineResult::failure(format!("Task {task_id} not found")));
        };
        if task.status() != TaskStatus::InProgress {
            return Ok(PipelineResult::failure(format!(
                "Task {task_id} cannot be vetoed from status '{}'",
                task.status()
            )));
        }

        let Some(asset) = self.assets.find_by_id(task.asset_id()).await? else {
            return Ok(PipelineResult::failure(format!(
                "Asset {} not found",
                task.asset_id()
            )));
        };
        let Some(current_stage) = self.stages.find_by_id(task.stage_id()).await? else {
            return Ok(PipelineResult::failure(format!(
                "Workflow stage {} not found",
                task.stage_id()
            )));
        };
        if current_stage.stage_type() == StageType::Annotation {
            return Ok(PipelineResult::failure(
                "Annotation tasks cannot be vetoed",
            ));
        }

        let mut ctx = PipelineContext::new(task, asset, current_stage, acting_user);
        if let Some(r) = reason {
            ctx = ctx.with_reason(r);
        }

        let steps: Vec<Box<dyn PipelineStep>> = vec![
            Box::new(
                TaskStatusUpdateStep::new(Arc::clone(&self.tasks))
                    .with_target(TaskStatus::Vetoed),
            ),
            Box::new(AssetTransferStep::to_annotation(
                Arc::clone(&self.relocation),
                Arc::clone(&self.assets),
                Arc::clone(&self.provisioning),
            )),
            Box::new(TaskManagementStep::for_rework(
                Arc::clone(&self.tasks),
                Arc::clone(&self.resolver),
                Arc::clone(&self.alerts),
                Arc::clone(&self.clock),
            )),
        ];

        match run_steps(steps, &mut ctx).await {
            Ok(()) => Ok(PipelineResult::success(ctx.task, ctx.created_task)),
            Err(StepError::Persistence(source)) => Err(PipelineError::Persistence(source)),
            Err(err) => Ok(PipelineResult::failure(err.to_string())),
        }
    }

    /// Returns whether `acting_user` may veto the task.
    ///
    /// True only when the task exists and is assigned to the user; role
    /// checks beyond ownership belong to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Persistence`] when the task lookup fails.
    pub async fn can_execute(
        &self,
        task_id: TaskId,
        acting_user: &UserId,
    ) -> Result<bool, PipelineError> {
        let task = self.tasks.find_by_id(task_id).await?;
        Ok(task.is_some_and(|found| found.assigned_to() == Some(acting_user)))
    }
}
