//! Forward pipeline advancing a completed task to its successor stage.

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
    ports::{AssetRelocationService, AssetRepository, TaskRepository},
};
use crate::workflow::ports::{WorkflowStageRepository, WorkflowStageResolver};
use mockable::Clock;
use std::sync::Arc;

/// Pipeline executed when a user completes their task.
///
/// Transitions the task to [`TaskStatus::Completed`], relocates the asset
/// into the successor stage's data source, and finds or creates the task
/// record at that stage. A task at a final stage only changes status. On
/// any step failure, already-executed steps roll back in reverse order and
/// the originating error message is returned.
pub struct TaskCompletionPipeline<K>
where
    K: Clock + Send + Sync,
{
    tasks: Arc<dyn TaskRepository>,
    assets: Arc<dyn AssetRepository>,
    stages: Arc<dyn WorkflowStageRepository>,
    resolver: Arc<dyn WorkflowStageResolver>,
    relocation: Arc<dyn AssetRelocationService>,
    alerts: Arc<dyn ManagementAlertSink>,
    clock: Arc<K>,
}

impl<K> TaskCompletionPipeline<K>
where
    K: Clock + Send + Sync + 'static,
{
    /// Creates a completion pipeline over the given collaborators.
    #[must_use]
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        assets: Arc<dyn AssetRepository>,
        stages: Arc<dyn WorkflowStageRepository>,
        resolver: Arc<dyn WorkflowStageResolver>,
        relocation: Arc<dyn AssetRelocationService>,
        alerts: Arc<dyn ManagementAlertSink>,
        clock: Arc<K>,
    ) -> Self {
        Self {
            tasks,
            assets,
            stages,
            resolver,
            relocation,
            alerts,
            clock,
        }
    }

    /// Completes the task as `acting_user`.
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
    ) -> PipelineExecutionResult {
        let Some(task) = self.tasks.find_by_id(task_id).await? else {
            return Ok(PipelineResult::failure(format!("Task {task_id} not found")));
        };
        if task.status() != TaskStatus::InProgress {
            return Ok(PipelineResult::failure(format!(
                "Task {task_id} cannot be completed from status '{}'",
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
        let next_stage = self.resolver.next_stage(current_stage.id()).await?;

        let mut ctx = PipelineContext::new(task, asset, current_stage, acting_user);
        let mut steps: Vec<Box<dyn PipelineStep>> =
            vec![Box::new(TaskStatusUpdateStep::new(Arc::clone(&self.tasks)))];
        if let Some(stage) = next_stage {
            ctx = ctx.with_target_stage(stage);
            steps.push(Box::new(AssetTransferStep::to_target_stage(
                Arc::clone(&self.relocation),
                Arc::clone(&self.assets),
            )));
            steps.push(Box::new(TaskManagementStep::for_stage_advance(
                Arc::clone(&self.tasks),
                Arc::clone(&self.resolver),
                Arc::clone(&self.alerts),
                Arc::clone(&self.clock),
            )));
        }

        match run_steps(steps, &mut ctx).await {
            Ok(()) => Ok(PipelineResult::success(ctx.task, ctx.created_task)),
            Err(StepError::Persistence(source)) => Err(PipelineError::Persistence(source)),
            Err(err) => Ok(PipelineResult::failure(err.to_string())),
        }
    }

    /// Returns whether `acting_user` may complete the task.
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
