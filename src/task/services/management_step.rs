//! Pipeline step managing the task record at the asset's next stop.

use super::{
    context::PipelineContext,
    step::{PipelineStep, StepError, StepResult},
};
use crate::alert::{
    domain::{AlertType, ManagementAlert},
    ports::ManagementAlertSink,
    services::{IntegrityViolationReport, render_integrity_violation},
};
use crate::task::{
    domain::{NewTaskData, Task, TaskId, TaskStatus},
    ports::TaskRepository,
};
use crate::workflow::{domain::WorkflowStage, ports::WorkflowStageResolver};
use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use std::sync::Arc;

/// Operation the management step performs when run through the generic
/// entry point.
enum ManagementMode {
    /// Forward flow: find or create the task at the resolved target stage.
    StageAdvance,
    /// Veto flow: restore or create the upstream annotation task.
    Rework,
}

/// Step that finds or creates the task record representing the asset's next
/// unit of work.
///
/// On veto it also detects annotation tasks in states the workflow history
/// cannot explain, raising a management alert before failing.
pub struct TaskManagementStep<K>
where
    K: Clock + Send + Sync,
{
    tasks: Arc<dyn TaskRepository>,
    resolver: Arc<dyn WorkflowStageResolver>,
    alerts: Arc<dyn ManagementAlertSink>,
    clock: Arc<K>,
    mode: ManagementMode,
    created: Option<TaskId>,
}

impl<K> TaskManagementStep<K>
where
    K: Clock + Send + Sync,
{
    /// Creates a management step for forward stage advance.
    #[must_use]
    pub fn for_stage_advance(
        tasks: Arc<dyn TaskRepository>,
        resolver: Arc<dyn WorkflowStageResolver>,
        alerts: Arc<dyn ManagementAlertSink>,
        clock: Arc<K>,
    ) -> Self {
        Self {
            tasks,
            resolver,
            alerts,
            clock,
            mode: ManagementMode::StageAdvance,
            created: None,
        }
    }

    /// Creates a management step for veto rework.
    #[must_use]
    pub fn for_rework(
        tasks: Arc<dyn TaskRepository>,
        resolver: Arc<dyn WorkflowStageResolver>,
        alerts: Arc<dyn ManagementAlertSink>,
        clock: Arc<K>,
    ) -> Self {
        Self {
            tasks,
            resolver,
            alerts,
            clock,
            mode: ManagementMode::Rework,
            created: None,
        }
    }

    /// Finds or creates the task at the resolved target stage.
    ///
    /// An existing task takes the waiting status matching the target stage's
    /// type; a missing one is created as [`TaskStatus::NotStarted`]. Only a
    /// creation is recorded for rollback.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Precondition`] when the context lacks a target
    /// stage.
    pub async fn create_or_update_task_for_target_stage(
        &mut self,
        ctx: &mut PipelineContext,
    ) -> StepResult<()> {
        let target_stage = ctx
            .target_stage
            .clone()
            .ok_or_else(|| StepError::Precondition("Target stage is required".to_owned()))?;

        let existing = self
            .tasks
            .find_by_asset_and_stage(ctx.asset.id(), target_stage.id())
            .await?;
        match existing {
            Some(successor) => {
                let ready = TaskStatus::ready_for(target_stage.stage_type());
                self.tasks
                    .update_status(successor.id(), ready, &ctx.acting_user)
                    .await?;
            }
            None => {
                let task = self.spawn_task(ctx, &target_stage, TaskStatus::NotStarted);
                self.tasks.store(&task).await?;
                self.created = Some(task.id());
                ctx.created_task = Some(task);
            }
        }
        Ok(())
    }

    /// Restores or creates the upstream annotation task after a veto.
    ///
    /// An annotation task found in [`TaskStatus::Completed`] or
    /// [`TaskStatus::Vetoed`] moves to [`TaskStatus::ChangesRequired`]; a
    /// missing one is created in that status, covering assets imported
    /// directly into a downstream stage. Any other status is a
    /// data-integrity violation: an alert is raised and the step fails with
    /// the violation message preserved for operator triage.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::NotFound`] when the workflow has no annotation
    /// stage and [`StepError::DataIntegrity`] on a violation.
    pub async fn update_annotation_task_for_changes(
        &mut self,
        ctx: &mut PipelineContext,
    ) -> StepResult<()> {
        let annotation_stage = self
            .resolver
            .first_annotation_stage(ctx.task.workflow_id())
            .await
            .map_err(StepError::persistence)?
            .ok_or_else(|| {
                StepError::NotFound("First annotation stage not found".to_owned())
            })?;

        let existing = self
            .tasks
            .find_by_asset_and_stage(ctx.asset.id(), annotation_stage.id())
            .await?;
        match existing {
            Some(annotation_task)
                if matches!(
                    annotation_task.status(),
                    TaskStatus::Completed | TaskStatus::Vetoed
                ) =>
            {
                self.tasks
                    .update_status(
                        annotation_task.id(),
                        TaskStatus::ChangesRequired,
                        &ctx.acting_user,
                    )
                    .await?;
                Ok(())
            }
            Some(annotation_task) => {
                self.raise_integrity_alert(ctx, &annotation_task).await;
                Err(StepError::DataIntegrity(format!(
                    "Invalid status: annotation task must be 'completed' or 'vetoed', \
                     but found '{}'",
                    annotation_task.status()
                )))
            }
            None => {
                let task = self.spawn_task(ctx, &annotation_stage, TaskStatus::ChangesRequired);
                self.tasks.store(&task).await?;
                self.created = Some(task.id());
                ctx.created_task = Some(task);
                Ok(())
            }
        }
    }

    /// Checks that at most one task for the context's asset is active.
    ///
    /// The candidate is counted as if persisted, replacing any stored
    /// snapshot of itself. This guard is offered to strict callers; the
    /// pipelines do not invoke it automatically.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Persistence`] when the task store lookup fails.
    pub async fn validate_data_integrity(
        &self,
        ctx: &PipelineContext,
        candidate: &Task,
    ) -> StepResult<bool> {
        let tasks = self.tasks.list_by_asset(ctx.asset.id()).await?;
        let active = tasks
            .iter()
            .filter(|task| task.id() != candidate.id() && task.status().is_active())
            .count()
            + usize::from(candidate.status().is_active());
        Ok(active <= 1)
    }

    fn spawn_task(
        &self,
        ctx: &PipelineContext,
        stage: &WorkflowStage,
        status: TaskStatus,
    ) -> Task {
        Task::new(
            NewTaskData {
                asset_id: ctx.asset.id(),
                project_id: ctx.task.project_id(),
                workflow_id: ctx.task.workflow_id(),
                stage_id: stage.id(),
                status,
                priority: ctx.task.priority(),
                due_date: ctx.task.due_date(),
            },
            &*self.clock,
        )
    }

    /// Raises the data-integrity alert as a side channel of the failure.
    ///
    /// Delivery problems are logged and swallowed: the violation error must
    /// reach the caller regardless of whether operators could be notified.
    async fn raise_integrity_alert(&self, ctx: &PipelineContext, annotation_task: &Task) {
        let task_id = annotation_task.id().to_string();
        let asset_id = ctx.asset.id().to_string();
        let found_status = annotation_task.status().to_string();
        let detail = render_integrity_violation(&IntegrityViolationReport {
            task_id: &task_id,
            asset_id: &asset_id,
            expected: "'completed' or 'vetoed'",
            found_status: &found_status,
            reason: ctx.reason.as_deref(),
        })
        .unwrap_or_else(|_| {
            format!(
                "Annotation task {task_id} for asset {asset_id} is in unexpected status \
                 '{found_status}'."
            )
        });

        let alert = ManagementAlert::new(
            AlertType::DataIntegrityViolation,
            annotation_task.id(),
            ctx.asset.id(),
            ctx.acting_user.clone(),
            "Data integrity violation detected during veto",
            detail,
            &*self.clock,
        )
        .with_extra(json!({
            "vetoed_task_id": ctx.task.id(),
            "found_status": annotation_task.status().as_str(),
            "veto_reason": ctx.reason,
        }));

        if let Err(err) = self.alerts.create_alert(&alert).await {
            tracing::warn!(
                task = %annotation_task.id(),
                asset = %ctx.asset.id(),
                error = %err,
                "failed to deliver data-integrity alert"
            );
        }
    }
}

#[async_trait]
impl<K> PipelineStep for TaskManagementStep<K>
where
    K: Clock + Send + Sync,
{
    async fn execute(&mut self, ctx: &mut PipelineContext) -> StepResult<()> {
        match self.mode {
            ManagementMode::StageAdvance => {
                self.create_or_update_task_for_target_stage(ctx).await
            }
            ManagementMode::Rework => self.update_annotation_task_for_changes(ctx).await,
        }
    }

    async fn rollback(&mut self, ctx: &mut PipelineContext) -> bool {
        // Only a creation is compensated; a status update on an existing
        // task is left in place for a corrective re-run to overwrite.
        let Some(created) = self.created.take() else {
            return true;
        };
        ctx.created_task = None;
        matches!(self.tasks.remove(created).await, Ok(true))
    }

    fn name(&self) -> &'static str {
        "task-management"
    }
}
