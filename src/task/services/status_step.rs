//! Pipeline step persisting task status transitions.

use super::{
    context::PipelineContext,
    step::{PipelineStep, StepError, StepResult},
};
use crate::task::{
    domain::{TaskId, TaskStatus},
    ports::TaskRepository,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Step that writes the task's new status and can restore the old one.
///
/// The previous status is remembered per task identity so rollback can
/// re-apply it through the repository's raw write path, which deliberately
/// skips transition validation.
pub struct TaskStatusUpdateStep {
    tasks: Arc<dyn TaskRepository>,
    target: TaskStatus,
    previous: HashMap<TaskId, TaskStatus>,
}

impl TaskStatusUpdateStep {
    /// Creates a status step whose default operation applies
    /// [`TaskStatus::Completed`].
    #[must_use]
    pub fn new(tasks: Arc<dyn TaskRepository>) -> Self {
        Self {
            tasks,
            target: TaskStatus::Completed,
            previous: HashMap::new(),
        }
    }

    /// Overrides the status the default operation applies.
    #[must_use]
    pub fn with_target(mut self, target: TaskStatus) -> Self {
        self.target = target;
        self
    }

    /// Persists `target` as the context task's status.
    ///
    /// The context task is refreshed with the stored snapshot so later steps
    /// observe the write.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::InvalidState`] when the state machine forbids
    /// the transition and [`StepError::Persistence`] when the store write
    /// fails.
    pub async fn update_status(
        &mut self,
        ctx: &mut PipelineContext,
        target: TaskStatus,
    ) -> StepResult<()> {
        let current = ctx.task.status();
        if !current.can_transition_to(target) {
            return Err(StepError::InvalidState(format!(
                "Task {} cannot move from '{current}' to '{target}'",
                ctx.task.id()
            )));
        }

        let updated = self
            .tasks
            .update_status(ctx.task.id(), target, &ctx.acting_user)
            .await?;
        self.previous.insert(ctx.task.id(), current);
        ctx.task = updated;
        Ok(())
    }
}

#[async_trait]
impl PipelineStep for TaskStatusUpdateStep {
    async fn execute(&mut self, ctx: &mut PipelineContext) -> StepResult<()> {
        let target = self.target;
        self.update_status(ctx, target).await
    }

    async fn rollback(&mut self, ctx: &mut PipelineContext) -> bool {
        let Some(previous) = self.previous.remove(&ctx.task.id()) else {
            return true;
        };
        match self
            .tasks
            .update_status(ctx.task.id(), previous, &ctx.acting_user)
            .await
        {
            Ok(restored) => {
                ctx.task = restored;
                true
            }
            Err(_) => false,
        }
    }

    fn name(&self) -> &'static str {
        "task-status-update"
    }
}
