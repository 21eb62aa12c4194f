//! Per-invocation carrier of pipeline state.

use crate::task::domain::{Asset, Task, UserId};
use crate::workflow::domain::WorkflowStage;

/// Mutable state threaded through one pipeline invocation.
///
/// The context is rebuilt for every invocation and progressively updated as
/// steps execute, so each step and each rollback observes the latest task
/// and asset snapshots left by its predecessors. It carries no concurrency
/// control: a context belongs to exactly one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    /// Task the pipeline is acting on; refreshed after every status write.
    pub task: Task,
    /// Asset bound to the task; refreshed after every relocation.
    pub asset: Asset,
    /// Stage the task sat at when the pipeline was invoked.
    pub current_stage: WorkflowStage,
    /// Identity performing the action.
    pub acting_user: UserId,
    /// Resolved destination stage for forward flow, when one exists.
    pub target_stage: Option<WorkflowStage>,
    /// Reviewer-supplied reason, set on veto invocations.
    pub reason: Option<String>,
    /// Task created by the management step, surfaced in the result.
    pub created_task: Option<Task>,
}

impl PipelineContext {
    /// Creates a context for one pipeline invocation.
    #[must_use]
    pub const fn new(
        task: Task,
        asset: Asset,
        current_stage: WorkflowStage,
        acting_user: UserId,
    ) -> Self {
        Self {
            task,
            asset,
            current_stage,
            acting_user,
            target_stage: None,
            reason: None,
            created_task: None,
        }
    }

    /// Attaches the resolved destination stage.
    #[must_use]
    pub fn with_target_stage(mut self, stage: WorkflowStage) -> Self {
        self.target_stage = Some(stage);
        self
    }

    /// Attaches a reviewer-supplied reason.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}
