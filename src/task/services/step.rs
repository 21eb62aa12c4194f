//! Step abstraction and the shared forward/rollback runner.

use super::context::PipelineContext;
use crate::task::ports::{AssetRepositoryError, TaskRepositoryError};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for pipeline step execution.
pub type StepResult<T> = Result<T, StepError>;

/// Failure raised by a pipeline step.
///
/// Every variant except [`StepError::Persistence`] is an expected business
/// failure whose message is surfaced verbatim to the caller; persistence
/// failures propagate out of the owning pipeline as errors once rollback has
/// been attempted.
#[derive(Debug, Clone, Error)]
pub enum StepError {
    /// A required record or resolver target is absent.
    #[error("{0}")]
    NotFound(String),

    /// The context lacks data the operation requires.
    #[error("{0}")]
    Precondition(String),

    /// The task's status does not permit the requested transition.
    #[error("{0}")]
    InvalidState(String),

    /// The relocation collaborator refused the transfer.
    #[error("{0}")]
    TransferFailed(String),

    /// Task or workflow history is inconsistent; an alert has been raised.
    #[error("{0}")]
    DataIntegrity(String),

    /// Underlying store failure.
    #[error("persistence failure: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StepError {
    /// Wraps a persistence failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<TaskRepositoryError> for StepError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(format!("Task {id} not found")),
            TaskRepositoryError::Persistence(source) => Self::Persistence(source),
            other @ TaskRepositoryError::DuplicateTask(_) => Self::persistence(other),
        }
    }
}

impl From<AssetRepositoryError> for StepError {
    fn from(err: AssetRepositoryError) -> Self {
        match err {
            AssetRepositoryError::NotFound(id) => Self::NotFound(format!("Asset {id} not found")),
            AssetRepositoryError::Persistence(source) => Self::Persistence(source),
            other @ AssetRepositoryError::DuplicateAsset(_) => Self::persistence(other),
        }
    }
}

/// One rollback-capable unit of pipeline work.
///
/// Step instances are constructed fresh for every pipeline invocation;
/// rollback bookkeeping lives in per-instance fields and would be corrupted
/// by sharing an instance across concurrent runs.
#[async_trait]
pub trait PipelineStep: Send {
    /// Runs the step's default operation against the context.
    async fn execute(&mut self, ctx: &mut PipelineContext) -> StepResult<()>;

    /// Undoes this step's effects after a later step failed.
    ///
    /// Rollback never propagates: it reports failure by returning `false`
    /// so the owning pipeline can keep unwinding the remaining steps.
    async fn rollback(&mut self, ctx: &mut PipelineContext) -> bool;

    /// Returns the step name used in diagnostics.
    fn name(&self) -> &'static str;
}

/// Runs steps in order, unwinding executed steps in reverse on failure.
///
/// The first failure is returned unchanged; rollback failures are logged and
/// never overwrite it, because operators must see why the forward operation
/// failed rather than why the compensation also did.
pub(crate) async fn run_steps(
    steps: Vec<Box<dyn PipelineStep>>,
    ctx: &mut PipelineContext,
) -> StepResult<()> {
    let mut executed: Vec<Box<dyn PipelineStep>> = Vec::with_capacity(steps.len());
    for mut step in steps {
        if let Err(err) = step.execute(ctx).await {
            for done in executed.iter_mut().rev() {
                if !done.rollback(ctx).await {
                    tracing::warn!(
                        step = done.name(),
                        task = %ctx.task.id(),
                        "rollback failed; manual reconciliation may be required"
                    );
                }
            }
            return Err(err);
        }
        executed.push(step);
    }
    Ok(())
}
