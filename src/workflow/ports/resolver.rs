//! Resolver port for workflow graph traversal.
//!
//! The pipeline treats stage lookup as an opaque capability so that graph
//! walking never leaks into step or pipeline code.

use crate::workflow::domain::{ConnectionId, StageId, WorkflowId, WorkflowStage};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for stage resolution operations.
pub type StageResolutionResult<T> = Result<T, StageResolutionError>;

/// Stage lookup contract consumed by the task pipeline.
#[async_trait]
pub trait WorkflowStageResolver: Send + Sync {
    /// Resolves the successor of the given stage along the default edge.
    ///
    /// Returns `None` when the stage has no outgoing default connection,
    /// which marks it as a final stage for pipeline purposes.
    ///
    /// # Errors
    ///
    /// Returns [`StageResolutionError::UnknownStage`] when the stage itself
    /// does not exist.
    async fn next_stage(&self, stage_id: StageId)
    -> StageResolutionResult<Option<WorkflowStage>>;

    /// Resolves the workflow's first annotation stage.
    ///
    /// Returns `None` when the workflow contains no annotation stage.
    async fn first_annotation_stage(
        &self,
        workflow_id: WorkflowId,
    ) -> StageResolutionResult<Option<WorkflowStage>>;
}

/// Errors returned by stage resolver implementations.
#[derive(Debug, Clone, Error)]
pub enum StageResolutionError {
    /// The stage being resolved does not exist.
    #[error("unknown stage: {0}")]
    UnknownStage(StageId),

    /// A connection points at a stage that does not exist.
    #[error("connection {connection} points at missing stage {to_stage}")]
    DanglingConnection {
        /// The edge whose destination is missing.
        connection: ConnectionId,
        /// The missing destination stage.
        to_stage: StageId,
    },

    /// Underlying storage failure during resolution.
    #[error("stage resolution failed: {0}")]
    Resolution(Arc<dyn std::error::Error + Send + Sync>),
}

impl StageResolutionError {
    /// Wraps an underlying resolution failure.
    pub fn resolution(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Resolution(Arc::new(err))
    }
}
