//! Repository port for workflow stage and connection persistence.

use crate::workflow::domain::{
    ConnectionId, StageId, WorkflowId, WorkflowStage, WorkflowStageConnection,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for workflow stage repository operations.
pub type WorkflowStageRepositoryResult<T> = Result<T, WorkflowStageRepositoryError>;

/// Workflow graph persistence contract.
#[async_trait]
pub trait WorkflowStageRepository: Send + Sync {
    /// Stores a new stage.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowStageRepositoryError::DuplicateStage`] when the
    /// stage identifier already exists.
    async fn store_stage(&self, stage: &WorkflowStage) -> WorkflowStageRepositoryResult<()>;

    /// Stores a new connection between two stages.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowStageRepositoryError::DuplicateConnection`] when the
    /// connection identifier already exists.
    async fn store_connection(
        &self,
        connection: &WorkflowStageConnection,
    ) -> WorkflowStageRepositoryResult<()>;

    /// Finds a stage by identifier.
    ///
    /// Returns `None` when the stage does not exist.
    async fn find_by_id(&self, id: StageId) -> WorkflowStageRepositoryResult<Option<WorkflowStage>>;

    /// Returns all stages belonging to the given workflow.
    async fn list_by_workflow(
        &self,
        workflow_id: WorkflowId,
    ) -> WorkflowStageRepositoryResult<Vec<WorkflowStage>>;

    /// Returns the connections leaving the given stage.
    async fn outgoing_connections(
        &self,
        stage_id: StageId,
    ) -> WorkflowStageRepositoryResult<Vec<WorkflowStageConnection>>;
}

/// Errors returned by workflow stage repository implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkflowStageRepositoryError {
    /// A stage with the same identifier already exists.
    #[error("duplicate stage identifier: {0}")]
    DuplicateStage(StageId),

    /// A connection with the same identifier already exists.
    #[error("duplicate connection identifier: {0}")]
    DuplicateConnection(ConnectionId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkflowStageRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
