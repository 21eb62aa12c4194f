//! Repository port for task persistence, lookup, and status writes.

use crate::task::domain::{AssetId, Task, TaskId, TaskStatus, UserId};
use crate::workflow::domain::StageId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task
    /// identifier already exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Removes a task.
    ///
    /// Returns `false` when no task with the identifier existed; callers
    /// performing compensating deletes treat that as rollback failure.
    async fn remove(&self, id: TaskId) -> TaskRepositoryResult<bool>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Finds the most recently updated task for the given asset and stage.
    ///
    /// Returns `None` when the asset has never had a task at the stage.
    async fn find_by_asset_and_stage(
        &self,
        asset_id: AssetId,
        stage_id: StageId,
    ) -> TaskRepositoryResult<Option<Task>>;

    /// Returns every task recorded for the given asset, across all stages
    /// and including historical records.
    async fn list_by_asset(&self, asset_id: AssetId) -> TaskRepositoryResult<Vec<Task>>;

    /// Persists a status write with its bookkeeping and returns the updated
    /// task.
    ///
    /// This is a raw write: transition validation is the caller's concern,
    /// because compensating rollback must be able to cross edges the
    /// interactive state machine forbids.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update_status(
        &self,
        id: TaskId,
        status: TaskStatus,
        acting_user: &UserId,
    ) -> TaskRepositoryResult<Task>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
