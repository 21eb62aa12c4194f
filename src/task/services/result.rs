//! Pipeline outcome and infrastructure error types.

use crate::task::domain::Task;
use crate::task::ports::{AssetRepositoryError, TaskRepositoryError};
use crate::workflow::ports::{StageResolutionError, WorkflowStageRepositoryError};
use std::sync::Arc;
use thiserror::Error;

/// Business-level outcome of one pipeline invocation.
///
/// Expected failures (missing records, invalid states, refused transfers,
/// integrity violations) are encoded as unsuccessful results carrying the
/// originating message; they never surface as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineResult {
    is_success: bool,
    updated_task: Option<Task>,
    created_task: Option<Task>,
    error_message: Option<String>,
}

impl PipelineResult {
    /// Creates a successful result.
    #[must_use]
    pub const fn success(updated_task: Task, created_task: Option<Task>) -> Self {
        Self {
            is_success: true,
            updated_task: Some(updated_task),
            created_task,
            error_message: None,
        }
    }

    /// Creates a failed result carrying the originating message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            updated_task: None,
            created_task: None,
            error_message: Some(message.into()),
        }
    }

    /// Returns whether the invocation succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.is_success
    }

    /// Returns the acted-on task's post-pipeline snapshot.
    #[must_use]
    pub const fn updated_task(&self) -> Option<&Task> {
        self.updated_task.as_ref()
    }

    /// Returns the successor or rework task the pipeline created, if any.
    #[must_use]
    pub const fn created_task(&self) -> Option<&Task> {
        self.created_task.as_ref()
    }

    /// Returns the failure message, if the invocation failed.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

/// Infrastructure failure escaping a pipeline invocation.
///
/// Raised only after rollback of already-executed steps has been attempted.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// Underlying store or collaborator failure.
    #[error("persistence failure: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl PipelineError {
    /// Wraps an infrastructure failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Result type for pipeline invocations.
pub type PipelineExecutionResult = Result<PipelineResult, PipelineError>;

impl From<TaskRepositoryError> for PipelineError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::Persistence(source) => Self::Persistence(source),
            other => Self::persistence(other),
        }
    }
}

impl From<AssetRepositoryError> for PipelineError {
    fn from(err: AssetRepositoryError) -> Self {
        match err {
            AssetRepositoryError::Persistence(source) => Self::Persistence(source),
            other => Self::persistence(other),
        }
    }
}

impl From<WorkflowStageRepositoryError> for PipelineError {
    fn from(err: WorkflowStageRepositoryError) -> Self {
        match err {
            WorkflowStageRepositoryError::Persistence(source) => Self::Persistence(source),
            other => Self::persistence(other),
        }
    }
}

impl From<StageResolutionError> for PipelineError {
    fn from(err: StageResolutionError) -> Self {
        match err {
            StageResolutionError::Resolution(source) => Self::Persistence(source),
            other => Self::persistence(other),
        }
    }
}
