//! Graph traversal service implementing the stage resolver port.

use crate::workflow::{
    domain::{StageId, StageType, WorkflowId, WorkflowStage},
    ports::{
        StageResolutionError, StageResolutionResult, WorkflowStageRepository,
        WorkflowStageRepositoryError, WorkflowStageResolver,
    },
};
use async_trait::async_trait;
use std::sync::Arc;

/// Stage resolver backed by a workflow stage repository.
///
/// Traversal follows the default (condition-less) edge out of a stage.
/// Conditional edges are branch-selection data owned by the graph editor and
/// are not consulted here.
#[derive(Clone)]
pub struct WorkflowTopologyService<R>
where
    R: WorkflowStageRepository,
{
    stages: Arc<R>,
}

impl<R> WorkflowTopologyService<R>
where
    R: WorkflowStageRepository,
{
    /// Creates a new topology service over the given stage repository.
    #[must_use]
    pub const fn new(stages: Arc<R>) -> Self {
        Self { stages }
    }
}

fn map_repository_error(err: WorkflowStageRepositoryError) -> StageResolutionError {
    StageResolutionError::resolution(err)
}

#[async_trait]
impl<R> WorkflowStageResolver for WorkflowTopologyService<R>
where
    R: WorkflowStageRepository,
{
    async fn next_stage(
        &self,
        stage_id: StageId,
    ) -> StageResolutionResult<Option<WorkflowStage>> {
        let current = self
            .stages
            .find_by_id(stage_id)
            .await
            .map_err(map_repository_error)?;
        if current.is_none() {
            return Err(StageResolutionError::UnknownStage(stage_id));
        }

        let connections = self
            .stages
            .outgoing_connections(stage_id)
            .await
            .map_err(map_repository_error)?;
        let Some(default_edge) = connections.iter().find(|c| c.is_default()) else {
            return Ok(None);
        };

        let destination = self
            .stages
            .find_by_id(default_edge.to_stage())
            .await
            .map_err(map_repository_error)?;
        destination.map_or(
            Err(StageResolutionError::DanglingConnection {
                connection: default_edge.id(),
                to_stage: default_edge.to_stage(),
            }),
            |stage| Ok(Some(stage)),
        )
    }

    async fn first_annotation_stage(
        &self,
        workflow_id: WorkflowId,
    ) -> StageResolutionResult<Option<WorkflowStage>> {
        let stages = self
            .stages
            .list_by_workflow(workflow_id)
            .await
            .map_err(map_repository_error)?;
        Ok(stages
            .into_iter()
            .filter(|stage| stage.stage_type() == StageType::Annotation)
            .min_by_key(WorkflowStage::order_index))
    }
}
