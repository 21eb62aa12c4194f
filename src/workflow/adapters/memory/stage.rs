//! In-memory repository for workflow graph tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::workflow::{
    domain::{ConnectionId, StageId, WorkflowId, WorkflowStage, WorkflowStageConnection},
    ports::{
        WorkflowStageRepository, WorkflowStageRepositoryError, WorkflowStageRepositoryResult,
    },
};

/// Thread-safe in-memory workflow stage repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkflowStageRepository {
    state: Arc<RwLock<InMemoryGraphState>>,
}

#[derive(Debug, Default)]
struct InMemoryGraphState {
    stages: HashMap<StageId, WorkflowStage>,
    connections: HashMap<ConnectionId, WorkflowStageConnection>,
}

impl InMemoryWorkflowStageRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkflowStageRepository for InMemoryWorkflowStageRepository {
    async fn store_stage(&self, stage: &WorkflowStage) -> WorkflowStageRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            WorkflowStageRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.stages.contains_key(&stage.id()) {
            return Err(WorkflowStageRepositoryError::DuplicateStage(stage.id()));
        }
        state.stages.insert(stage.id(), stage.clone());
        Ok(())
    }

    async fn store_connection(
        &self,
        connection: &WorkflowStageConnection,
    ) -> WorkflowStageRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            WorkflowStageRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.connections.contains_key(&connection.id()) {
            return Err(WorkflowStageRepositoryError::DuplicateConnection(
                connection.id(),
            ));
        }
        state.connections.insert(connection.id(), connection.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: StageId,
    ) -> WorkflowStageRepositoryResult<Option<WorkflowStage>> {
        let state = self.state.read().map_err(|err| {
            WorkflowStageRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.stages.get(&id).cloned())
    }

    async fn list_by_workflow(
        &self,
        workflow_id: WorkflowId,
    ) -> WorkflowStageRepositoryResult<Vec<WorkflowStage>> {
        let state = self.state.read().map_err(|err| {
            WorkflowStageRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .stages
            .values()
            .filter(|stage| stage.workflow_id() == workflow_id)
            .cloned()
            .collect())
    }

    async fn outgoing_connections(
        &self,
        stage_id: StageId,
    ) -> WorkflowStageRepositoryResult<Vec<WorkflowStageConnection>> {
        let state = self.state.read().map_err(|err| {
            WorkflowStageRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .connections
            .values()
            .filter(|connection| connection.from_stage() == stage_id)
            .cloned()
            .collect())
    }
}
