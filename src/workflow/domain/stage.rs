//! Workflow stage and stage connection types.

use super::{ConnectionId, DataSourceId, ParseStageTypeError, StageId, WorkflowDomainError,
            WorkflowId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of work performed at a workflow stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageType {
    /// Assets are labelled for the first time or reworked here.
    Annotation,
    /// Completed annotation work is reviewed here.
    Revision,
    /// Reviewed assets receive final sign-off here.
    Completion,
}

impl StageType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Annotation => "annotation",
            Self::Revision => "revision",
            Self::Completion => "completion",
        }
    }
}

impl TryFrom<&str> for StageType {
    type Error = ParseStageTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "annotation" => Ok(Self::Annotation),
            "revision" => Ok(Self::Revision),
            "completion" => Ok(Self::Completion),
            _ => Err(ParseStageTypeError(value.to_owned())),
        }
    }
}

impl fmt::Display for StageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node in a project's workflow graph.
///
/// A stage optionally owns a data source; pure review stages that operate on
/// assets in place leave it unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStage {
    id: StageId,
    workflow_id: WorkflowId,
    name: String,
    stage_type: StageType,
    order_index: u32,
    is_initial: bool,
    is_final: bool,
    data_source: Option<DataSourceId>,
}

impl WorkflowStage {
    /// Creates a new stage with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::EmptyStageName`] when the name is empty
    /// after trimming.
    pub fn new(
        workflow_id: WorkflowId,
        name: impl Into<String>,
        stage_type: StageType,
        order_index: u32,
    ) -> Result<Self, WorkflowDomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(WorkflowDomainError::EmptyStageName);
        }
        Ok(Self {
            id: StageId::new(),
            workflow_id,
            name,
            stage_type,
            order_index,
            is_initial: false,
            is_final: false,
            data_source: None,
        })
    }

    /// Binds a data source to this stage.
    #[must_use]
    pub const fn with_data_source(mut self, data_source: DataSourceId) -> Self {
        self.data_source = Some(data_source);
        self
    }

    /// Marks this stage as the workflow's entry point.
    #[must_use]
    pub const fn marked_initial(mut self) -> Self {
        self.is_initial = true;
        self
    }

    /// Marks this stage as a workflow exit point.
    #[must_use]
    pub const fn marked_final(mut self) -> Self {
        self.is_final = true;
        self
    }

    /// Returns the stage identifier.
    #[must_use]
    pub const fn id(&self) -> StageId {
        self.id
    }

    /// Returns the owning workflow identifier.
    #[must_use]
    pub const fn workflow_id(&self) -> WorkflowId {
        self.workflow_id
    }

    /// Returns the stage display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the kind of work performed at this stage.
    #[must_use]
    pub const fn stage_type(&self) -> StageType {
        self.stage_type
    }

    /// Returns the position of this stage in display order.
    #[must_use]
    pub const fn order_index(&self) -> u32 {
        self.order_index
    }

    /// Returns whether this stage is the workflow entry point.
    #[must_use]
    pub const fn is_initial(&self) -> bool {
        self.is_initial
    }

    /// Returns whether this stage is a workflow exit point.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        self.is_final
    }

    /// Returns the bound data source, if any.
    #[must_use]
    pub const fn data_source(&self) -> Option<DataSourceId> {
        self.data_source
    }
}

/// Parameter object for reconstructing a persisted stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedStageData {
    /// Persisted stage identifier.
    pub id: StageId,
    /// Persisted owning workflow identifier.
    pub workflow_id: WorkflowId,
    /// Persisted display name.
    pub name: String,
    /// Persisted stage type.
    pub stage_type: StageType,
    /// Persisted display-order position.
    pub order_index: u32,
    /// Persisted entry-point flag.
    pub is_initial: bool,
    /// Persisted exit-point flag.
    pub is_final: bool,
    /// Persisted bound data source, if any.
    pub data_source: Option<DataSourceId>,
}

impl WorkflowStage {
    /// Reconstructs a stage from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedStageData) -> Self {
        Self {
            id: data.id,
            workflow_id: data.workflow_id,
            name: data.name,
            stage_type: data.stage_type,
            order_index: data.order_index,
            is_initial: data.is_initial,
            is_final: data.is_final,
            data_source: data.data_source,
        }
    }
}

/// Directed edge between two workflow stages.
///
/// The optional condition selects the edge during conditional branching;
/// an edge without a condition is the default path out of its source stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStageConnection {
    id: ConnectionId,
    workflow_id: WorkflowId,
    from_stage: StageId,
    to_stage: StageId,
    condition: Option<String>,
}

impl WorkflowStageConnection {
    /// Creates a new default (condition-less) connection.
    #[must_use]
    pub fn new(workflow_id: WorkflowId, from_stage: StageId, to_stage: StageId) -> Self {
        Self {
            id: ConnectionId::new(),
            workflow_id,
            from_stage,
            to_stage,
            condition: None,
        }
    }

    /// Attaches a branch-selection condition to this connection.
    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Returns the connection identifier.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// Returns the owning workflow identifier.
    #[must_use]
    pub const fn workflow_id(&self) -> WorkflowId {
        self.workflow_id
    }

    /// Returns the source stage of this edge.
    #[must_use]
    pub const fn from_stage(&self) -> StageId {
        self.from_stage
    }

    /// Returns the destination stage of this edge.
    #[must_use]
    pub const fn to_stage(&self) -> StageId {
        self.to_stage
    }

    /// Returns the branch-selection condition, if any.
    #[must_use]
    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    /// Returns whether this edge is the default path out of its source stage.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.condition.is_none()
    }
}

/// Parameter object for reconstructing a persisted stage connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedConnectionData {
    /// Persisted connection identifier.
    pub id: ConnectionId,
    /// Persisted owning workflow identifier.
    pub workflow_id: WorkflowId,
    /// Persisted source stage.
    pub from_stage: StageId,
    /// Persisted destination stage.
    pub to_stage: StageId,
    /// Persisted branch-selection condition, if any.
    pub condition: Option<String>,
}

impl WorkflowStageConnection {
    /// Reconstructs a connection from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedConnectionData) -> Self {
        Self {
            id: data.id,
            workflow_id: data.workflow_id,
            from_stage: data.from_stage,
            to_stage: data.to_stage,
            condition: data.condition,
        }
    }
}
