//! Domain model for workflow graphs.
//!
//! A workflow is a directed graph of stages through which assets move while
//! being annotated, reviewed, and signed off. The domain keeps graph shape
//! and stage metadata; traversal lives in the topology service and
//! persistence in the adapters.

mod error;
mod ids;
mod stage;

pub use error::{ParseStageTypeError, WorkflowDomainError};
pub use ids::{ConnectionId, DataSourceId, StageId, WorkflowId};
pub use stage::{
    PersistedConnectionData, PersistedStageData, StageType, WorkflowStage,
    WorkflowStageConnection,
};
