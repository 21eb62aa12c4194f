//! Domain model for task and asset lifecycle management.
//!
//! The task domain models units of work binding assets to workflow stages,
//! the task status state machine the pipeline drives, and the asset record
//! whose data-source location the pipeline relocates. Infrastructure
//! concerns stay outside the domain boundary.

mod asset;
mod error;
mod ids;
mod task;

pub use asset::{Asset, AssetStatus, PersistedAssetData};
pub use error::{
    ParseAssetStatusError, ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError,
};
pub use ids::{AssetId, ProjectId, TaskId, UserId};
pub use task::{NewTaskData, PersistedTaskData, Task, TaskPriority, TaskStatus};
