//! Task aggregate root and the task status state machine.

use super::{
    AssetId, ParseTaskPriorityError, ParseTaskStatusError, ProjectId, TaskId, UserId,
};
use crate::workflow::domain::{StageId, StageType, WorkflowId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task exists but no one has picked it up.
    NotStarted,
    /// Asset returned to annotation and is waiting to be picked up.
    ReadyForAnnotation,
    /// Task is being worked on.
    InProgress,
    /// Work at the task's stage finished successfully.
    Completed,
    /// Asset reached a revision stage and is waiting for a reviewer.
    ReadyForReview,
    /// Asset reached a completion stage and is waiting for sign-off.
    ReadyForCompletion,
    /// Work at the task's stage was rejected by a downstream reviewer.
    Vetoed,
    /// Annotation work must be redone following a veto.
    ChangesRequired,
    /// Work is paused by an explicit user action.
    Suspended,
    /// Task left the active workflow permanently.
    Archived,
    /// Work is postponed until a later scheduling decision.
    Deferred,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::ReadyForAnnotation => "ready_for_annotation",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::ReadyForReview => "ready_for_review",
            Self::ReadyForCompletion => "ready_for_completion",
            Self::Vetoed => "vetoed",
            Self::ChangesRequired => "changes_required",
            Self::Suspended => "suspended",
            Self::Archived => "archived",
            Self::Deferred => "deferred",
        }
    }

    /// Returns whether a task in this status counts towards the
    /// one-active-task-per-stage invariant.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(
            self,
            Self::NotStarted
                | Self::ReadyForAnnotation
                | Self::InProgress
                | Self::ReadyForReview
                | Self::ReadyForCompletion
        )
    }

    /// Returns whether this status records finished work kept for history.
    #[must_use]
    pub const fn is_historical(self) -> bool {
        matches!(self, Self::Completed | Self::Vetoed | Self::Archived)
    }

    /// Returns whether no further transitions leave this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Archived)
    }

    /// Returns whether the state machine permits moving to `target`.
    ///
    /// Pipeline writes that deliberately bypass this table (compensating
    /// rollback, stage-advance bookkeeping) go through the repository
    /// directly.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        match self {
            Self::NotStarted
            | Self::ReadyForAnnotation
            | Self::ReadyForReview
            | Self::ReadyForCompletion
            | Self::ChangesRequired => matches!(
                target,
                Self::InProgress | Self::Suspended | Self::Deferred | Self::Archived
            ),
            Self::InProgress => matches!(
                target,
                Self::Completed
                    | Self::Vetoed
                    | Self::Suspended
                    | Self::Deferred
                    | Self::Archived
            ),
            Self::Completed | Self::Vetoed => matches!(
                target,
                Self::ReadyForAnnotation
                    | Self::ReadyForReview
                    | Self::ReadyForCompletion
                    | Self::ChangesRequired
                    | Self::Archived
            ),
            Self::Suspended => {
                matches!(target, Self::InProgress | Self::Deferred | Self::Archived)
            }
            Self::Deferred => {
                matches!(target, Self::InProgress | Self::Suspended | Self::Archived)
            }
            Self::Archived => false,
        }
    }

    /// Returns the waiting status a task takes when its asset arrives at a
    /// stage of the given type.
    #[must_use]
    pub const fn ready_for(stage_type: StageType) -> Self {
        match stage_type {
            StageType::Annotation => Self::ReadyForAnnotation,
            StageType::Revision => Self::ReadyForReview,
            StageType::Completion => Self::ReadyForCompletion,
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "not_started" => Ok(Self::NotStarted),
            "ready_for_annotation" => Ok(Self::ReadyForAnnotation),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "ready_for_review" => Ok(Self::ReadyForReview),
            "ready_for_completion" => Ok(Self::ReadyForCompletion),
            "vetoed" => Ok(Self::Vetoed),
            "changes_required" => Ok(Self::ChangesRequired),
            "suspended" => Ok(Self::Suspended),
            "archived" => Ok(Self::Archived),
            "deferred" => Ok(Self::Deferred),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduling priority of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Work on when nothing else is queued.
    Low,
    /// Regular scheduling.
    Medium,
    /// Work on before medium and low priority tasks.
    High,
    /// Work on immediately.
    Urgent,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(ParseTaskPriorityError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields required to create a task when an asset becomes eligible for a
/// stage, either at import or on pipeline advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    /// Asset the task operates on.
    pub asset_id: AssetId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Owning workflow.
    pub workflow_id: WorkflowId,
    /// Stage the task sits at.
    pub stage_id: StageId,
    /// Status the task starts in.
    pub status: TaskStatus,
    /// Scheduling priority.
    pub priority: TaskPriority,
    /// Optional deadline.
    pub due_date: Option<DateTime<Utc>>,
}

/// Task aggregate root: one unit of work binding an asset to a workflow
/// stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    asset_id: AssetId,
    project_id: ProjectId,
    workflow_id: WorkflowId,
    stage_id: StageId,
    status: TaskStatus,
    assigned_to: Option<UserId>,
    last_worked_on_by: Option<UserId>,
    priority: TaskPriority,
    due_date: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    archived_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted asset reference.
    pub asset_id: AssetId,
    /// Persisted project reference.
    pub project_id: ProjectId,
    /// Persisted workflow reference.
    pub workflow_id: WorkflowId,
    /// Persisted current-stage reference.
    pub stage_id: StageId,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted assignee, if any.
    pub assigned_to: Option<UserId>,
    /// Persisted last-worked-on-by identity, if any.
    pub last_worked_on_by: Option<UserId>,
    /// Persisted scheduling priority.
    pub priority: TaskPriority,
    /// Persisted deadline, if any.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted completion timestamp, if any.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted archival timestamp, if any.
    pub archived_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new unassigned task at a stage.
    #[must_use]
    pub fn new(data: NewTaskData, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            asset_id: data.asset_id,
            project_id: data.project_id,
            workflow_id: data.workflow_id,
            stage_id: data.stage_id,
            status: data.status,
            assigned_to: None,
            last_worked_on_by: None,
            priority: data.priority,
            due_date: data.due_date,
            completed_at: None,
            archived_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            asset_id: data.asset_id,
            project_id: data.project_id,
            workflow_id: data.workflow_id,
            stage_id: data.stage_id,
            status: data.status,
            assigned_to: data.assigned_to,
            last_worked_on_by: data.last_worked_on_by,
            priority: data.priority,
            due_date: data.due_date,
            completed_at: data.completed_at,
            archived_at: data.archived_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the asset the task operates on.
    #[must_use]
    pub const fn asset_id(&self) -> AssetId {
        self.asset_id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the owning workflow.
    #[must_use]
    pub const fn workflow_id(&self) -> WorkflowId {
        self.workflow_id
    }

    /// Returns the stage the task currently sits at.
    #[must_use]
    pub const fn stage_id(&self) -> StageId {
        self.stage_id
    }

    /// Returns the task lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<&UserId> {
        self.assigned_to.as_ref()
    }

    /// Returns the identity that last mutated the task's status, if any.
    #[must_use]
    pub const fn last_worked_on_by(&self) -> Option<&UserId> {
        self.last_worked_on_by.as_ref()
    }

    /// Returns the scheduling priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns when the task was completed, if it has been.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns when the task was archived, if it has been.
    #[must_use]
    pub const fn archived_at(&self) -> Option<DateTime<Utc>> {
        self.archived_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Assigns the task to a user.
    pub fn assign(&mut self, user: UserId, clock: &impl Clock) {
        self.assigned_to = Some(user);
        self.touch(clock);
    }

    /// Applies a status write with its bookkeeping.
    ///
    /// This is the raw persistence-facing mutation: it does not consult
    /// [`TaskStatus::can_transition_to`], because compensating rollback and
    /// stage-advance writes legitimately cross edges the interactive state
    /// machine forbids. Callers own transition validation.
    ///
    /// The completion and archival timestamps mirror the status so that a
    /// rolled-back completion does not leave a stale `completed_at` behind.
    pub fn apply_status(&mut self, status: TaskStatus, acting_user: &UserId, clock: &impl Clock) {
        self.status = status;
        self.last_worked_on_by = Some(acting_user.clone());
        self.completed_at = match status {
            TaskStatus::Completed => Some(clock.utc()),
            _ => None,
        };
        self.archived_at = match status {
            TaskStatus::Archived => Some(clock.utc()),
            _ => None,
        };
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
