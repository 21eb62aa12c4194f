//! Diesel row models for task and asset persistence.

use super::schema::{assets, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Asset the task operates on.
    pub asset_id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Owning workflow.
    pub workflow_id: uuid::Uuid,
    /// Stage the task currently sits at.
    pub stage_id: uuid::Uuid,
    /// Task lifecycle status.
    pub status: String,
    /// Optional assignee identity.
    pub assigned_to: Option<String>,
    /// Optional last-worked-on-by identity.
    pub last_worked_on_by: Option<String>,
    /// Scheduling priority.
    pub priority: String,
    /// Optional deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// Optional completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Optional archival timestamp.
    pub archived_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Asset the task operates on.
    pub asset_id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Owning workflow.
    pub workflow_id: uuid::Uuid,
    /// Stage the task currently sits at.
    pub stage_id: uuid::Uuid,
    /// Task lifecycle status.
    pub status: String,
    /// Optional assignee identity.
    pub assigned_to: Option<String>,
    /// Optional last-worked-on-by identity.
    pub last_worked_on_by: Option<String>,
    /// Scheduling priority.
    pub priority: String,
    /// Optional deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// Optional completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Optional archival timestamp.
    pub archived_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for asset records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = assets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AssetRow {
    /// Asset identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Data source currently holding the asset's file.
    pub current_data_source: uuid::Uuid,
    /// Asset filename.
    pub filename: String,
    /// Asset lifecycle status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for asset records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = assets)]
pub struct NewAssetRow {
    /// Asset identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Data source currently holding the asset's file.
    pub current_data_source: uuid::Uuid,
    /// Asset filename.
    pub filename: String,
    /// Asset lifecycle status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
