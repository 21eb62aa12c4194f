//! Diesel row models for workflow graph persistence.

use super::schema::{stage_connections, workflow_stages};
use diesel::prelude::*;

/// Query result row for workflow stage records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = workflow_stages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StageRow {
    /// Stage identifier.
    pub id: uuid::Uuid,
    /// Owning workflow identifier.
    pub workflow_id: uuid::Uuid,
    /// Stage display name.
    pub name: String,
    /// Kind of work performed at the stage.
    pub stage_type: String,
    /// Display-order position within the workflow.
    pub order_index: i32,
    /// Whether the stage is the workflow entry point.
    pub is_initial: bool,
    /// Whether the stage is a workflow exit point.
    pub is_final: bool,
    /// Optional bound data source.
    pub data_source_id: Option<uuid::Uuid>,
}

/// Insert model for workflow stage records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = workflow_stages)]
pub struct NewStageRow {
    /// Stage identifier.
    pub id: uuid::Uuid,
    /// Owning workflow identifier.
    pub workflow_id: uuid::Uuid,
    /// Stage display name.
    pub name: String,
    /// Kind of work performed at the stage.
    pub stage_type: String,
    /// Display-order position within the workflow.
    pub order_index: i32,
    /// Whether the stage is the workflow entry point.
    pub is_initial: bool,
    /// Whether the stage is a workflow exit point.
    pub is_final: bool,
    /// Optional bound data source.
    pub data_source_id: Option<uuid::Uuid>,
}

/// Query result row for stage connection records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = stage_connections)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ConnectionRow {
    /// Connection identifier.
    pub id: uuid::Uuid,
    /// Owning workflow identifier.
    pub workflow_id: uuid::Uuid,
    /// Source stage of the edge.
    pub from_stage: uuid::Uuid,
    /// Destination stage of the edge.
    pub to_stage: uuid::Uuid,
    /// Optional branch-selection condition.
    pub condition: Option<String>,
}

/// Insert model for stage connection records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = stage_connections)]
pub struct NewConnectionRow {
    /// Connection identifier.
    pub id: uuid::Uuid,
    /// Owning workflow identifier.
    pub workflow_id: uuid::Uuid,
    /// Source stage of the edge.
    pub from_stage: uuid::Uuid,
    /// Destination stage of the edge.
    pub to_stage: uuid::Uuid,
    /// Optional branch-selection condition.
    pub condition: Option<String>,
}
