//! `PostgreSQL` adapters for workflow graph persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresWorkflowStageRepository, WorkflowPgPool};
