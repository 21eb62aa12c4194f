//! `PostgreSQL` adapters for task and asset persistence.

mod asset_repository;
mod models;
mod repository;
mod schema;

pub use asset_repository::PostgresAssetRepository;
pub use repository::{PostgresTaskRepository, TaskPgPool};
