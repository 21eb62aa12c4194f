//! Port contracts for task lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by the pipeline
//! services: task and asset persistence, physical asset relocation, and
//! data-source provisioning.

pub mod asset;
pub mod provisioning;
pub mod relocation;
pub mod repository;

pub use asset::{AssetRepository, AssetRepositoryError, AssetRepositoryResult};
pub use provisioning::{
    DataSourceProvisioningService, ProvisionedDataSources, ProvisioningError, ProvisioningResult,
};
pub use relocation::{AssetRelocationService, RelocationError, RelocationResult};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
