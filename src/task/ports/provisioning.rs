//! Provisioning port for project data sources.

use crate::task::domain::ProjectId;
use crate::workflow::domain::DataSourceId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for provisioning operations.
pub type ProvisioningResult<T> = Result<T, ProvisioningError>;

/// Data sources guaranteed to exist for a project after provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionedDataSources {
    /// The project's canonical annotation data source.
    pub annotation_data_source: DataSourceId,
}

/// Data source provisioning contract.
///
/// The veto flow resolves the annotation data source through this port
/// rather than trusting the originating stage, because a veto can arrive
/// from any downstream stage.
#[async_trait]
pub trait DataSourceProvisioningService: Send + Sync {
    /// Ensures the project's required data sources exist, creating any that
    /// are missing, and returns their identifiers.
    async fn ensure_required_data_sources(
        &self,
        project_id: ProjectId,
    ) -> ProvisioningResult<ProvisionedDataSources>;
}

/// Errors returned by provisioning implementations.
#[derive(Debug, Clone, Error)]
pub enum ProvisioningError {
    /// Infrastructure failure while provisioning storage.
    #[error("provisioning error: {0}")]
    Provisioning(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProvisioningError {
    /// Wraps an infrastructure failure.
    pub fn provisioning(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Provisioning(Arc::new(err))
    }
}
