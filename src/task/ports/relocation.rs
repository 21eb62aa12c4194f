//! Relocation port for moving asset storage between data sources.

use crate::task::domain::AssetId;
use crate::workflow::domain::DataSourceId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for asset relocation operations.
pub type RelocationResult<T> = Result<T, RelocationError>;

/// Physical asset relocation contract.
///
/// Implementations move the asset's underlying storage and record the new
/// location on the asset row. A `false` return means the relocation was
/// attempted and refused (missing file, destination unavailable); callers
/// surface that as a transfer failure distinct from infrastructure errors.
#[async_trait]
pub trait AssetRelocationService: Send + Sync {
    /// Moves the asset's storage into the given data source.
    async fn transfer_asset_to_data_source(
        &self,
        asset_id: AssetId,
        data_source: DataSourceId,
    ) -> RelocationResult<bool>;
}

/// Errors returned by relocation implementations.
#[derive(Debug, Clone, Error)]
pub enum RelocationError {
    /// The asset being relocated does not exist.
    #[error("asset not found: {0}")]
    AssetNotFound(AssetId),

    /// Infrastructure failure while moving storage.
    #[error("relocation error: {0}")]
    Relocation(Arc<dyn std::error::Error + Send + Sync>),
}

impl RelocationError {
    /// Wraps an infrastructure failure.
    pub fn relocation(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Relocation(Arc::new(err))
    }
}
