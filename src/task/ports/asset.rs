//! Repository port for asset persistence and location writes.

use crate::task::domain::{Asset, AssetId};
use crate::workflow::domain::DataSourceId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for asset repository operations.
pub type AssetRepositoryResult<T> = Result<T, AssetRepositoryError>;

/// Asset persistence contract.
#[async_trait]
pub trait AssetRepository: Send + Sync {
    /// Stores a new asset.
    ///
    /// # Errors
    ///
    /// Returns [`AssetRepositoryError::DuplicateAsset`] when the asset
    /// identifier already exists.
    async fn store(&self, asset: &Asset) -> AssetRepositoryResult<()>;

    /// Finds an asset by identifier.
    ///
    /// Returns `None` when the asset does not exist.
    async fn find_by_id(&self, id: AssetId) -> AssetRepositoryResult<Option<Asset>>;

    /// Records the asset's move to another data source and returns the
    /// updated asset.
    ///
    /// # Errors
    ///
    /// Returns [`AssetRepositoryError::NotFound`] when the asset does not
    /// exist.
    async fn set_current_data_source(
        &self,
        id: AssetId,
        data_source: DataSourceId,
    ) -> AssetRepositoryResult<Asset>;
}

/// Errors returned by asset repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AssetRepositoryError {
    /// An asset with the same identifier already exists.
    #[error("duplicate asset identifier: {0}")]
    DuplicateAsset(AssetId),

    /// The asset was not found.
    #[error("asset not found: {0}")]
    NotFound(AssetId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AssetRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
