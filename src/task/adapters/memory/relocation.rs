//! In-memory relocation adapter recording moves on the asset row only.

use async_trait::async_trait;
use std::sync::Arc;

use crate::task::{
    domain::AssetId,
    ports::{
        AssetRelocationService, AssetRepository, AssetRepositoryError, RelocationError,
        RelocationResult,
    },
};
use crate::workflow::domain::DataSourceId;

/// Relocation adapter for environments without physical storage.
///
/// Moves are recorded on the asset row through the wrapped repository;
/// there are no files to fail on, so the adapter only refuses when the
/// asset itself is missing.
#[derive(Debug, Clone)]
pub struct InMemoryAssetRelocationService<A>
where
    A: AssetRepository,
{
    assets: Arc<A>,
}

impl<A> InMemoryAssetRelocationService<A>
where
    A: AssetRepository,
{
    /// Creates a relocation adapter over the given asset repository.
    #[must_use]
    pub const fn new(assets: Arc<A>) -> Self {
        Self { assets }
    }
}

#[async_trait]
impl<A> AssetRelocationService for InMemoryAssetRelocationService<A>
where
    A: AssetRepository,
{
    async fn transfer_asset_to_data_source(
        &self,
        asset_id: AssetId,
        data_source: DataSourceId,
    ) -> RelocationResult<bool> {
        match self
            .assets
            .set_current_data_source(asset_id, data_source)
            .await
        {
            Ok(_) => Ok(true),
            Err(AssetRepositoryError::NotFound(id)) => Err(RelocationError::AssetNotFound(id)),
            Err(err) => Err(RelocationError::relocation(err)),
        }
    }
}
