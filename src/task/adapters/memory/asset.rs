//! In-memory asset repository for pipeline tests.

use async_trait::async_trait;
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Asset, AssetId},
    ports::{AssetRepository, AssetRepositoryError, AssetRepositoryResult},
};
use crate::workflow::domain::DataSourceId;

/// Thread-safe in-memory asset repository.
#[derive(Debug, Clone)]
pub struct InMemoryAssetRepository<C>
where
    C: Clock + Send + Sync,
{
    state: Arc<RwLock<HashMap<AssetId, Asset>>>,
    clock: Arc<C>,
}

impl<C> InMemoryAssetRepository<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty in-memory repository stamping writes with `clock`.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> AssetRepositoryError {
    AssetRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl<C> AssetRepository for InMemoryAssetRepository<C>
where
    C: Clock + Send + Sync,
{
    async fn store(&self, asset: &Asset) -> AssetRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.contains_key(&asset.id()) {
            return Err(AssetRepositoryError::DuplicateAsset(asset.id()));
        }
        state.insert(asset.id(), asset.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: AssetId) -> AssetRepositoryResult<Option<Asset>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.get(&id).cloned())
    }

    async fn set_current_data_source(
        &self,
        id: AssetId,
        data_source: DataSourceId,
    ) -> AssetRepositoryResult<Asset> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let asset = state
            .get_mut(&id)
            .ok_or(AssetRepositoryError::NotFound(id))?;
        asset.relocate_to(data_source, &*self.clock);
        Ok(asset.clone())
    }
}
