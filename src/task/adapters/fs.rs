//! Filesystem relocation adapter over capability-scoped directories.

use async_trait::async_trait;
use cap_std::fs_utf8::Dir;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::AssetId,
    ports::{
        AssetRelocationService, AssetRepository, AssetRepositoryError, RelocationError,
        RelocationResult,
    },
};
use crate::workflow::domain::DataSourceId;

/// Relocation adapter moving asset files between data-source directories.
///
/// Each data source is registered as a capability-scoped directory handle,
/// so relocation can only ever touch storage that was explicitly granted.
/// A move renames the asset's file from the current data source's directory
/// into the target's, then records the new location on the asset row.
pub struct FsAssetRelocationService<A>
where
    A: AssetRepository,
{
    assets: Arc<A>,
    roots: RwLock<HashMap<DataSourceId, Dir>>,
}

impl<A> FsAssetRelocationService<A>
where
    A: AssetRepository,
{
    /// Creates a relocation service with no registered data sources.
    #[must_use]
    pub fn new(assets: Arc<A>) -> Self {
        Self {
            assets,
            roots: RwLock::new(HashMap::new()),
        }
    }

    /// Registers the directory backing a data source.
    ///
    /// # Errors
    ///
    /// Returns [`RelocationError::Relocation`] when the registry lock is
    /// poisoned.
    pub fn register_data_source(
        &self,
        data_source: DataSourceId,
        root: Dir,
    ) -> RelocationResult<()> {
        let mut roots = self
            .roots
            .write()
            .map_err(|err| RelocationError::relocation(std::io::Error::other(err.to_string())))?;
        roots.insert(data_source, root);
        Ok(())
    }

    /// Moves `filename` between two registered data sources.
    ///
    /// Returns `false` when either data source has no registered directory
    /// or the file is absent from the source directory.
    fn move_file(
        &self,
        from: DataSourceId,
        to: DataSourceId,
        filename: &str,
    ) -> RelocationResult<bool> {
        let roots = self
            .roots
            .read()
            .map_err(|err| RelocationError::relocation(std::io::Error::other(err.to_string())))?;
        let (Some(source_root), Some(target_root)) = (roots.get(&from), roots.get(&to)) else {
            return Ok(false);
        };
        match source_root.rename(filename, target_root, filename) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(RelocationError::relocation(err)),
        }
    }
}

#[async_trait]
impl<A> AssetRelocationService for FsAssetRelocationService<A>
where
    A: AssetRepository,
{
    async fn transfer_asset_to_data_source(
        &self,
        asset_id: AssetId,
        data_source: DataSourceId,
    ) -> RelocationResult<bool> {
        let asset = self
            .assets
            .find_by_id(asset_id)
            .await
            .map_err(RelocationError::relocation)?
            .ok_or(RelocationError::AssetNotFound(asset_id))?;

        if asset.current_data_source() == data_source {
            return Ok(true);
        }

        if !self.move_file(asset.current_data_source(), data_source, asset.filename())? {
            return Ok(false);
        }

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
