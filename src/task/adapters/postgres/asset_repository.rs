//! `PostgreSQL` repository implementation for asset storage.

use super::{
    models::{AssetRow, NewAssetRow},
    repository::TaskPgPool,
    schema::assets,
};
use crate::task::{
    domain::{Asset, AssetId, AssetStatus, PersistedAssetData, ProjectId},
    ports::{AssetRepository, AssetRepositoryError, AssetRepositoryResult},
};
use crate::workflow::domain::DataSourceId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use mockable::Clock;
use std::sync::Arc;

/// `PostgreSQL`-backed asset repository.
#[derive(Clone)]
pub struct PostgresAssetRepository<C>
where
    C: Clock + Send + Sync,
{
    pool: TaskPgPool,
    clock: Arc<C>,
}

impl<C> PostgresAssetRepository<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool, clock: Arc<C>) -> Self {
        Self { pool, clock }
    }

    async fn run_blocking<F, T>(&self, f: F) -> AssetRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> AssetRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(AssetRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(AssetRepositoryError::persistence)?
    }
}

#[async_trait]
impl<C> AssetRepository for PostgresAssetRepository<C>
where
    C: Clock + Send + Sync + 'static,
{
    async fn store(&self, asset: &Asset) -> AssetRepositoryResult<()> {
        let asset_id = asset.id();
        let new_row = NewAssetRow {
            id: asset.id().into_inner(),
            project_id: asset.project_id().into_inner(),
            current_data_source: asset.current_data_source().into_inner(),
            filename: asset.filename().to_owned(),
            status: asset.status().as_str().to_owned(),
            created_at: asset.created_at(),
            updated_at: asset.updated_at(),
        };

        self.run_blocking(move |connection| {
            diesel::insert_into(assets::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        AssetRepositoryError::DuplicateAsset(asset_id)
                    }
                    _ => AssetRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: AssetId) -> AssetRepositoryResult<Option<Asset>> {
        self.run_blocking(move |connection| {
            let row = assets::table
                .filter(assets::id.eq(id.into_inner()))
                .select(AssetRow::as_select())
                .first::<AssetRow>(connection)
                .optional()
                .map_err(AssetRepositoryError::persistence)?;
            row.map(row_to_asset).transpose()
        })
        .await
    }

    async fn set_current_data_source(
        &self,
        id: AssetId,
        data_source: DataSourceId,
    ) -> AssetRepositoryResult<Asset> {
        let clock = Arc::clone(&self.clock);
        self.run_blocking(move |connection| {
            let row = assets::table
                .filter(assets::id.eq(id.into_inner()))
                .select(AssetRow::as_select())
                .first::<AssetRow>(connection)
                .optional()
                .map_err(AssetRepositoryError::persistence)?
                .ok_or(AssetRepositoryError::NotFound(id))?;

            let mut asset = row_to_asset(row)?;
            asset.relocate_to(data_source, &*clock);

            diesel::update(assets::table.filter(assets::id.eq(id.into_inner())))
                .set((
                    assets::current_data_source.eq(asset.current_data_source().into_inner()),
                    assets::status.eq(asset.status().as_str().to_owned()),
                    assets::updated_at.eq(asset.updated_at()),
                ))
                .execute(connection)
                .map_err(AssetRepositoryError::persistence)?;

            Ok(asset)
        })
        .await
    }
}

fn row_to_asset(row: AssetRow) -> AssetRepositoryResult<Asset> {
    let status = AssetStatus::try_from(row.status.as_str())
        .map_err(AssetRepositoryError::persistence)?;
    Ok(Asset::from_persisted(PersistedAssetData {
        id: AssetId::from_uuid(row.id),
        project_id: ProjectId::from_uuid(row.project_id),
        current_data_source: DataSourceId::from_uuid(row.current_data_source),
        filename: row.filename,
        status,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
