//! In-memory data-source provisioning for pipeline tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::ProjectId,
    ports::{
        DataSourceProvisioningService, ProvisionedDataSources, ProvisioningError,
        ProvisioningResult,
    },
};
use crate::workflow::domain::DataSourceId;

/// Thread-safe in-memory provisioning service.
///
/// Hands out one annotation data source per project, minting a fresh
/// identifier on first request the way real provisioning creates a missing
/// bucket.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvisioningService {
    annotation_sources: Arc<RwLock<HashMap<ProjectId, DataSourceId>>>,
}

impl InMemoryProvisioningService {
    /// Creates an empty provisioning service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-binds a project's annotation data source.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError::Provisioning`] when the state lock is
    /// poisoned.
    pub fn bind_annotation_data_source(
        &self,
        project_id: ProjectId,
        data_source: DataSourceId,
    ) -> ProvisioningResult<()> {
        let mut sources = self.annotation_sources.write().map_err(|err| {
            ProvisioningError::provisioning(std::io::Error::other(err.to_string()))
        })?;
        sources.insert(project_id, data_source);
        Ok(())
    }
}

#[async_trait]
impl DataSourceProvisioningService for InMemoryProvisioningService {
    async fn ensure_required_data_sources(
        &self,
        project_id: ProjectId,
    ) -> ProvisioningResult<ProvisionedDataSources> {
        let mut sources = self.annotation_sources.write().map_err(|err| {
            ProvisioningError::provisioning(std::io::Error::other(err.to_string()))
        })?;
        let annotation_data_source = *sources
            .entry(project_id)
            .or_insert_with(DataSourceId::new);
        Ok(ProvisionedDataSources {
            annotation_data_source,
        })
    }
}
