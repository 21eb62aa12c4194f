//! Asset aggregate: the labelled resource that moves through the workflow.

use super::{AssetId, ParseAssetStatusError, ProjectId, TaskDomainError};
use crate::workflow::domain::DataSourceId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an asset within its project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    /// Asset has been imported and not yet entered the workflow.
    Imported,
    /// Asset is moving through workflow stages.
    InWorkflow,
    /// Asset passed its final stage.
    Finalised,
}

impl AssetStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Imported => "imported",
            Self::InWorkflow => "in_workflow",
            Self::Finalised => "finalised",
        }
    }
}

impl TryFrom<&str> for AssetStatus {
    type Error = ParseAssetStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "imported" => Ok(Self::Imported),
            "in_workflow" => Ok(Self::InWorkflow),
            "finalised" => Ok(Self::Finalised),
            _ => Err(ParseAssetStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asset aggregate root.
///
/// The asset row exclusively owns its current data source; outside of
/// import, the pipeline is the only actor that moves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    id: AssetId,
    project_id: ProjectId,
    current_data_source: DataSourceId,
    filename: String,
    status: AssetStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted asset aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAssetData {
    /// Persisted asset identifier.
    pub id: AssetId,
    /// Persisted owning project.
    pub project_id: ProjectId,
    /// Persisted current data source.
    pub current_data_source: DataSourceId,
    /// Persisted filename.
    pub filename: String,
    /// Persisted lifecycle status.
    pub status: AssetStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    /// Creates a newly imported asset sitting in the given data source.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyFilename`] when the filename is empty
    /// after trimming.
    pub fn import(
        project_id: ProjectId,
        data_source: DataSourceId,
        filename: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let filename = filename.into();
        if filename.trim().is_empty() {
            return Err(TaskDomainError::EmptyFilename);
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: AssetId::new(),
            project_id,
            current_data_source: data_source,
            filename,
            status: AssetStatus::Imported,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs an asset from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAssetData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            current_data_source: data.current_data_source,
            filename: data.filename,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the asset identifier.
    #[must_use]
    pub const fn id(&self) -> AssetId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the data source currently holding the asset's file.
    #[must_use]
    pub const fn current_data_source(&self) -> DataSourceId {
        self.current_data_source
    }

    /// Returns the asset filename.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Returns the asset lifecycle status.
    #[must_use]
    pub const fn status(&self) -> AssetStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Records a relocation to another data source.
    pub fn relocate_to(&mut self, data_source: DataSourceId, clock: &impl Clock) {
        self.current_data_source = data_source;
        self.status = AssetStatus::InWorkflow;
        self.updated_at = clock.utc();
    }
}
