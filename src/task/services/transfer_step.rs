//! Pipeline step relocating the asset between stage data sources.

use super::{
    context::PipelineContext,
    step::{PipelineStep, StepError, StepResult},
};
use crate::task::ports::{
    AssetRelocationService, AssetRepository, DataSourceProvisioningService,
};
use crate::workflow::domain::DataSourceId;
use async_trait::async_trait;
use std::sync::Arc;

/// Message surfaced whenever the relocation collaborator refuses a move.
const TRANSFER_FAILED: &str = "Asset transfer failed";

/// Direction a transfer step is configured for.
enum TransferDirection {
    /// Forward flow into the resolved target stage's data source.
    TargetStage,
    /// Backward flow into the project's canonical annotation data source.
    Annotation,
}

/// Step that physically relocates the asset and can move it back.
///
/// The originating data source is remembered on success so rollback can
/// compensate a transfer once a later step fails.
pub struct AssetTransferStep {
    relocation: Arc<dyn AssetRelocationService>,
    assets: Arc<dyn AssetRepository>,
    provisioning: Option<Arc<dyn DataSourceProvisioningService>>,
    direction: TransferDirection,
    origin: Option<DataSourceId>,
}

impl AssetTransferStep {
    /// Creates a forward transfer step targeting the resolved stage.
    #[must_use]
    pub fn to_target_stage(
        relocation: Arc<dyn AssetRelocationService>,
        assets: Arc<dyn AssetRepository>,
    ) -> Self {
        Self {
            relocation,
            assets,
            provisioning: None,
            direction: TransferDirection::TargetStage,
            origin: None,
        }
    }

    /// Creates a backward transfer step targeting the project's annotation
    /// data source.
    #[must_use]
    pub fn to_annotation(
        relocation: Arc<dyn AssetRelocationService>,
        assets: Arc<dyn AssetRepository>,
        provisioning: Arc<dyn DataSourceProvisioningService>,
    ) -> Self {
        Self {
            relocation,
            assets,
            provisioning: Some(provisioning),
            direction: TransferDirection::Annotation,
            origin: None,
        }
    }

    /// Moves the asset into the resolved target stage's data source.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Precondition`] when the context lacks a target
    /// stage or the stage has no bound data source, and
    /// [`StepError::TransferFailed`] when the relocation collaborator
    /// refuses the move.
    pub async fn transfer_asset(&mut self, ctx: &mut PipelineContext) -> StepResult<()> {
        let target_stage = ctx
            .target_stage
            .as_ref()
            .ok_or_else(|| StepError::Precondition("Target stage is required".to_owned()))?;
        let destination = target_stage.data_source().ok_or_else(|| {
            StepError::Precondition("Target data source is required".to_owned())
        })?;
        self.relocate(ctx, destination).await
    }

    /// Moves the asset back into the project's canonical annotation data
    /// source.
    ///
    /// The destination is resolved through provisioning rather than taken
    /// from the originating stage, because a veto can arrive from any
    /// downstream stage.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::TransferFailed`] when the relocation
    /// collaborator refuses the move.
    pub async fn transfer_asset_to_annotation(
        &mut self,
        ctx: &mut PipelineContext,
    ) -> StepResult<()> {
        let provisioning = self.provisioning.clone().ok_or_else(|| {
            StepError::Precondition(
                "Annotation data source provisioning is not configured".to_owned(),
            )
        })?;
        let provisioned = provisioning
            .ensure_required_data_sources(ctx.asset.project_id())
            .await
            .map_err(StepError::persistence)?;
        self.relocate(ctx, provisioned.annotation_data_source).await
    }

    async fn relocate(
        &mut self,
        ctx: &mut PipelineContext,
        destination: DataSourceId,
    ) -> StepResult<()> {
        let origin = ctx.asset.current_data_source();
        let moved = self
            .relocation
            .transfer_asset_to_data_source(ctx.asset.id(), destination)
            .await
            .map_err(|err| StepError::TransferFailed(format!("{TRANSFER_FAILED}: {err}")))?;
        if !moved {
            return Err(StepError::TransferFailed(TRANSFER_FAILED.to_owned()));
        }

        self.origin = Some(origin);
        let refreshed = self
            .assets
            .find_by_id(ctx.asset.id())
            .await?
            .ok_or_else(|| {
                StepError::persistence(std::io::Error::other(format!(
                    "asset {} disappeared during transfer",
                    ctx.asset.id()
                )))
            })?;
        ctx.asset = refreshed;
        Ok(())
    }
}

#[async_trait]
impl PipelineStep for AssetTransferStep {
    async fn execute(&mut self, ctx: &mut PipelineContext) -> StepResult<()> {
        match self.direction {
            TransferDirection::TargetStage => self.transfer_asset(ctx).await,
            TransferDirection::Annotation => self.transfer_asset_to_annotation(ctx).await,
        }
    }

    async fn rollback(&mut self, ctx: &mut PipelineContext) -> bool {
        let Some(origin) = self.origin.take() else {
            return true;
        };
        match self
            .relocation
            .transfer_asset_to_data_source(ctx.asset.id(), origin)
            .await
        {
            Ok(true) => {
                if let Ok(Some(refreshed)) = self.assets.find_by_id(ctx.asset.id()).await {
                    ctx.asset = refreshed;
                }
                true
            }
            Ok(false) | Err(_) => false,
        }
    }

    fn name(&self) -> &'static str {
        "asset-transfer"
    }
}
