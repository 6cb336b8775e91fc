use std::sync::Arc;

use super::{filename, Asset, UploadLimits};
use crate::asset::{AssetStore, Locator};
use crate::error::ContentError;

/// Sequences an upload's life in the asset store around a record write:
/// [`stage`](Self::stage) before the record links it, then either
/// [`retire`](Self::retire) the asset the record stopped referencing or
/// [`discard`](Self::discard) the staged one if the record write failed.
///
/// Cleanup failures never fail the caller's operation; they leave an orphan
/// that is logged and later removed by [`crate::reconcile`].
#[derive(Clone)]
pub struct UploadCoordinator {
    store: Arc<dyn AssetStore>,
    limits: UploadLimits,
}

impl UploadCoordinator {
    pub fn new(store: Arc<dyn AssetStore>, limits: UploadLimits) -> Self {
        Self { store, limits }
    }

    pub fn store(&self) -> &Arc<dyn AssetStore> {
        &self.store
    }

    pub fn limits(&self) -> UploadLimits {
        self.limits
    }

    /// Validate `asset` and write it durably under a fresh name.
    pub async fn stage(&self, asset: &Asset) -> Result<Locator, ContentError> {
        asset.validate(&self.limits)?;
        let name = filename::generate(&asset.media_type);
        let locator = self.store.put(&name, &asset.bytes).await?;
        tracing::info!(
            %locator,
            bytes = asset.bytes.len(),
            media_type = %asset.media_type,
            original_name = asset.original_name.as_deref().unwrap_or(""),
            "asset staged"
        );
        Ok(locator)
    }

    /// Remove an asset staged for a record write that did not happen.
    pub async fn discard(&self, locator: &Locator) {
        if let Err(err) = self.store.delete(locator).await {
            tracing::warn!(
                %locator,
                error = %err,
                "orphaned asset: record write failed and the staged asset could not be removed"
            );
        }
    }

    /// Remove an asset no record references any more.
    pub async fn retire(&self, locator: &Locator) {
        match self.store.delete(locator).await {
            Ok(()) => tracing::info!(%locator, "asset retired"),
            Err(err) => tracing::warn!(
                %locator,
                error = %err,
                "orphaned asset: record no longer references it but delete failed"
            ),
        }
    }
}
