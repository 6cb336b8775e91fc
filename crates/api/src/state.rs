use std::sync::Arc;

use studio_core::asset::AssetStore;
use studio_core::repository::ContentRepository;
use studio_core::upload::{UploadCoordinator, UploadLimits};
use studio_core::ContentGateway;

use crate::config::AppConfig;

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    gateway: ContentGateway,
    config: AppConfig,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        repository: Arc<dyn ContentRepository>,
        store: Arc<dyn AssetStore>,
    ) -> Self {
        let uploads = UploadCoordinator::new(store, UploadLimits::new(config.max_upload_bytes));
        Self {
            inner: Arc::new(InnerState {
                gateway: ContentGateway::new(repository, uploads),
                config,
            }),
        }
    }

    pub fn gateway(&self) -> &ContentGateway {
        &self.inner.gateway
    }

    pub fn repository(&self) -> &Arc<dyn ContentRepository> {
        self.inner.gateway.repository()
    }

    pub fn store(&self) -> &Arc<dyn AssetStore> {
        self.inner.gateway.uploads().store()
    }

    pub fn limits(&self) -> UploadLimits {
        self.inner.gateway.uploads().limits()
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }
}
