//! Incoming image payloads and their path into the asset store.

pub mod coordinator;
pub mod filename;
pub mod media;

pub use coordinator::UploadCoordinator;

use crate::record::ValidationError;

/// Default ceiling on an uploaded image.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// A decoded binary upload. `original_name` is kept for logs only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub bytes: Vec<u8>,
    pub media_type: String,
    pub original_name: Option<String>,
}

impl Asset {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
            original_name: None,
        }
    }

    pub fn with_original_name(mut self, name: impl Into<String>) -> Self {
        self.original_name = Some(name.into());
        self
    }

    pub fn validate(&self, limits: &UploadLimits) -> Result<(), ValidationError> {
        if !media::is_image(&self.media_type) {
            return Err(ValidationError::UnsupportedMediaType {
                media_type: self.media_type.clone(),
            });
        }
        if self.bytes.is_empty() {
            return Err(ValidationError::EmptyAsset);
        }
        limits.check_size(self.bytes.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_bytes: usize,
}

impl UploadLimits {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// Checked while a payload is still streaming in, as well as once complete.
    pub fn check_size(&self, size: usize) -> Result<(), ValidationError> {
        if size > self.max_bytes {
            Err(ValidationError::AssetTooLarge {
                limit: self.max_bytes,
            })
        } else {
            Ok(())
        }
    }
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UPLOAD_BYTES)
    }
}
