//! Durable storage for uploaded images.
//!
//! Callers only ever see [`Locator`]s. How a locator maps onto bytes is the
//! backend's business, so a local directory and an object store are
//! interchangeable behind [`AssetStore`].

pub mod local;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use local::LocalAssetStore;

/// Opaque reference to a stored asset, e.g. `/uploads/1718000000000-ab12cd34ef.jpg`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    pub fn new(value: impl Into<String>) -> Self {
        Locator(value.into())
    }

    /// Placeholder held by an image-bearing body before its upload is attached.
    pub fn unset() -> Self {
        Locator(String::new())
    }

    pub fn is_unset(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path segment, if it is a valid asset name. Independent of the
    /// prefix the locator was issued under.
    pub fn asset_name(&self) -> Option<&str> {
        let name = self.0.rsplit('/').next()?;
        is_valid_name(name).then_some(name)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("invalid asset name `{0}`")]
    InvalidName(String),

    #[error("asset `{0}` already exists")]
    AlreadyExists(String),

    #[error("asset I/O failed for `{name}`: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// An asset found by [`AssetStore::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    pub name: String,
    pub locator: Locator,
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store `bytes` under `name`. The asset is only visible once fully written.
    async fn put(&self, name: &str, bytes: &[u8]) -> Result<Locator, AssetError>;

    /// Remove the asset. Missing assets and locators the store does not own
    /// are not an error.
    async fn delete(&self, locator: &Locator) -> Result<(), AssetError>;

    /// Fetch asset bytes, or `None` if the locator does not resolve.
    async fn read(&self, locator: &Locator) -> Result<Option<Vec<u8>>, AssetError>;

    /// Every asset currently held by the store.
    async fn list(&self) -> Result<Vec<StoredAsset>, AssetError>;

    /// Locator the store would hand out for `name`.
    fn locator_for(&self, name: &str) -> Locator;
}

/// Asset names are generated, never user-supplied, but every backend still
/// refuses anything that could escape its namespace.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 255
        && !name.starts_with('.')
        && !name.contains("..")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_validation() {
        assert!(is_valid_name("1718000000000-ab12cd34ef.jpg"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("../etc/passwd"));
        assert!(!is_valid_name("a/b.jpg"));
        assert!(!is_valid_name(".hidden"));
        assert!(!is_valid_name("a..b"));
        assert!(!is_valid_name("my photo.jpg"));
    }

    #[test]
    fn asset_name_ignores_prefix() {
        assert_eq!(
            Locator::new("/uploads/1718000000000-ab12cd34ef.jpg").asset_name(),
            Some("1718000000000-ab12cd34ef.jpg")
        );
        assert_eq!(
            Locator::new("https://cdn.example.com/media/a.png").asset_name(),
            Some("a.png")
        );
        assert_eq!(Locator::new("/uploads/").asset_name(), None);
        assert_eq!(Locator::unset().asset_name(), None);
    }

    #[test]
    fn unset_locator() {
        assert!(Locator::unset().is_unset());
        assert!(!Locator::new("/uploads/a.jpg").is_unset());
    }
}
