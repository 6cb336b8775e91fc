use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{is_valid_name, AssetError, AssetStore, Locator, StoredAsset};

const TEMP_SUFFIX: &str = ".upload";

/// Assets kept as plain files in one directory, addressed by
/// `<url_prefix>/<name>`.
#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
    url_prefix: String,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: &str) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Asset name behind a locator, if the locator belongs to this store.
    fn name_of<'a>(&self, locator: &'a Locator) -> Option<&'a str> {
        let name = locator
            .as_str()
            .strip_prefix(self.url_prefix.as_str())?
            .strip_prefix('/')?;
        is_valid_name(name).then_some(name)
    }

    fn io_error(name: &str, source: std::io::Error) -> AssetError {
        AssetError::Io {
            name: name.to_string(),
            source,
        }
    }

    async fn write_new(&self, name: &str, bytes: &[u8]) -> Result<(), AssetError> {
        let target = self.root.join(name);
        let temp = self
            .root
            .join(format!(".{name}.{}{TEMP_SUFFIX}", std::process::id()));

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp)
            .await
            .map_err(|e| Self::io_error(name, e))?;

        let written = async {
            file.write_all(bytes).await?;
            file.sync_all().await?;
            fs::rename(&temp, &target).await
        }
        .await;

        if let Err(err) = written {
            let _ = fs::remove_file(&temp).await;
            return Err(Self::io_error(name, err));
        }

        #[cfg(unix)]
        {
            if let Err(err) = sync_dir(&self.root).await {
                tracing::warn!(dir = %self.root.display(), "asset directory sync failed: {err}");
            }
        }

        Ok(())
    }
}

#[cfg(unix)]
async fn sync_dir(dir: &Path) -> std::io::Result<()> {
    fs::File::open(dir).await?.sync_all().await
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn put(&self, name: &str, bytes: &[u8]) -> Result<Locator, AssetError> {
        if !is_valid_name(name) {
            return Err(AssetError::InvalidName(name.to_string()));
        }
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| Self::io_error(name, e))?;

        if fs::try_exists(self.root.join(name))
            .await
            .map_err(|e| Self::io_error(name, e))?
        {
            return Err(AssetError::AlreadyExists(name.to_string()));
        }

        self.write_new(name, bytes).await?;
        tracing::debug!(asset = name, bytes = bytes.len(), "asset stored");
        Ok(self.locator_for(name))
    }

    async fn delete(&self, locator: &Locator) -> Result<(), AssetError> {
        let Some(name) = self.name_of(locator) else {
            tracing::debug!(%locator, "locator not owned by local store; nothing to delete");
            return Ok(());
        };
        match fs::remove_file(self.root.join(name)).await {
            Ok(()) => {
                tracing::debug!(asset = name, "asset deleted");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Self::io_error(name, err)),
        }
    }

    async fn read(&self, locator: &Locator) -> Result<Option<Vec<u8>>, AssetError> {
        let Some(name) = self.name_of(locator) else {
            return Ok(None);
        };
        match fs::read(self.root.join(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Self::io_error(name, err)),
        }
    }

    async fn list(&self) -> Result<Vec<StoredAsset>, AssetError> {
        let root_label = self.root.display().to_string();
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(Self::io_error(&root_label, err)),
        };

        let mut assets = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Self::io_error(&root_label, e))?
        {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            // In-flight temp files are hidden and fail name validation.
            if !is_valid_name(&name) {
                continue;
            }
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if is_file {
                assets.push(StoredAsset {
                    locator: self.locator_for(&name),
                    name,
                });
            }
        }
        assets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(assets)
    }

    fn locator_for(&self, name: &str) -> Locator {
        Locator::new(format!("{}/{name}", self.url_prefix))
    }
}
