//! Typed persistence access for content records.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::record::{ContentKind, ContentRecord, RecordId};

pub use memory::InMemoryRepository;
pub use postgres::PgContentRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored {kind} `{id}` is unreadable: {reason}")]
    Corrupt {
        kind: String,
        id: String,
        reason: String,
    },

    #[error("could not encode {kind} `{id}`: {source}")]
    Encode {
        kind: ContentKind,
        id: RecordId,
        #[source]
        source: serde_json::Error,
    },

    #[error("{kind} `{id}` already exists")]
    Conflict { kind: ContentKind, id: RecordId },
}

/// How an update treats the stored image reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageUpdate {
    /// Leave whatever image is stored now. A concurrent update may have
    /// replaced it since the caller read the record.
    Keep,
    /// Point the record at the image carried by the update.
    Replace,
}

/// Record storage per kind. Implementations never change a record's id or
/// creation time; [`update`](Self::update) only replaces the kind fields.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// All records of `kind`, newest first.
    async fn find_all(&self, kind: ContentKind) -> Result<Vec<ContentRecord>, RepositoryError>;

    async fn find_one(
        &self,
        kind: ContentKind,
        id: RecordId,
    ) -> Result<Option<ContentRecord>, RepositoryError>;

    async fn create(&self, record: &ContentRecord) -> Result<(), RepositoryError>;

    /// Replace the fields of an existing record and return it as stored, or
    /// `None` if it is gone. With [`ImageUpdate::Keep`] the image reference
    /// already in storage wins over the one carried by `record`.
    async fn update(
        &self,
        record: &ContentRecord,
        image: ImageUpdate,
    ) -> Result<Option<ContentRecord>, RepositoryError>;

    /// Remove a record, returning what was removed.
    async fn delete(
        &self,
        kind: ContentKind,
        id: RecordId,
    ) -> Result<Option<ContentRecord>, RepositoryError>;

    /// Cheap connectivity check for health checks.
    async fn ping(&self) -> Result<(), RepositoryError>;
}
