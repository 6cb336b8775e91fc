use thiserror::Error;

use crate::asset::AssetError;
use crate::record::{ContentKind, ValidationError};
use crate::repository::RepositoryError;

/// Failure of a content operation, as seen by the HTTP layer.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{kind} `{id}` not found")]
    NotFound { kind: ContentKind, id: String },

    #[error("repository failure: {0}")]
    Repository(#[from] RepositoryError),

    #[error("asset storage failure: {0}")]
    Asset(#[from] AssetError),
}

impl ContentError {
    pub fn not_found(kind: ContentKind, id: impl Into<String>) -> Self {
        ContentError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Storage-side failures, as opposed to problems with the request.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, ContentError::Repository(_) | ContentError::Asset(_))
    }
}

pub type ContentResult<T> = Result<T, ContentError>;
