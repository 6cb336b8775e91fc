//! Requests accepted by [`super::ContentGateway::handle`].

use crate::record::{ContentKind, ContentRecord, FieldSet};
use crate::upload::Asset;

#[derive(Debug, Clone)]
pub enum ContentRequest {
    List {
        kind: ContentKind,
        category: Option<String>,
    },
    Get {
        kind: ContentKind,
        id: String,
    },
    Create {
        kind: ContentKind,
        fields: FieldSet,
        asset: Option<Asset>,
    },
    Update {
        kind: ContentKind,
        id: String,
        fields: FieldSet,
        asset: Option<Asset>,
    },
    Delete {
        kind: ContentKind,
        id: String,
    },
}

impl ContentRequest {
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentRequest::List { kind, .. }
            | ContentRequest::Get { kind, .. }
            | ContentRequest::Create { kind, .. }
            | ContentRequest::Update { kind, .. }
            | ContentRequest::Delete { kind, .. } => *kind,
        }
    }

    /// Target record id; `None` for list and create.
    pub fn id(&self) -> Option<&str> {
        match self {
            ContentRequest::Get { id, .. }
            | ContentRequest::Update { id, .. }
            | ContentRequest::Delete { id, .. } => Some(id),
            ContentRequest::List { .. } | ContentRequest::Create { .. } => None,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            ContentRequest::List { .. } => "list",
            ContentRequest::Get { .. } => "get",
            ContentRequest::Create { .. } => "create",
            ContentRequest::Update { .. } => "update",
            ContentRequest::Delete { .. } => "delete",
        }
    }
}

/// Result of a handled request.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentResponse {
    Records(Vec<ContentRecord>),
    Record(ContentRecord),
    Deleted(ContentRecord),
}
