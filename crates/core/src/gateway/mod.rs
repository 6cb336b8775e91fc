//! Uniform list/get/create/update/delete over every content kind.
//!
//! Asset ordering rules, which are the only consistency mechanism between
//! the repository and the asset store:
//! - create: stage the upload, then insert the record that links it;
//! - update: stage the new upload, update the record, then retire the old asset;
//! - delete: remove the record, then retire its asset.
//!
//! A readable record therefore never points at a missing or partial asset.
//! The converse (an asset nothing points at) is logged and swept up by
//! [`crate::reconcile`].

pub mod request;

use std::sync::Arc;

use tracing::Instrument;

pub use request::{ContentRequest, ContentResponse};

use crate::error::{ContentError, ContentResult};
use crate::record::{
    Category, ContentKind, ContentRecord, FieldSet, PortfolioCategory, RecordBody, RecordId,
    ValidationError, VideoCategory,
};
use crate::repository::{ContentRepository, ImageUpdate};
use crate::upload::{Asset, UploadCoordinator};

#[derive(Clone)]
pub struct ContentGateway {
    repository: Arc<dyn ContentRepository>,
    uploads: UploadCoordinator,
}

impl ContentGateway {
    pub fn new(repository: Arc<dyn ContentRepository>, uploads: UploadCoordinator) -> Self {
        Self {
            repository,
            uploads,
        }
    }

    pub fn repository(&self) -> &Arc<dyn ContentRepository> {
        &self.repository
    }

    pub fn uploads(&self) -> &UploadCoordinator {
        &self.uploads
    }

    /// Route a request to the matching operation.
    pub async fn handle(&self, request: ContentRequest) -> ContentResult<ContentResponse> {
        let kind = request.kind();
        let verb = request.verb();
        let id = request.id().map(str::to_owned);
        let span = tracing::info_span!(
            "content",
            kind = %kind,
            verb,
            id = id.as_deref().unwrap_or_default()
        );
        async move {
            let result = match request {
                ContentRequest::List { kind, category } => self
                    .list(kind, category.as_deref())
                    .await
                    .map(ContentResponse::Records),
                ContentRequest::Get { kind, id } => {
                    self.get(kind, &id).await.map(ContentResponse::Record)
                }
                ContentRequest::Create {
                    kind,
                    fields,
                    asset,
                } => self
                    .create(kind, fields, asset)
                    .await
                    .map(ContentResponse::Record),
                ContentRequest::Update {
                    kind,
                    id,
                    fields,
                    asset,
                } => self
                    .update(kind, &id, fields, asset)
                    .await
                    .map(ContentResponse::Record),
                ContentRequest::Delete { kind, id } => {
                    self.delete(kind, &id).await.map(ContentResponse::Deleted)
                }
            };
            result.inspect_err(|err| log_storage_failure(kind, verb, id.as_deref(), err))
        }
        .instrument(span)
        .await
    }

    /// All records of `kind`, newest first, optionally narrowed to one category.
    pub async fn list(
        &self,
        kind: ContentKind,
        category: Option<&str>,
    ) -> ContentResult<Vec<ContentRecord>> {
        let filter = category_filter(kind, category)?;
        let records = self.repository.find_all(kind).await?;
        Ok(match filter {
            Some(label) => records
                .into_iter()
                .filter(|r| r.body.category_label() == Some(label))
                .collect(),
            None => records,
        })
    }

    pub async fn get(&self, kind: ContentKind, id: &str) -> ContentResult<ContentRecord> {
        let record_id = RecordId::parse(id).ok_or_else(|| ContentError::not_found(kind, id))?;
        self.repository
            .find_one(kind, record_id)
            .await?
            .ok_or_else(|| ContentError::not_found(kind, id))
    }

    /// Create a record from an admin submission.
    #[tracing::instrument(skip_all, fields(kind = %kind))]
    pub async fn create(
        &self,
        kind: ContentKind,
        fields: FieldSet,
        asset: Option<Asset>,
    ) -> ContentResult<ContentRecord> {
        let schema = kind.schema();
        if !schema.admin_writable() {
            return Err(ValidationError::ReadOnlyKind { kind }.into());
        }
        let body = schema.validate(&fields, asset.is_some())?;
        self.insert(body, asset.as_ref()).await
    }

    /// Store a message from the public contact form.
    #[tracing::instrument(skip_all)]
    pub async fn submit_contact(&self, fields: FieldSet) -> ContentResult<ContentRecord> {
        let body = ContentKind::Contact.schema().validate(&fields, false)?;
        self.insert(body, None)
            .await
            .inspect_err(|err| log_storage_failure(ContentKind::Contact, "create", None, err))
    }

    /// Patch a record. Fields not supplied keep their stored values; without
    /// a new asset the stored image is kept as is.
    #[tracing::instrument(skip_all, fields(kind = %kind, id = %id))]
    pub async fn update(
        &self,
        kind: ContentKind,
        id: &str,
        fields: FieldSet,
        asset: Option<Asset>,
    ) -> ContentResult<ContentRecord> {
        let schema = kind.schema();
        if !schema.admin_writable() {
            return Err(ValidationError::ReadOnlyKind { kind }.into());
        }
        let current = self.get(kind, id).await?;
        let mut body = schema.validate_patch(&current.body, &fields, asset.is_some())?;

        let (staged, replaced) = match asset {
            Some(asset) => {
                let locator = self.uploads.stage(&asset).await?;
                let replaced = body.attach_image(locator.clone())?;
                (Some(locator), replaced)
            }
            None => (None, None),
        };

        let image = match staged {
            Some(_) => ImageUpdate::Replace,
            None => ImageUpdate::Keep,
        };
        let record = ContentRecord { body, ..current };
        let stored = match self.repository.update(&record, image).await {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                if let Some(locator) = &staged {
                    self.uploads.discard(locator).await;
                }
                return Err(ContentError::not_found(kind, id));
            }
            Err(err) => {
                if let Some(locator) = &staged {
                    self.uploads.discard(locator).await;
                }
                return Err(err.into());
            }
        };

        if let Some(old) = replaced {
            self.uploads.retire(&old).await;
        }
        tracing::info!("record updated");
        Ok(stored)
    }

    /// Delete a record and then its image, if it has one.
    #[tracing::instrument(skip_all, fields(kind = %kind, id = %id))]
    pub async fn delete(&self, kind: ContentKind, id: &str) -> ContentResult<ContentRecord> {
        let record_id = RecordId::parse(id).ok_or_else(|| ContentError::not_found(kind, id))?;
        let removed = self
            .repository
            .delete(kind, record_id)
            .await?
            .ok_or_else(|| ContentError::not_found(kind, id))?;

        if let Some(image) = removed.image() {
            self.uploads.retire(image).await;
        }
        tracing::info!("record deleted");
        Ok(removed)
    }

    async fn insert(
        &self,
        mut body: RecordBody,
        asset: Option<&Asset>,
    ) -> ContentResult<ContentRecord> {
        let staged = match asset {
            Some(asset) => {
                let locator = self.uploads.stage(asset).await?;
                body.attach_image(locator.clone())?;
                Some(locator)
            }
            None => None,
        };

        let record = ContentRecord::new(body);
        if let Err(err) = self.repository.create(&record).await {
            if let Some(locator) = &staged {
                self.uploads.discard(locator).await;
            }
            return Err(err.into());
        }
        tracing::info!(id = %record.id, kind = %record.kind, "record created");
        Ok(record)
    }
}

fn log_storage_failure(kind: ContentKind, verb: &str, id: Option<&str>, err: &ContentError) {
    if err.is_storage_failure() {
        tracing::error!(
            kind = %kind,
            verb,
            id = id.unwrap_or_default(),
            error = %err,
            "storage failure"
        );
    }
}

/// Resolve a list filter to its canonical label. `All` or blank means no filter.
fn category_filter(
    kind: ContentKind,
    category: Option<&str>,
) -> Result<Option<&'static str>, ValidationError> {
    let Some(filter) = category.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(None);
    };
    if filter.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    match kind {
        ContentKind::Video => VideoCategory::parse(filter).map(|c| Some(c.label())),
        ContentKind::Portfolio => PortfolioCategory::parse(filter).map(|c| Some(c.label())),
        _ => Err(ValidationError::NotCategorized { kind }),
    }
}
