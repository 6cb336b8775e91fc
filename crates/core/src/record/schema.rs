//! Per-kind capability sets.
//!
//! Each content kind implements [`KindSchema`] once; the gateway looks the
//! schema up through [`ContentKind::schema`] and never branches on kind names.
//! Create and update share [`KindSchema::to_record`], so every rule that
//! applies on create also applies to the merged record on update.

use super::category::{Category, PortfolioCategory, VideoCategory};
use super::fields::FieldSet;
use super::kind::ContentKind;
use super::model::{
    ContactMessage, PortfolioItem, PreferredContact, Rating, RecordBody, Service, Testimonial,
    Video,
};
use super::validate::{require_non_blank, validate_email, ValidationError};
use crate::asset::Locator;

pub trait KindSchema: Send + Sync {
    fn kind(&self) -> ContentKind;

    /// Writable field names, excluding `image`.
    fn fields(&self) -> &'static [&'static str];

    /// Whether records of this kind reference an uploaded image.
    fn has_asset(&self) -> bool {
        false
    }

    /// Whether the admin surface may create and update this kind.
    fn admin_writable(&self) -> bool {
        true
    }

    /// Build a body from a complete field set. Image-bearing kinds come back
    /// with the image unset; the caller attaches the stored upload.
    fn to_record(&self, fields: &FieldSet) -> Result<RecordBody, ValidationError>;

    /// Validate a create submission.
    fn validate(
        &self,
        fields: &FieldSet,
        asset_supplied: bool,
    ) -> Result<RecordBody, ValidationError> {
        self.check_asset(asset_supplied, true)?;
        fields.check_names(self.kind(), self.fields())?;
        self.to_record(fields)
    }

    /// Validate an update: the stored fields overlaid with `patch` must pass
    /// the same rules as a create. The current image is carried over.
    fn validate_patch(
        &self,
        current: &RecordBody,
        patch: &FieldSet,
        asset_supplied: bool,
    ) -> Result<RecordBody, ValidationError> {
        self.check_asset(asset_supplied, false)?;
        patch.check_names(self.kind(), self.fields())?;
        let mut body = self.to_record(&current.to_fields().overlay(patch))?;
        if let Some(image) = current.image() {
            body.attach_image(image.clone())?;
        }
        Ok(body)
    }

    fn check_asset(&self, supplied: bool, creating: bool) -> Result<(), ValidationError> {
        match (self.has_asset(), supplied) {
            (false, true) => Err(ValidationError::UnexpectedAsset { kind: self.kind() }),
            (true, false) if creating => Err(ValidationError::MissingAsset { kind: self.kind() }),
            _ => Ok(()),
        }
    }
}

fn text(fields: &FieldSet, name: &'static str) -> Result<String, ValidationError> {
    require_non_blank(name, fields.get(name)).map(str::to_string)
}

fn optional_text(fields: &FieldSet, name: &str) -> String {
    fields.get(name).unwrap_or_default().to_string()
}

fn external_url(fields: &FieldSet, name: &'static str) -> Result<String, ValidationError> {
    let url = text(fields, name)?;
    let lower = url.trim().to_ascii_lowercase();
    if lower.starts_with("https://") || lower.starts_with("http://") {
        Ok(url)
    } else {
        Err(ValidationError::InvalidUrl { value: url })
    }
}

pub struct VideoSchema;

impl KindSchema for VideoSchema {
    fn kind(&self) -> ContentKind {
        ContentKind::Video
    }

    fn fields(&self) -> &'static [&'static str] {
        &["title", "description", "url", "category"]
    }

    fn to_record(&self, fields: &FieldSet) -> Result<RecordBody, ValidationError> {
        Ok(RecordBody::Video(Video {
            title: text(fields, "title")?,
            description: optional_text(fields, "description"),
            url: external_url(fields, "url")?,
            category: VideoCategory::parse(&text(fields, "category")?)?,
        }))
    }
}

pub struct ServiceSchema;

impl KindSchema for ServiceSchema {
    fn kind(&self) -> ContentKind {
        ContentKind::Service
    }

    fn fields(&self) -> &'static [&'static str] {
        &["title", "description"]
    }

    fn has_asset(&self) -> bool {
        true
    }

    fn to_record(&self, fields: &FieldSet) -> Result<RecordBody, ValidationError> {
        Ok(RecordBody::Service(Service {
            title: text(fields, "title")?,
            description: text(fields, "description")?,
            image: Locator::unset(),
        }))
    }
}

pub struct PortfolioSchema;

impl KindSchema for PortfolioSchema {
    fn kind(&self) -> ContentKind {
        ContentKind::Portfolio
    }

    fn fields(&self) -> &'static [&'static str] {
        &["title", "description", "category"]
    }

    fn has_asset(&self) -> bool {
        true
    }

    fn to_record(&self, fields: &FieldSet) -> Result<RecordBody, ValidationError> {
        Ok(RecordBody::Portfolio(PortfolioItem {
            title: text(fields, "title")?,
            description: text(fields, "description")?,
            category: PortfolioCategory::parse(&text(fields, "category")?)?,
            image: Locator::unset(),
        }))
    }
}

pub struct TestimonialSchema;

impl KindSchema for TestimonialSchema {
    fn kind(&self) -> ContentKind {
        ContentKind::Testimonial
    }

    fn fields(&self) -> &'static [&'static str] {
        &["name", "content", "rating"]
    }

    fn to_record(&self, fields: &FieldSet) -> Result<RecordBody, ValidationError> {
        Ok(RecordBody::Testimonial(Testimonial {
            name: text(fields, "name")?,
            content: optional_text(fields, "content"),
            rating: Rating::parse(&text(fields, "rating")?)?,
        }))
    }
}

/// Contact messages arrive through the public form only.
pub struct ContactSchema;

impl KindSchema for ContactSchema {
    fn kind(&self) -> ContentKind {
        ContentKind::Contact
    }

    fn fields(&self) -> &'static [&'static str] {
        &["name", "email", "message", "phone", "preferredContact"]
    }

    fn admin_writable(&self) -> bool {
        false
    }

    fn to_record(&self, fields: &FieldSet) -> Result<RecordBody, ValidationError> {
        let email = text(fields, "email")?;
        validate_email(&email)?;
        Ok(RecordBody::Contact(ContactMessage {
            name: text(fields, "name")?,
            email,
            message: text(fields, "message")?,
            phone: optional_text(fields, "phone"),
            preferred_contact: PreferredContact::parse(
                fields.get("preferredContact").unwrap_or_default(),
            )?,
        }))
    }
}
