use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::category::{Category, PortfolioCategory, VideoCategory};
use super::fields::FieldSet;
use super::id::RecordId;
use super::kind::ContentKind;
use super::validate::ValidationError;
use crate::asset::Locator;

/// A content record as returned to callers.
///
/// Serialises as `{ id, kind, createdAt, ...kind fields }`. `id` and
/// `created_at` are assigned once in [`ContentRecord::new`] and never change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub id: RecordId,
    pub kind: ContentKind,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub body: RecordBody,
}

impl ContentRecord {
    pub fn new(body: RecordBody) -> Self {
        Self {
            id: RecordId::generate(),
            kind: body.kind(),
            // Stored with microsecond precision; truncate up front so a
            // freshly created record equals its persisted form.
            created_at: Utc::now().trunc_subsecs(6),
            body,
        }
    }

    /// Rebuild a record from its persisted envelope and JSON field document.
    pub fn from_stored(
        id: RecordId,
        kind: ContentKind,
        created_at: DateTime<Utc>,
        fields: Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id,
            kind,
            created_at,
            body: RecordBody::from_stored(kind, fields)?,
        })
    }

    pub fn image(&self) -> Option<&Locator> {
        self.body.image()
    }
}

/// Kind-specific record fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecordBody {
    Video(Video),
    Service(Service),
    Portfolio(PortfolioItem),
    Testimonial(Testimonial),
    Contact(ContactMessage),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    pub category: VideoCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub title: String,
    pub description: String,
    pub image: Locator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub title: String,
    pub description: String,
    pub category: PortfolioCategory,
    pub image: Locator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub name: String,
    #[serde(default)]
    pub content: String,
    pub rating: Rating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub preferred_contact: PreferredContact,
}

/// Star rating, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidRating {
            value: raw.to_string(),
        };
        let value: i64 = raw.trim().parse().map_err(|_| invalid())?;
        u8::try_from(value)
            .ok()
            .and_then(|v| Rating::try_from(v).ok())
            .ok_or_else(invalid)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Rating(value))
        } else {
            Err(ValidationError::InvalidRating {
                value: value.to_string(),
            })
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredContact {
    #[default]
    Email,
    Phone,
}

impl PreferredContact {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw.trim() {
            "" | "email" => Ok(PreferredContact::Email),
            "phone" => Ok(PreferredContact::Phone),
            other => Err(ValidationError::InvalidPreferredContact {
                value: other.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PreferredContact::Email => "email",
            PreferredContact::Phone => "phone",
        }
    }
}

impl RecordBody {
    pub fn kind(&self) -> ContentKind {
        match self {
            RecordBody::Video(_) => ContentKind::Video,
            RecordBody::Service(_) => ContentKind::Service,
            RecordBody::Portfolio(_) => ContentKind::Portfolio,
            RecordBody::Testimonial(_) => ContentKind::Testimonial,
            RecordBody::Contact(_) => ContentKind::Contact,
        }
    }

    fn from_stored(kind: ContentKind, fields: Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            ContentKind::Video => RecordBody::Video(serde_json::from_value(fields)?),
            ContentKind::Service => RecordBody::Service(serde_json::from_value(fields)?),
            ContentKind::Portfolio => RecordBody::Portfolio(serde_json::from_value(fields)?),
            ContentKind::Testimonial => RecordBody::Testimonial(serde_json::from_value(fields)?),
            ContentKind::Contact => RecordBody::Contact(serde_json::from_value(fields)?),
        })
    }

    /// JSON document persisted for this body.
    pub fn to_stored(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Current image locator. `None` for kinds without images and for an
    /// image-bearing body that has not had its upload attached yet.
    pub fn image(&self) -> Option<&Locator> {
        let image = match self {
            RecordBody::Service(s) => &s.image,
            RecordBody::Portfolio(p) => &p.image,
            _ => return None,
        };
        (!image.is_unset()).then_some(image)
    }

    /// Point the body at a new image, returning the locator it replaced.
    pub fn attach_image(&mut self, locator: Locator) -> Result<Option<Locator>, ValidationError> {
        let slot = match self {
            RecordBody::Service(s) => &mut s.image,
            RecordBody::Portfolio(p) => &mut p.image,
            other => return Err(ValidationError::UnexpectedAsset { kind: other.kind() }),
        };
        let previous = std::mem::replace(slot, locator);
        Ok((!previous.is_unset()).then_some(previous))
    }

    pub fn category_label(&self) -> Option<&'static str> {
        match self {
            RecordBody::Video(v) => Some(v.category.label()),
            RecordBody::Portfolio(p) => Some(p.category.label()),
            _ => None,
        }
    }

    /// Text form of every writable field except `image`, as a caller would submit it.
    pub fn to_fields(&self) -> FieldSet {
        match self {
            RecordBody::Video(v) => [
                ("title", v.title.clone()),
                ("description", v.description.clone()),
                ("url", v.url.clone()),
                ("category", v.category.label().to_string()),
            ]
            .into_iter()
            .collect(),
            RecordBody::Service(s) => [
                ("title", s.title.clone()),
                ("description", s.description.clone()),
            ]
            .into_iter()
            .collect(),
            RecordBody::Portfolio(p) => [
                ("title", p.title.clone()),
                ("description", p.description.clone()),
                ("category", p.category.label().to_string()),
            ]
            .into_iter()
            .collect(),
            RecordBody::Testimonial(t) => [
                ("name", t.name.clone()),
                ("content", t.content.clone()),
                ("rating", t.rating.value().to_string()),
            ]
            .into_iter()
            .collect(),
            RecordBody::Contact(c) => [
                ("name", c.name.clone()),
                ("email", c.email.clone()),
                ("message", c.message.clone()),
                ("phone", c.phone.clone()),
                ("preferredContact", c.preferred_contact.as_str().to_string()),
            ]
            .into_iter()
            .collect(),
        }
    }
}
