use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::schema::{
    ContactSchema, KindSchema, PortfolioSchema, ServiceSchema, TestimonialSchema, VideoSchema,
};
use super::validate::ValidationError;

/// The fixed set of content kinds managed by the studio back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Video,
    Service,
    Portfolio,
    Testimonial,
    Contact,
}

impl ContentKind {
    pub const ALL: [ContentKind; 5] = [
        ContentKind::Video,
        ContentKind::Service,
        ContentKind::Portfolio,
        ContentKind::Testimonial,
        ContentKind::Contact,
    ];

    /// Wire tag, also the value stored in the `kind` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Video => "video",
            ContentKind::Service => "service",
            ContentKind::Portfolio => "portfolio",
            ContentKind::Testimonial => "testimonial",
            ContentKind::Contact => "contact",
        }
    }

    /// Capability set for this kind.
    pub fn schema(self) -> &'static dyn KindSchema {
        match self {
            ContentKind::Video => &VideoSchema,
            ContentKind::Service => &ServiceSchema,
            ContentKind::Portfolio => &PortfolioSchema,
            ContentKind::Testimonial => &TestimonialSchema,
            ContentKind::Contact => &ContactSchema,
        }
    }

    /// Kinds whose records reference an uploaded image.
    pub fn image_bearing() -> impl Iterator<Item = ContentKind> {
        Self::ALL.into_iter().filter(|kind| kind.schema().has_asset())
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" | "videos" => Ok(ContentKind::Video),
            "service" | "services" => Ok(ContentKind::Service),
            "portfolio" => Ok(ContentKind::Portfolio),
            "testimonial" | "testimonials" => Ok(ContentKind::Testimonial),
            "contact" | "contacts" => Ok(ContentKind::Contact),
            other => Err(ValidationError::InvalidKind(other.to_string())),
        }
    }
}
