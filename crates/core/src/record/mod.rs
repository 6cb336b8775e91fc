pub mod category;
pub mod fields;
pub mod id;
pub mod kind;
pub mod model;
pub mod schema;
pub mod validate;

pub use category::{Category, PortfolioCategory, VideoCategory};
pub use fields::FieldSet;
pub use id::RecordId;
pub use kind::ContentKind;
pub use model::{
    ContactMessage, ContentRecord, PortfolioItem, PreferredContact, Rating, RecordBody, Service,
    Testimonial, Video,
};
pub use schema::KindSchema;
pub use validate::ValidationError;
