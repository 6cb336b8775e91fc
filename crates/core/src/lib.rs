//! Content records for the studio back office and the uploaded images they
//! reference.

pub mod asset;
pub mod error;
pub mod gateway;
pub mod reconcile;
pub mod record;
pub mod repository;
pub mod upload;

pub use error::{ContentError, ContentResult};
pub use gateway::{ContentGateway, ContentRequest, ContentResponse};
