use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// The admin UI and the public site may be served from other origins.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}
