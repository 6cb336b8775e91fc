//! In-process router fixtures: in-memory records and a temp-dir asset store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request},
    response::Response,
    Router,
};
use serde_json::Value;
use studio_core::asset::LocalAssetStore;
use studio_core::repository::InMemoryRepository;
use tower::ServiceExt;

use crate::config::AppConfig;
use crate::state::AppState;

pub const BOUNDARY: &str = "studio-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub repository: InMemoryRepository,
    pub store: Arc<LocalAssetStore>,
    _dir: tempfile::TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::for_tests(dir.path().join("uploads"));
        let store = Arc::new(LocalAssetStore::new(
            &config.upload_dir,
            &config.asset_url_prefix,
        ));
        let repository = InMemoryRepository::new();
        let state = AppState::new(config, Arc::new(repository.clone()), store.clone());
        Self {
            router: super::build_router(state),
            repository,
            store,
            _dir: dir,
        }
    }
}

pub async fn send(app: &TestApp, request: Request<Body>) -> Response {
    app.router.clone().oneshot(request).await.unwrap()
}

/// `Value::Null` sends no body.
pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    if body.is_null() {
        builder.body(Body::empty()).unwrap()
    } else {
        builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }
}

pub fn multipart_request(method: Method, uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
