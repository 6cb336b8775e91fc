use axum::{
    extract::{Path, State},
    http::header::{CACHE_CONTROL, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS},
    response::IntoResponse,
    routing::get,
    Router,
};
use studio_core::asset::is_valid_name;
use studio_core::upload::media;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Serves stored images at `<prefix>/{name}`, read through the asset store.
pub fn routes(prefix: &str) -> Router<AppState> {
    let path = format!("{}/{{name}}", prefix.trim_end_matches('/'));
    Router::new().route(&path, get(serve_asset))
}

async fn serve_asset(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let missing = || ApiError::NotFound(format!("asset `{name}` not found"));
    if !is_valid_name(&name) {
        return Err(missing());
    }

    let store = state.store();
    let bytes = store
        .read(&store.locator_for(&name))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .ok_or_else(missing)?;

    let content_type = media::media_type_for_name(&name);
    Ok((
        [
            (CONTENT_TYPE, content_type.to_string()),
            (X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
            // Names are never reused.
            (CACHE_CONTROL, "public, max-age=31536000, immutable".to_string()),
        ],
        bytes,
    ))
}
