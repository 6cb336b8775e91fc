pub mod assets;
pub mod contact;
pub mod content;
pub mod health;
pub mod maintenance;

#[cfg(test)]
pub(crate) mod testing;

use axum::{extract::DefaultBodyLimit, Router};

use crate::state::AppState;

// Room for the text parts and multipart framing around the largest image.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state
        .config()
        .max_upload_bytes
        .saturating_add(FORM_OVERHEAD_BYTES);

    Router::new()
        .merge(health::routes())
        .merge(content::routes())
        .merge(contact::routes())
        .merge(maintenance::routes())
        .merge(assets::routes(&state.config().asset_url_prefix))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
