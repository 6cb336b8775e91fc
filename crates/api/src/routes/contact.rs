use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde_json::{Map, Value};
use studio_core::record::{FieldSet, ValidationError};

use super::content::{to_json, Data};
use crate::error::ApiResult;
use crate::state::AppState;

/// Public contact form. The only way contact messages are created.
pub fn routes() -> Router<AppState> {
    Router::new().route("/contact", post(submit_contact))
}

async fn submit_contact(
    State(state): State<AppState>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(body) = body.map_err(|e| ValidationError::MalformedBody(e.body_text()))?;
    let fields = FieldSet::from_json(body)?;
    let record = state.gateway().submit_contact(fields).await?;
    Ok(Json(to_json(Data { data: record })?))
}
