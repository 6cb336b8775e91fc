use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use studio_core::record::{ContentKind, ValidationError};
use studio_core::{ContentRequest, ContentResponse};

use crate::error::ApiResult;
use crate::extract::Submission;
use crate::state::AppState;

/// Admin content routes: one path, the kind selected per request.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/content",
        get(read_content)
            .post(create_content)
            .put(update_content)
            .delete(delete_content),
    )
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ContentQuery {
    #[serde(alias = "model")]
    kind: Option<String>,
    id: Option<String>,
    category: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Data<T> {
    pub data: T,
}

fn parse_kind(raw: Option<&str>) -> Result<ContentKind, ValidationError> {
    raw.map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or(ValidationError::MissingParameter("kind"))?
        .parse()
}

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// `GET /content?kind=<k>[&id=<id>][&category=<label>]`
async fn read_content(
    State(state): State<AppState>,
    Query(query): Query<ContentQuery>,
) -> ApiResult<Json<Value>> {
    let kind = parse_kind(query.kind.as_deref())?;
    let request = match non_blank(query.id) {
        Some(id) => ContentRequest::Get { kind, id },
        None => ContentRequest::List {
            kind,
            category: query.category,
        },
    };
    respond(state.gateway().handle(request).await?)
}

/// `POST /content` with a JSON or multipart body.
async fn create_content(
    State(state): State<AppState>,
    Query(query): Query<ContentQuery>,
    submission: Submission,
) -> ApiResult<Json<Value>> {
    if non_blank(submission.id.clone()).is_some() {
        return Err(ValidationError::ImmutableField {
            field: "id".to_string(),
        }
        .into());
    }
    let kind = match submission.kind {
        Some(_) => submission.kind()?,
        None => parse_kind(query.kind.as_deref())?,
    };
    let request = ContentRequest::Create {
        kind,
        fields: submission.fields,
        asset: submission.asset,
    };
    respond(state.gateway().handle(request).await?)
}

/// `PUT /content`; `kind` and `id` come from the body, or the query string
/// when the body leaves them out.
async fn update_content(
    State(state): State<AppState>,
    Query(query): Query<ContentQuery>,
    submission: Submission,
) -> ApiResult<Json<Value>> {
    let kind = match submission.kind {
        Some(_) => submission.kind()?,
        None => parse_kind(query.kind.as_deref())?,
    };
    let id = match submission.require_id() {
        Ok(id) => id.to_string(),
        Err(err) => non_blank(query.id).ok_or(err)?,
    };
    let request = ContentRequest::Update {
        kind,
        id,
        fields: submission.fields,
        asset: submission.asset,
    };
    respond(state.gateway().handle(request).await?)
}

/// `DELETE /content?kind=<k>&id=<id>`
async fn delete_content(
    State(state): State<AppState>,
    Query(query): Query<ContentQuery>,
) -> ApiResult<Json<Value>> {
    let kind = parse_kind(query.kind.as_deref())?;
    let id = non_blank(query.id).ok_or(ValidationError::MissingParameter("id"))?;
    respond(state.gateway().handle(ContentRequest::Delete { kind, id }).await?)
}

fn respond(response: ContentResponse) -> ApiResult<Json<Value>> {
    let body = match response {
        ContentResponse::Records(records) => to_json(Data { data: records })?,
        ContentResponse::Record(record) => to_json(Data { data: record })?,
        ContentResponse::Deleted(_) => json!({ "success": true }),
    };
    Ok(Json(body))
}

pub(crate) fn to_json<T: Serialize>(value: T) -> ApiResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| crate::error::ApiError::Internal(format!("response encoding failed: {e}")))
}
