use axum::{
    extract::{Query, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use studio_core::reconcile::{sweep_orphans, SweepOptions};

use super::content::{to_json, Data};
use crate::error::ApiResult;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/maintenance/orphans", post(sweep))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SweepQuery {
    #[serde(default)]
    dry_run: bool,
}

/// Remove images no record links to, older than the configured grace period.
async fn sweep(
    State(state): State<AppState>,
    Query(query): Query<SweepQuery>,
) -> ApiResult<Json<Value>> {
    let options = SweepOptions {
        grace: state.config().orphan_grace,
        dry_run: query.dry_run,
    };
    let report = sweep_orphans(
        state.repository().as_ref(),
        state.store().as_ref(),
        options,
    )
    .await?;
    Ok(Json(to_json(Data { data: report })?))
}
