//! `GET /api/latest-entry`

use crate::api::error::ApiResult;
use crate::api::AppState;
use crate::core::aggregation::latest_entry;
use crate::domain::LatestEntry;
use axum::extract::State;
use axum::Json;

pub async fn get_latest_entry(State(state): State<AppState>) -> ApiResult<Json<LatestEntry>> {
    let entry = latest_entry(state.store.as_ref()).await?;
    Ok(Json(entry))
}
