//! `GET /readiness`: gates traffic on a bounded database ping.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use streamfair_core::store::CatalogStore;

use crate::ApiState;

pub async fn readiness<S: CatalogStore>(
  State(state): State<ApiState<S>>,
) -> (StatusCode, Json<Value>) {
  match state.store.ping(state.ping_timeout).await {
    Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
    Err(e) => (
      StatusCode::SERVICE_UNAVAILABLE,
      Json(json!({ "status": "error", "message": e.to_string() })),
    ),
  }
}
