//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs basic result info.

use std::sync::Arc;
use axum::{extract::State, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::error::AppError;
use crate::logic::login;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, store: state.store.kind() })
}

#[instrument(level = "info", skip(state, body), fields(raw_len = body.user_id.len()))]
pub async fn http_post_login(
  State(state): State<Arc<AppState>>,
  Json(body): Json<LoginIn>,
) -> Result<Json<LoginOut>, AppError> {
  let out = login(&state, &body.user_id).await?;
  info!(target: "identity", user_id = %out.user_id, created = out.created, "HTTP login served");
  Ok(Json(LoginOut { user_id: out.user_id, created: out.created }))
}
