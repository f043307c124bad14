//! HTTP endpoint handlers. These are thin wrappers that forward to core
//! logic. Each handler is instrumented; validation failures map to 422,
//! catalog failures to 502.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::{info, instrument};

use crate::domain::MissionSettings;
use crate::error::MissionsError;
use crate::logic;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

/// Passive load: serves the stored deck, regenerating first when the day
/// rolled over or nothing was generated yet.
#[instrument(level = "info", skip(state))]
pub async fn http_get_missions(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  match logic::load_deck(&state).await {
    Ok(view) => {
      info!(target: "mission", missions = view.missions.len(), solved = view.solved.len(), "HTTP deck served");
      Json(deck_to_out(&view, &state.config.catalog.problem_base)).into_response()
    }
    Err(e) => error_response(e).into_response(),
  }
}

/// Manual refresh: always regenerates, regardless of staleness.
#[instrument(level = "info", skip(state))]
pub async fn http_post_refresh(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  match logic::refresh_deck(&state).await {
    Ok(view) => {
      info!(target: "mission", missions = view.missions.len(), "HTTP deck refreshed");
      Json(deck_to_out(&view, &state.config.catalog.problem_base)).into_response()
    }
    Err(e) => error_response(e).into_response(),
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_handle(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let handle = state.store.read().await.user_handle.clone();
  Json(HandleOut { handle })
}

#[instrument(level = "info", skip(state, body), fields(handle_len = body.handle.len()))]
pub async fn http_post_handle(
  State(state): State<Arc<AppState>>,
  Json(body): Json<HandleIn>,
) -> impl IntoResponse {
  match logic::save_handle(&state, &body.handle).await {
    Ok(handle) => Json(HandleOut { handle: Some(handle) }).into_response(),
    Err(e) => error_response(e).into_response(),
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_settings(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let settings = state
    .store
    .read()
    .await
    .effective_settings(&state.fallback_settings);
  Json(settings)
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_settings(
  State(state): State<Arc<AppState>>,
  Json(body): Json<MissionSettings>,
) -> impl IntoResponse {
  match logic::save_settings(&state, body).await {
    Ok(()) => Json(StatusOut { ok: true }).into_response(),
    Err(e) => error_response(e).into_response(),
  }
}

/// Map crate errors onto the HTTP surface: user-recoverable mistakes are
/// 422, upstream failures 502, local faults 500.
fn error_response(e: MissionsError) -> (StatusCode, Json<ErrorOut>) {
  let status = match &e {
    MissionsError::InvalidSettings(_)
    | MissionsError::EmptyHandle
    | MissionsError::InsufficientProblems { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    MissionsError::Http(_) | MissionsError::Api(_) => StatusCode::BAD_GATEWAY,
    MissionsError::Io { .. } | MissionsError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
  };
  (status, Json(ErrorOut { message: e.to_string() }))
}
