//! The tripwatch service: configuration, the periodic update scheduler and the
//! HTTP surface (JSON API plus a manual sync trigger).

pub mod scheduler;
pub mod settings;

use std::sync::Arc;

use axum::{
  Json, Router,
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::post,
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tripwatch_core::{notify::Notifier, store::TripStore};
use tripwatch_sync::{CycleError, PageSource, UpdateCycle};

pub use settings::ServerConfig;

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the service router: the JSON API under `/api` and `POST /sync`.
pub fn router<S, N, P>(store: Arc<S>, cycle: Arc<UpdateCycle<S, N, P>>) -> Router
where
  S: TripStore + 'static,
  N: Notifier + 'static,
  P: PageSource + 'static,
{
  Router::new()
    .route("/sync", post(sync_handler::<S, N, P>))
    .with_state(cycle)
    .nest("/api", tripwatch_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

/// `POST /sync`: run one update cycle now and return its report.
async fn sync_handler<S, N, P>(State(cycle): State<Arc<UpdateCycle<S, N, P>>>) -> Response
where
  S: TripStore + 'static,
  N: Notifier + 'static,
  P: PageSource + 'static,
{
  match cycle.run().await {
    Ok(report) => Json(report).into_response(),
    Err(error) => {
      let status = match &error {
        CycleError::AlreadyRunning => StatusCode::CONFLICT,
        CycleError::Fetch(_) => StatusCode::BAD_GATEWAY,
      };
      (status, Json(json!({ "error": error.to_string() }))).into_response()
    }
  }
}

// ─── Integration tests ────────────────────────────────────────────────────────
