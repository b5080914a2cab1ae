//! Handlers for `/trips` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/trips` | Ordered by month, then title |
//! | `GET`  | `/trips/{id}` | Trip plus participant history; 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use serde::Serialize;
use tripwatch_core::{
  store::TripStore,
  trip::{ParticipantHistory, Trip},
};
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /trips`
pub async fn list<S: TripStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Trip>>, ApiError> {
  let trips = store.list_trips().await.map_err(ApiError::store)?;
  Ok(Json(trips))
}

/// A trip with its participant-count history, oldest first.
#[derive(Debug, Serialize)]
pub struct TripDetail {
  #[serde(flatten)]
  pub trip:    Trip,
  pub history: Vec<ParticipantHistory>,
}

/// `GET /trips/{id}`
pub async fn get_one<S: TripStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<TripDetail>, ApiError> {
  let trip = store
    .get_trip(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("trip {id} not found")))?;
  let history = store.history_for_trip(id).await.map_err(ApiError::store)?;
  Ok(Json(TripDetail { trip, history }))
}
