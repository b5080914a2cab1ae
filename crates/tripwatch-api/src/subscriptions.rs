//! Handlers for subscription endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/chats/{chat_id}/subscriptions` | Joined with trips |
//! | `POST`   | `/subscriptions` | Body: `{"trip_id":"…","chat_id":42}` |
//! | `DELETE` | `/subscriptions/{id}` | 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use tripwatch_core::{
  store::TripStore,
  subscription::{ChatId, SubscribeOutcome, SubscribedTrip},
};
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /chats/{chat_id}/subscriptions`
pub async fn for_chat<S: TripStore>(
  State(store): State<Arc<S>>,
  Path(chat_id): Path<i64>,
) -> Result<Json<Vec<SubscribedTrip>>, ApiError> {
  let subs = store
    .subscriptions_for_chat(ChatId(chat_id))
    .await
    .map_err(ApiError::store)?;
  Ok(Json(subs))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub trip_id: Uuid,
  pub chat_id: ChatId,
}

/// `POST /subscriptions`
pub async fn create<S: TripStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  match store
    .subscribe(body.trip_id, body.chat_id)
    .await
    .map_err(ApiError::store)?
  {
    SubscribeOutcome::Created(sub) => Ok((StatusCode::CREATED, Json(sub))),
    SubscribeOutcome::AlreadySubscribed => Err(ApiError::Conflict(format!(
      "chat {} is already subscribed to trip {}",
      body.chat_id, body.trip_id
    ))),
    SubscribeOutcome::UnknownTrip => {
      Err(ApiError::NotFound(format!("trip {} not found", body.trip_id)))
    }
  }
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /subscriptions/{id}`
pub async fn delete_one<S: TripStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  if store.unsubscribe(id).await.map_err(ApiError::store)? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("subscription {id} not found")))
  }
}
