//! JSON REST API for tripwatch.
//!
//! Exposes an axum [`Router`] backed by any [`tripwatch_core::store::TripStore`]:
//! read access to tracked trips and their history, and chat subscription
//! management. Auth, TLS and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tripwatch_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod subscriptions;
pub mod trips;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use tripwatch_core::store::TripStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: TripStore + 'static,
{
  Router::new()
    // Trips
    .route("/trips", get(trips::list::<S>))
    .route("/trips/{id}", get(trips::get_one::<S>))
    // Subscriptions
    .route("/chats/{chat_id}/subscriptions", get(subscriptions::for_chat::<S>))
    .route("/subscriptions", post(subscriptions::create::<S>))
    .route("/subscriptions/{id}", delete(subscriptions::delete_one::<S>))
    .with_state(store)
}
