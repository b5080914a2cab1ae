//! The `TripStore` trait.
//!
//! Implemented by storage backends (e.g. `tripwatch-store-sqlite`). The sync
//! pipeline and the JSON API depend on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  subscription::{ChatId, SubscribeOutcome, SubscribedTrip, Subscription},
  trip::{NewTrip, ParticipantHistory, Trip},
};

/// Abstraction over the persisted trip / subscription / history tables.
///
/// Every method is an independent call; no method spans a transaction with
/// another. Deleting a trip removes its subscriptions and history rows.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait TripStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Trips ─────────────────────────────────────────────────────────────

  /// All trips, ordered by month (then title).
  fn list_trips(
    &self,
  ) -> impl Future<Output = Result<Vec<Trip>, Self::Error>> + Send + '_;

  fn get_trip(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Trip>, Self::Error>> + Send + '_;

  /// Exact-match lookup on the title dedup key.
  fn find_trip_by_title<'a>(
    &'a self,
    title: &'a str,
  ) -> impl Future<Output = Result<Option<Trip>, Self::Error>> + Send + 'a;

  /// Persist a trip first seen on the calendar page. `last_updated` is set by
  /// the store.
  fn insert_trip(
    &self,
    trip: NewTrip,
  ) -> impl Future<Output = Result<Trip, Self::Error>> + Send + '_;

  /// Overwrite the current participant count and `last_updated`. Returns
  /// `false` if the trip does not exist.
  fn update_participants(
    &self,
    id: Uuid,
    current: u32,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete a trip together with its subscriptions and history. Returns
  /// `false` if the trip does not exist.
  fn delete_trip(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── History (append-only) ──────────────────────────────────────────

  fn record_history(
    &self,
    trip_id: Uuid,
    participants: u32,
  ) -> impl Future<Output = Result<ParticipantHistory, Self::Error>> + Send + '_;

  /// History rows for a trip, oldest first.
  fn history_for_trip(
    &self,
    trip_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ParticipantHistory>, Self::Error>> + Send + '_;

  // ── Subscriptions ─────────────────────────────────────────────────────

  fn subscriptions_for_trip(
    &self,
    trip_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Subscription>, Self::Error>> + Send + '_;

  /// Subscribe `chat_id` to a trip. A repeat subscription for the same pair
  /// is reported as [`SubscribeOutcome::AlreadySubscribed`], never inserted.
  fn subscribe(
    &self,
    trip_id: Uuid,
    chat_id: ChatId,
  ) -> impl Future<Output = Result<SubscribeOutcome, Self::Error>> + Send + '_;

  /// Returns `false` if the subscription does not exist.
  fn unsubscribe(
    &self,
    subscription_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// A chat's subscriptions joined with their trips, oldest subscription
  /// first.
  fn subscriptions_for_chat(
    &self,
    chat_id: ChatId,
  ) -> impl Future<Output = Result<Vec<SubscribedTrip>, Self::Error>> + Send + '_;
}
