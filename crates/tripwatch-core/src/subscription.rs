//! Subscriptions: which chats want to hear about which trips.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::trip::Trip;

/// An opaque notification target on the chat platform.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// A chat's subscription to one trip. Owned by the trip: deleting the trip
/// deletes its subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
  pub subscription_id: Uuid,
  pub trip_id:         Uuid,
  pub chat_id:         ChatId,
  pub created_at:      DateTime<Utc>,
}

/// A subscription joined with the trip it points at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribedTrip {
  pub subscription: Subscription,
  pub trip:         Trip,
}

/// Result of a subscribe attempt. At most one subscription exists per
/// `(trip, chat)` pair, so a repeat attempt is rejected rather than inserted.
#[derive(Debug, Clone)]
pub enum SubscribeOutcome {
  Created(Subscription),
  AlreadySubscribed,
  UnknownTrip,
}
