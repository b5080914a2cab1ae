//! Shared fixtures for the pipeline tests.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tripwatch_core::{
  Month,
  notify::Notifier,
  store::TripStore,
  subscription::{ChatId, SubscribeOutcome, SubscribedTrip, Subscription},
  trip::{NewTrip, ParticipantCounts, ParticipantHistory, Trip},
};
use tripwatch_store_sqlite::SqliteStore;
use uuid::Uuid;

use crate::{error::FetchError, fetch::PageSource};

pub async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

pub fn month(n: u8) -> Month { Month::new(n).unwrap() }

pub fn new_trip(title: &str, month_number: u8, current: u32) -> NewTrip {
  NewTrip {
    title:        title.into(),
    month:        month(month_number),
    participants: ParticipantCounts { current, min: 4, max: 12 },
    vk_url:       format!("https://vk.com/{title}"),
  }
}

#[derive(Debug, Error)]
#[error("chat {0} is unreachable")]
pub struct Unreachable(pub ChatId);

/// Records every message; sends to chats in `failing` fail.
#[derive(Default)]
pub struct RecordingNotifier {
  pub sent:    Mutex<Vec<(ChatId, String)>>,
  pub failing: Vec<ChatId>,
}

impl RecordingNotifier {
  pub fn failing(chats: impl IntoIterator<Item = i64>) -> Self {
    Self {
      sent:    Mutex::default(),
      failing: chats.into_iter().map(ChatId).collect(),
    }
  }

  pub fn sent(&self) -> Vec<(ChatId, String)> { self.sent.lock().unwrap().clone() }
}

impl Notifier for RecordingNotifier {
  type Error = Unreachable;

  async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<(), Unreachable> {
    if self.failing.contains(&chat_id) {
      return Err(Unreachable(chat_id));
    }
    self.sent.lock().unwrap().push((chat_id, text.to_owned()));
    Ok(())
  }
}

/// Serves a fixed page, replaceable between cycles. With no page set,
/// every fetch fails.
#[derive(Default)]
pub struct StaticSource {
  pub page: Mutex<Option<String>>,
}

impl StaticSource {
  pub fn new(page: &str) -> Self { Self { page: Mutex::new(Some(page.to_owned())) } }

  pub fn set(&self, page: &str) { *self.page.lock().unwrap() = Some(page.to_owned()); }
}

impl PageSource for StaticSource {
  async fn fetch(&self) -> Result<String, FetchError> {
    self
      .page
      .lock()
      .unwrap()
      .clone()
      .ok_or(FetchError::Status { status: 500, url: "test://calendar".into() })
  }
}

// ─── Failing store ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FlakyError {
  #[error("injected store failure")]
  Injected,

  #[error(transparent)]
  Store(#[from] tripwatch_store_sqlite::Error),
}

/// Wraps a [`SqliteStore`] and fails selected calls: title lookups for
/// `broken_title`, and deletes or subscriber lookups for `broken_ids`.
pub struct FlakyStore {
  pub inner:        SqliteStore,
  pub broken_title: Option<String>,
  pub broken_ids:   Mutex<Vec<Uuid>>,
}

impl FlakyStore {
  pub async fn new() -> Self {
    Self { inner: store().await, broken_title: None, broken_ids: Mutex::default() }
  }

  pub fn failing_title(mut self, title: &str) -> Self {
    self.broken_title = Some(title.to_owned());
    self
  }

  pub fn break_id(&self, id: Uuid) { self.broken_ids.lock().unwrap().push(id); }

  fn check_id(&self, id: Uuid) -> Result<(), FlakyError> {
    if self.broken_ids.lock().unwrap().contains(&id) {
      return Err(FlakyError::Injected);
    }
    Ok(())
  }
}

impl TripStore for FlakyStore {
  type Error = FlakyError;

  async fn list_trips(&self) -> Result<Vec<Trip>, FlakyError> {
    Ok(self.inner.list_trips().await?)
  }

  async fn get_trip(&self, id: Uuid) -> Result<Option<Trip>, FlakyError> {
    Ok(self.inner.get_trip(id).await?)
  }

  async fn find_trip_by_title(&self, title: &str) -> Result<Option<Trip>, FlakyError> {
    if self.broken_title.as_deref() == Some(title) {
      return Err(FlakyError::Injected);
    }
    Ok(self.inner.find_trip_by_title(title).await?)
  }

  async fn insert_trip(&self, trip: NewTrip) -> Result<Trip, FlakyError> {
    Ok(self.inner.insert_trip(trip).await?)
  }

  async fn update_participants(
    &self,
    id: Uuid,
    current: u32,
    at: DateTime<Utc>,
  ) -> Result<bool, FlakyError> {
    Ok(self.inner.update_participants(id, current, at).await?)
  }

  async fn delete_trip(&self, id: Uuid) -> Result<bool, FlakyError> {
    self.check_id(id)?;
    Ok(self.inner.delete_trip(id).await?)
  }

  async fn record_history(
    &self,
    trip_id: Uuid,
    participants: u32,
  ) -> Result<ParticipantHistory, FlakyError> {
    Ok(self.inner.record_history(trip_id, participants).await?)
  }

  async fn history_for_trip(&self, trip_id: Uuid) -> Result<Vec<ParticipantHistory>, FlakyError> {
    Ok(self.inner.history_for_trip(trip_id).await?)
  }

  async fn subscriptions_for_trip(&self, trip_id: Uuid) -> Result<Vec<Subscription>, FlakyError> {
    self.check_id(trip_id)?;
    Ok(self.inner.subscriptions_for_trip(trip_id).await?)
  }

  async fn subscribe(
    &self,
    trip_id: Uuid,
    chat_id: ChatId,
  ) -> Result<SubscribeOutcome, FlakyError> {
    Ok(self.inner.subscribe(trip_id, chat_id).await?)
  }

  async fn unsubscribe(&self, subscription_id: Uuid) -> Result<bool, FlakyError> {
    Ok(self.inner.unsubscribe(subscription_id).await?)
  }

  async fn subscriptions_for_chat(&self, chat_id: ChatId) -> Result<Vec<SubscribedTrip>, FlakyError> {
    Ok(self.inner.subscriptions_for_chat(chat_id).await?)
  }
}
