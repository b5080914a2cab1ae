//! [`SqliteStore`]: the SQLite implementation of [`TripStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension as _, ffi};
use uuid::Uuid;

use tripwatch_core::{
  store::TripStore,
  subscription::{ChatId, SubscribeOutcome, SubscribedTrip, Subscription},
  trip::{NewTrip, ParticipantHistory, Trip},
};

use crate::{
  Result,
  encode::{
    RawHistory, RawSubscription, RawTrip, TRIP_COLUMNS, encode_dt, encode_uuid, now,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A tripwatch store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// How an `INSERT INTO subscriptions` ended.
enum SubscribeInsert {
  Inserted,
  Duplicate,
  MissingTrip,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, used by tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn query_trip(&self, column: &'static str, value: String) -> Result<Option<Trip>> {
    let raw: Option<RawTrip> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {TRIP_COLUMNS} FROM trips WHERE {column} = ?1"),
            rusqlite::params![value],
            |row| RawTrip::from_row(row, 0),
          )
          .optional()?)
      })
      .await?;

    raw.map(RawTrip::into_trip).transpose()
  }
}

// ─── TripStore impl ──────────────────────────────────────────────────────────

impl TripStore for SqliteStore {
  type Error = crate::Error;

  // ── Trips ─────────────────────────────────────────────────────────────────

  async fn list_trips(&self) -> Result<Vec<Trip>> {
    let raws: Vec<RawTrip> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TRIP_COLUMNS} FROM trips ORDER BY month, title"
        ))?;
        let rows = stmt
          .query_map([], |row| RawTrip::from_row(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTrip::into_trip).collect()
  }

  async fn get_trip(&self, id: Uuid) -> Result<Option<Trip>> {
    self.query_trip("trip_id", encode_uuid(id)).await
  }

  async fn find_trip_by_title(&self, title: &str) -> Result<Option<Trip>> {
    self.query_trip("title", title.to_owned()).await
  }

  async fn insert_trip(&self, input: NewTrip) -> Result<Trip> {
    let trip = Trip {
      trip_id:      Uuid::new_v4(),
      title:        input.title,
      month:        input.month,
      participants: input.participants,
      vk_url:       input.vk_url,
      last_updated: now(),
    };

    let id_str     = encode_uuid(trip.trip_id);
    let title      = trip.title.clone();
    let month      = trip.month.number();
    let counts     = trip.participants;
    let vk_url     = trip.vk_url.clone();
    let updated_at = encode_dt(trip.last_updated);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO trips (
             trip_id, title, month,
             current_participants, min_participants, max_participants,
             vk_url, last_updated
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str,
            title,
            month,
            counts.current,
            counts.min,
            counts.max,
            vk_url,
            updated_at,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(trip)
  }

  async fn update_participants(
    &self,
    id:      Uuid,
    current: u32,
    at:      DateTime<Utc>,
  ) -> Result<bool> {
    let id_str = encode_uuid(id);
    let at_str = encode_dt(at);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE trips SET current_participants = ?2, last_updated = ?3
           WHERE trip_id = ?1",
          rusqlite::params![id_str, current, at_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn delete_trip(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM trips WHERE trip_id = ?1", rusqlite::params![id_str])?)
      })
      .await?;

    Ok(deleted > 0)
  }

  // ── History ───────────────────────────────────────────────────────────────

  async fn record_history(&self, trip_id: Uuid, participants: u32) -> Result<ParticipantHistory> {
    let entry = ParticipantHistory {
      history_id: Uuid::new_v4(),
      trip_id,
      participants,
      recorded_at: now(),
    };

    let hist_id_str = encode_uuid(entry.history_id);
    let trip_id_str = encode_uuid(trip_id);
    let at_str      = encode_dt(entry.recorded_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO participant_history (history_id, trip_id, participants, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![hist_id_str, trip_id_str, participants, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(entry)
  }

  async fn history_for_trip(&self, trip_id: Uuid) -> Result<Vec<ParticipantHistory>> {
    let trip_id_str = encode_uuid(trip_id);

    let raws: Vec<RawHistory> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT history_id, trip_id, participants, created_at
           FROM participant_history
           WHERE trip_id = ?1
           ORDER BY created_at, rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![trip_id_str], RawHistory::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawHistory::into_history).collect()
  }

  // ── Subscriptions ─────────────────────────────────────────────────────────

  async fn subscriptions_for_trip(&self, trip_id: Uuid) -> Result<Vec<Subscription>> {
    let trip_id_str = encode_uuid(trip_id);

    let raws: Vec<RawSubscription> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT subscription_id, trip_id, chat_id, created_at
           FROM subscriptions
           WHERE trip_id = ?1
           ORDER BY created_at, rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![trip_id_str], RawSubscription::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubscription::into_subscription).collect()
  }

  async fn subscribe(&self, trip_id: Uuid, chat_id: ChatId) -> Result<SubscribeOutcome> {
    let subscription = Subscription {
      subscription_id: Uuid::new_v4(),
      trip_id,
      chat_id,
      created_at: now(),
    };

    let sub_id_str  = encode_uuid(subscription.subscription_id);
    let trip_id_str = encode_uuid(trip_id);
    let at_str      = encode_dt(subscription.created_at);

    let insert = self
      .conn
      .call(move |conn| {
        let result = conn.execute(
          "INSERT INTO subscriptions (subscription_id, trip_id, chat_id, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![sub_id_str, trip_id_str, chat_id.0, at_str],
        );
        match result {
          Ok(_) => Ok(SubscribeInsert::Inserted),
          Err(rusqlite::Error::SqliteFailure(err, _))
            if err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
          {
            Ok(SubscribeInsert::Duplicate)
          }
          Err(rusqlite::Error::SqliteFailure(err, _))
            if err.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
          {
            Ok(SubscribeInsert::MissingTrip)
          }
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(match insert {
      SubscribeInsert::Inserted => SubscribeOutcome::Created(subscription),
      SubscribeInsert::Duplicate => SubscribeOutcome::AlreadySubscribed,
      SubscribeInsert::MissingTrip => SubscribeOutcome::UnknownTrip,
    })
  }

  async fn unsubscribe(&self, subscription_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(subscription_id);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM subscriptions WHERE subscription_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }

  async fn subscriptions_for_chat(&self, chat_id: ChatId) -> Result<Vec<SubscribedTrip>> {
    let raws: Vec<(RawSubscription, RawTrip)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             s.subscription_id, s.trip_id, s.chat_id, s.created_at,
             t.trip_id, t.title, t.month,
             t.current_participants, t.min_participants, t.max_participants,
             t.vk_url, t.last_updated
           FROM subscriptions s
           JOIN trips t ON t.trip_id = s.trip_id
           WHERE s.chat_id = ?1
           ORDER BY s.created_at, s.rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![chat_id.0], |row| {
            Ok((RawSubscription::from_row(row)?, RawTrip::from_row(row, 4)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(sub, trip)| {
        Ok(SubscribedTrip {
          subscription: sub.into_subscription()?,
          trip:         trip.into_trip()?,
        })
      })
      .collect()
  }
}
