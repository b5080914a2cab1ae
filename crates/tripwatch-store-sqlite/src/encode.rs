//! Encoding and decoding helpers between domain types and the plain column
//! representations stored in SQLite.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings so they sort
//! lexically. UUIDs are stored as hyphenated lowercase strings. Counts,
//! months and chat ids are plain integers.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use tripwatch_core::{
  Month,
  subscription::{ChatId, Subscription},
  trip::{ParticipantCounts, ParticipantHistory, Trip},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

/// The current time at the precision timestamps are stored with, so a value
/// handed back to the caller equals the one read back later.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_count(column: &'static str, value: i64) -> Result<u32> {
  u32::try_from(value).map_err(|_| Error::OutOfRange { column, value })
}

fn decode_month(value: i64) -> Result<Month> {
  let number =
    u8::try_from(value).map_err(|_| Error::OutOfRange { column: "month", value })?;
  Ok(Month::try_from(number)?)
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// Column list matching [`RawTrip::from_row`].
pub const TRIP_COLUMNS: &str = "trip_id, title, month, current_participants, \
                                min_participants, max_participants, vk_url, \
                                last_updated";

/// A `trips` row as read from SQLite, before validation.
pub struct RawTrip {
  pub trip_id:      String,
  pub title:        String,
  pub month:        i64,
  pub current:      i64,
  pub min:          i64,
  pub max:          i64,
  pub vk_url:       String,
  pub last_updated: String,
}

impl RawTrip {
  /// Read the [`TRIP_COLUMNS`] starting at column `offset`.
  pub fn from_row(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      trip_id:      row.get(offset)?,
      title:        row.get(offset + 1)?,
      month:        row.get(offset + 2)?,
      current:      row.get(offset + 3)?,
      min:          row.get(offset + 4)?,
      max:          row.get(offset + 5)?,
      vk_url:       row.get(offset + 6)?,
      last_updated: row.get(offset + 7)?,
    })
  }

  pub fn into_trip(self) -> Result<Trip> {
    Ok(Trip {
      trip_id:      decode_uuid(&self.trip_id)?,
      title:        self.title,
      month:        decode_month(self.month)?,
      participants: ParticipantCounts {
        current: decode_count("current_participants", self.current)?,
        min:     decode_count("min_participants", self.min)?,
        max:     decode_count("max_participants", self.max)?,
      },
      vk_url:       self.vk_url,
      last_updated: decode_dt(&self.last_updated)?,
    })
  }
}

/// A `subscriptions` row as read from SQLite.
pub struct RawSubscription {
  pub subscription_id: String,
  pub trip_id:         String,
  pub chat_id:         i64,
  pub created_at:      String,
}

impl RawSubscription {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      subscription_id: row.get(0)?,
      trip_id:         row.get(1)?,
      chat_id:         row.get(2)?,
      created_at:      row.get(3)?,
    })
  }

  pub fn into_subscription(self) -> Result<Subscription> {
    Ok(Subscription {
      subscription_id: decode_uuid(&self.subscription_id)?,
      trip_id:         decode_uuid(&self.trip_id)?,
      chat_id:         ChatId(self.chat_id),
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

/// A `participant_history` row as read from SQLite.
pub struct RawHistory {
  pub history_id:   String,
  pub trip_id:      String,
  pub participants: i64,
  pub created_at:   String,
}

impl RawHistory {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      history_id:   row.get(0)?,
      trip_id:      row.get(1)?,
      participants: row.get(2)?,
      created_at:   row.get(3)?,
    })
  }

  pub fn into_history(self) -> Result<ParticipantHistory> {
    Ok(ParticipantHistory {
      history_id:   decode_uuid(&self.history_id)?,
      trip_id:      decode_uuid(&self.trip_id)?,
      participants: decode_count("participants", self.participants)?,
      recorded_at:  decode_dt(&self.created_at)?,
    })
  }
}
