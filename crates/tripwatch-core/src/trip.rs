//! Trips and their participant-count audit log.
//!
//! A trip is keyed by its title across update cycles: the calendar page has no
//! stable identifiers, so the title doubles as the natural dedup key.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Month;

// ─── Counts ──────────────────────────────────────────────────────────────────

/// The `(current/min/max)` participant triple published next to each trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantCounts {
  pub current: u32,
  pub min:     u32,
  pub max:     u32,
}

impl fmt::Display for ParticipantCounts {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}/{}", self.current, self.min, self.max)
  }
}

// ─── Trip ────────────────────────────────────────────────────────────────────

/// A persisted trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
  pub trip_id:      Uuid,
  /// Unique among live trips.
  pub title:        String,
  pub month:        Month,
  pub participants: ParticipantCounts,
  /// Link to the trip's own page on the source site.
  pub vk_url:       String,
  /// When the current participant count last changed (or the trip was first
  /// seen).
  pub last_updated: DateTime<Utc>,
}

/// A trip freshly parsed from the calendar page, before reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTrip {
  pub title:        String,
  pub month:        Month,
  pub participants: ParticipantCounts,
  pub vk_url:       String,
}

// ─── History ─────────────────────────────────────────────────────────────────

/// One append-only audit row, written each time a trip's current participant
/// count is seen to change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantHistory {
  pub history_id:   Uuid,
  pub trip_id:      Uuid,
  pub participants: u32,
  pub recorded_at:  DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn counts_display_as_slash_triple() {
    let counts = ParticipantCounts { current: 2, min: 5, max: 12 };
    assert_eq!(counts.to_string(), "2/5/12");
  }

  #[test]
  fn trip_serialises_month_as_number() {
    let trip = NewTrip {
      title:        "Алтай".into(),
      month:        Month::new(6).unwrap(),
      participants: ParticipantCounts { current: 2, min: 5, max: 12 },
      vk_url:       "https://vk.com/x".into(),
    };
    let json = serde_json::to_value(&trip).unwrap();
    assert_eq!(json["month"], 6);

    let back: NewTrip = serde_json::from_value(json).unwrap();
    assert_eq!(back, trip);
  }

  #[test]
  fn out_of_range_month_fails_to_deserialise() {
    let json = serde_json::json!({
      "title": "x",
      "month": 13,
      "participants": { "current": 1, "min": 1, "max": 1 },
      "vk_url": "",
    });
    assert!(serde_json::from_value::<NewTrip>(json).is_err());
  }
}
