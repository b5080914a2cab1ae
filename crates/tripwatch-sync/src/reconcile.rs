//! Diffing parsed trips against the store.
//!
//! Each candidate is matched on its exact title and ends in one of three
//! ways: inserted (new title), updated (current count changed) or left alone.
//! An update writes the new count, appends one history row and notifies the
//! trip's subscribers with the candidate's full triple.

use chrono::Utc;
use serde::Serialize;
use tripwatch_core::{notify::Notifier, store::TripStore, trip::NewTrip};
use uuid::Uuid;

use crate::dispatch::{DispatchReport, dispatch};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
  pub inserted:      usize,
  pub updated:       usize,
  pub unchanged:     usize,
  /// Candidates abandoned because of a store error.
  pub failed:        usize,
  pub notifications: DispatchReport,
}

enum Outcome {
  Inserted,
  Unchanged,
  Updated { trip_id: Uuid, previous: u32 },
}

/// Reconcile every candidate in page order.
///
/// A store failure abandons that candidate only. Notification failures are
/// counted in [`ReconcileReport::notifications`].
pub async fn reconcile<S, N>(store: &S, notifier: &N, trips: &[NewTrip]) -> ReconcileReport
where
  S: TripStore,
  N: Notifier,
{
  let mut report = ReconcileReport::default();

  for trip in trips {
    match reconcile_one(store, trip).await {
      Ok(Outcome::Inserted) => {
        tracing::debug!(title = %trip.title, "new trip");
        report.inserted += 1;
      }
      Ok(Outcome::Unchanged) => report.unchanged += 1,
      Ok(Outcome::Updated { trip_id, previous }) => {
        tracing::info!(
          title = %trip.title,
          from = previous,
          to = trip.participants.current,
          "participant count changed"
        );
        report.updated += 1;

        match store.subscriptions_for_trip(trip_id).await {
          Ok(subs) => {
            let chats: Vec<_> = subs.into_iter().map(|s| s.chat_id).collect();
            report.notifications +=
              dispatch(notifier, &trip.title, trip.participants, &chats).await;
          }
          Err(error) => {
            tracing::warn!(title = %trip.title, %error, "failed to load subscribers");
          }
        }
      }
      Err(error) => {
        tracing::warn!(title = %trip.title, %error, "failed to reconcile trip");
        report.failed += 1;
      }
    }
  }

  report
}

async fn reconcile_one<S: TripStore>(store: &S, trip: &NewTrip) -> Result<Outcome, S::Error> {
  let Some(existing) = store.find_trip_by_title(&trip.title).await? else {
    store.insert_trip(trip.clone()).await?;
    return Ok(Outcome::Inserted);
  };

  let current = trip.participants.current;
  if existing.participants.current == current {
    return Ok(Outcome::Unchanged);
  }

  store
    .update_participants(existing.trip_id, current, Utc::now())
    .await?;
  store.record_history(existing.trip_id, current).await?;

  Ok(Outcome::Updated {
    trip_id:  existing.trip_id,
    previous: existing.participants.current,
  })
}
