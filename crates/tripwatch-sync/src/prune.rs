//! Removal of trips whose month has already passed.

use serde::Serialize;
use tripwatch_core::{Month, store::TripStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PruneReport {
  pub deleted: usize,
  pub failed:  usize,
}

/// Delete every trip with `month < current`, cascading to its subscriptions
/// and history.
///
/// Only listing the trips can fail the whole call; a failed delete is logged
/// and counted, and the remaining trips are still considered.
pub async fn prune_past_trips<S: TripStore>(
  store: &S,
  current: Month,
) -> Result<PruneReport, S::Error> {
  let mut report = PruneReport::default();

  for trip in store.list_trips().await? {
    if trip.month >= current {
      continue;
    }
    match store.delete_trip(trip.trip_id).await {
      Ok(_) => {
        tracing::debug!(title = %trip.title, month = %trip.month, "pruned past trip");
        report.deleted += 1;
      }
      Err(error) => {
        tracing::warn!(title = %trip.title, %error, "failed to prune trip");
        report.failed += 1;
      }
    }
  }

  Ok(report)
}
