//! The update cycle: Prune → Fetch → Parse → Reconcile.
//!
//! At most one cycle runs at a time. A trigger that arrives while a cycle is
//! in progress is rejected with [`CycleError::AlreadyRunning`]; it is not
//! queued.

use std::{sync::Arc, time::Instant};

use serde::Serialize;
use tokio::sync::Mutex;
use tripwatch_core::{Month, notify::Notifier, store::TripStore};

use crate::{
  error::CycleError,
  fetch::PageSource,
  prune::{PruneReport, prune_past_trips},
  reconcile::{ReconcileReport, reconcile},
};

/// Summary of one completed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleReport {
  pub month:      Month,
  pub pruned:     PruneReport,
  /// Trip links found on the page.
  pub candidates: usize,
  /// Links dropped during normalisation or month resolution.
  pub skipped:    usize,
  pub reconciled: ReconcileReport,
  pub elapsed_ms: u64,
}

pub struct UpdateCycle<S, N, P> {
  store:    Arc<S>,
  notifier: Arc<N>,
  source:   P,
  run_lock: Mutex<()>,
}

impl<S, N, P> UpdateCycle<S, N, P>
where
  S: TripStore,
  N: Notifier,
  P: PageSource,
{
  pub fn new(store: Arc<S>, notifier: Arc<N>, source: P) -> Self {
    Self { store, notifier, source, run_lock: Mutex::new(()) }
  }

  #[cfg(test)]
  fn is_running(&self) -> bool { self.run_lock.try_lock().is_err() }

  /// Run one cycle against the current local month.
  pub async fn run(&self) -> Result<CycleReport, CycleError> {
    self.run_for_month(Month::current()).await
  }

  /// Run one cycle treating `current` as the present month.
  pub async fn run_for_month(&self, current: Month) -> Result<CycleReport, CycleError> {
    let Ok(_running) = self.run_lock.try_lock() else {
      return Err(CycleError::AlreadyRunning);
    };
    let started = Instant::now();

    let pruned = match prune_past_trips(&*self.store, current).await {
      Ok(report) => report,
      Err(error) => {
        tracing::warn!(%error, "failed to list trips for pruning");
        PruneReport::default()
      }
    };

    let markup = self.source.fetch().await.inspect_err(|error| {
      tracing::warn!(%error, "calendar fetch failed; cycle aborted");
    })?;

    let mut trips = Vec::new();
    let mut skipped = 0;
    let results = tripwatch_calendar::extract_trips(&markup);
    let candidates = results.len();
    for result in results {
      match result {
        Ok(trip) => trips.push(trip),
        Err(error) => {
          tracing::warn!(%error, "skipping calendar entry");
          skipped += 1;
        }
      }
    }

    let reconciled = reconcile(&*self.store, &*self.notifier, &trips).await;

    let report = CycleReport {
      month: current,
      pruned,
      candidates,
      skipped,
      reconciled,
      elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    };

    tracing::info!(
      month = %report.month,
      pruned = report.pruned.deleted,
      candidates = report.candidates,
      skipped = report.skipped,
      inserted = report.reconciled.inserted,
      updated = report.reconciled.updated,
      notified = report.reconciled.notifications.sent,
      elapsed_ms = report.elapsed_ms,
      "update cycle finished"
    );

    Ok(report)
  }
}
