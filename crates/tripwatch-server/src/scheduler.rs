//! Periodic triggering of the update cycle.

use std::{sync::Arc, time::Duration};

use tokio::time::{self, MissedTickBehavior};
use tripwatch_core::{notify::Notifier, store::TripStore};
use tripwatch_sync::{CycleError, PageSource, UpdateCycle};

/// Run a cycle now and then once every `period`, forever.
///
/// A tick that lands while a cycle is still running is rejected by the cycle
/// itself; ticks missed while busy are skipped rather than bunched up.
pub async fn run_periodically<S, N, P>(cycle: Arc<UpdateCycle<S, N, P>>, period: Duration)
where
  S: TripStore,
  N: Notifier,
  P: PageSource,
{
  let mut ticker = time::interval(period);
  ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

  loop {
    ticker.tick().await;
    trigger(&cycle).await;
  }
}

/// Run one cycle and log its outcome. Never fails.
pub async fn trigger<S, N, P>(cycle: &UpdateCycle<S, N, P>)
where
  S: TripStore,
  N: Notifier,
  P: PageSource,
{
  match cycle.run().await {
    Ok(_) => {}
    Err(CycleError::AlreadyRunning) => {
      tracing::info!("update cycle still running; trigger ignored");
    }
    Err(error) => tracing::error!(%error, "update cycle failed"),
  }
}
