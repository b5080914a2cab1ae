//! The tripwatch update pipeline.
//!
//! An [`UpdateCycle`] prunes trips from past months, fetches the calendar
//! page through a [`PageSource`], reconciles the parsed trips with a
//! [`TripStore`](tripwatch_core::store::TripStore) and tells subscribers about
//! participant-count changes through a
//! [`Notifier`](tripwatch_core::notify::Notifier).

#![allow(async_fn_in_trait)]

pub mod cycle;
pub mod dispatch;
pub mod error;
pub mod fetch;
pub mod prune;
pub mod reconcile;
pub mod telegram;

#[cfg(test)]
mod test_support;

pub use cycle::{CycleReport, UpdateCycle};
pub use error::{CycleError, FetchError, NotifyError};
pub use fetch::{HttpPageSource, PageSource};
pub use telegram::TelegramNotifier;
