//! Error types for the sync pipeline.
//!
//! Only [`CycleError`] ever escapes an update cycle. Store and notification
//! failures are logged and counted where they happen.

use thiserror::Error;

/// The calendar page could not be retrieved. Aborts the current cycle.
#[derive(Debug, Error)]
pub enum FetchError {
  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{url} answered {status}")]
  Status { status: u16, url: String },
}

/// A message could not be delivered to one chat.
#[derive(Debug, Error)]
pub enum NotifyError {
  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  /// Transport failure. The request URL (which embeds the bot token) is
  /// stripped before the error is stored.
  #[error("request failed: {0}")]
  Http(#[source] reqwest::Error),

  #[error("chat API rejected the message ({status}): {description}")]
  Rejected { status: u16, description: String },
}

/// Why an update cycle did not complete.
#[derive(Debug, Error)]
pub enum CycleError {
  #[error("an update cycle is already running")]
  AlreadyRunning,

  #[error("fetching the calendar page failed: {0}")]
  Fetch(#[from] FetchError),
}
