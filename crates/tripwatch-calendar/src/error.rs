//! Error types for the calendar pipeline.
//!
//! Every error here is scoped to a single candidate: the caller skips the
//! candidate, logs the error and moves on to the next one.

use thiserror::Error;

/// Why a link's text could not be turned into a title and a participant
/// triple.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
  #[error("title does not match the expected format: {0:?}")]
  TitleGrammar(String),

  #[error("title text is empty")]
  EmptyTitle,

  #[error("no participant counts in title or adjacent text")]
  MissingCounts,

  #[error("participant count out of range: {0}")]
  CountOutOfRange(String),
}

/// A candidate that was parsed from the page but cannot become a trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CandidateError {
  #[error("skipping {title:?}: {source}")]
  Normalize {
    title:  String,
    #[source]
    source: NormalizeError,
  },

  #[error("skipping {title:?}: unknown month header {month_name:?}")]
  UnknownMonth { title: String, month_name: String },
}
