//! Calendar page → trip candidates.
//!
//! Turns the markup of the published trip calendar into [`NewTrip`] records.
//! Pure synchronous; no HTTP or database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! let page = r#"<cite>Июнь</cite><cite><a href="https://vk.com/x">Алтай (2/5/12)</a></cite>"#;
//! for result in tripwatch_calendar::extract_trips(page) {
//!   match result {
//!     Ok(trip) => println!("{} in {}: {}", trip.title, trip.month, trip.participants),
//!     Err(skipped) => eprintln!("{skipped}"),
//!   }
//! }
//! ```

pub mod error;
mod html;
mod normalize;
mod parse;

pub use error::{CandidateError, NormalizeError};
pub use normalize::{NormalizedTitle, normalize, normalize_candidate, try_normalize};
pub use parse::{RawCandidate, parse_calendar};
use tripwatch_core::{Month, trip::NewTrip};

/// Parse, normalise and month-resolve every trip link on the page.
///
/// Each candidate yields `Ok(…)` or `Err(…)` in its document position; a bad
/// candidate never affects the others.
pub fn extract_trips(markup: &str) -> Vec<Result<NewTrip, CandidateError>> {
  parse_calendar(markup).into_iter().map(into_trip).collect()
}

fn into_trip(candidate: RawCandidate) -> Result<NewTrip, CandidateError> {
  let normalized =
    normalize_candidate(&candidate).map_err(|source| CandidateError::Normalize {
      title: candidate.title_text.clone(),
      source,
    })?;

  let month = Month::from_name(&candidate.month_name).ok_or_else(|| {
    CandidateError::UnknownMonth {
      title:      normalized.text.clone(),
      month_name: candidate.month_name.clone(),
    }
  })?;

  Ok(NewTrip {
    title: normalized.text,
    month,
    participants: normalized.participants,
    vk_url: candidate.source_url,
  })
}
