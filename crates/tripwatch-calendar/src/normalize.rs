//! Title and participant-count normalisation.
//!
//! A link's text looks like `"Алтай (2/5/12)"`, but the triple may instead
//! sit in the text node after the link, or be split across the two. The rules,
//! in order:
//!
//! 1. match the trimmed title against `<text>[ "(" c "/" min "/" max ")" ]`;
//! 2. look for a `(c/min/max)` triple in the participants text;
//! 3. the participants triple wins over one embedded in the title;
//! 4. with no triple at all, retry rule 1 on title + the following node's
//!    raw text;
//! 5. split the triple into current / min / max.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tripwatch_core::trip::ParticipantCounts;

use crate::{error::NormalizeError, parse::RawCandidate};

static TITLE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(.*?)(?:\s*\(([0-9]+)/([0-9]+)/([0-9]+)\))?\s*$")
    .expect("title pattern is valid")
});

static PARTICIPANTS: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\(([0-9]+)/([0-9]+)/([0-9]+)\)").expect("participants pattern is valid")
});

/// Canonical trip text and its participant triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTitle {
  pub text:         String,
  pub participants: ParticipantCounts,
}

/// Normalise a title and the participants text next to it. Returns `None`
/// whenever [`try_normalize`] would fail.
pub fn normalize(title_text: &str, participants_text: &str) -> Option<NormalizedTitle> {
  try_normalize(title_text, participants_text).ok()
}

/// Rules 1–3 and 5, reporting which one failed.
pub fn try_normalize(
  title_text: &str,
  participants_text: &str,
) -> Result<NormalizedTitle, NormalizeError> {
  let title = TITLE
    .captures(title_text.trim())
    .ok_or_else(|| NormalizeError::TitleGrammar(title_text.to_owned()))?;

  let text = title.get(1).map_or("", |m| m.as_str()).trim().to_owned();
  let explicit = match PARTICIPANTS.captures(participants_text) {
    Some(caps) => triple_at(&caps, 1)?,
    None => None,
  };

  // The embedded triple only has to parse when it is the one used.
  let participants = match explicit {
    Some(triple) => triple,
    None => triple_at(&title, 2)?.ok_or(NormalizeError::MissingCounts)?,
  };
  if text.is_empty() {
    return Err(NormalizeError::EmptyTitle);
  }

  Ok(NormalizedTitle { text, participants })
}

/// All five rules for one parsed link, including the split-parenthetical
/// fallback.
pub fn normalize_candidate(
  candidate: &RawCandidate,
) -> Result<NormalizedTitle, NormalizeError> {
  match try_normalize(&candidate.title_text, &candidate.participants_text) {
    Err(NormalizeError::MissingCounts) => match &candidate.sibling_text {
      Some(sibling) => {
        let joined = format!("{}{}", candidate.title_text, sibling);
        try_normalize(&joined, "")
      }
      None => Err(NormalizeError::MissingCounts),
    },
    other => other,
  }
}

/// Read three consecutive capture groups starting at `first` as a triple.
/// `Ok(None)` if the groups did not participate in the match.
fn triple_at(
  caps: &Captures<'_>,
  first: usize,
) -> Result<Option<ParticipantCounts>, NormalizeError> {
  let mut values = [0u32; 3];
  for (offset, slot) in values.iter_mut().enumerate() {
    let Some(group) = caps.get(first + offset) else {
      return Ok(None);
    };
    *slot = group
      .as_str()
      .parse()
      .map_err(|_| NormalizeError::CountOutOfRange(group.as_str().to_owned()))?;
  }
  let [current, min, max] = values;
  Ok(Some(ParticipantCounts { current, min, max }))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn counts(current: u32, min: u32, max: u32) -> ParticipantCounts {
    ParticipantCounts { current, min, max }
  }

  fn raw(title: &str, participants: &str, sibling: Option<&str>) -> RawCandidate {
    RawCandidate {
      title_text:        title.into(),
      participants_text: participants.into(),
      month_name:        "Июнь".into(),
      source_url:        "/x".into(),
      sibling_text:      sibling.map(str::to_owned),
    }
  }

  #[test]
  fn embedded_triple_is_used_when_participants_empty() {
    let n = normalize("Trip A (2/3/10)", "").unwrap();
    assert_eq!(n.text, "Trip A");
    assert_eq!(n.participants, counts(2, 3, 10));
  }

  #[test]
  fn explicit_triple_is_used_for_plain_title() {
    let n = normalize("Trip A", "(5/3/10)").unwrap();
    assert_eq!(n.text, "Trip A");
    assert_eq!(n.participants, counts(5, 3, 10));
  }

  #[test]
  fn explicit_triple_wins_over_embedded() {
    let n = normalize("Trip A (2/3/10)", " (5/3/10) ").unwrap();
    assert_eq!(n.text, "Trip A");
    assert_eq!(n.participants, counts(5, 3, 10));
  }

  #[test]
  fn surrounding_whitespace_is_trimmed() {
    let n = normalize("\n  Алтай   (2/5/12)  \n", "").unwrap();
    assert_eq!(n.text, "Алтай");
  }

  #[test]
  fn inner_parentheses_stay_in_text() {
    let n = normalize("Карелия (сплав) (4/6/14)", "").unwrap();
    assert_eq!(n.text, "Карелия (сплав)");
    assert_eq!(n.participants, counts(4, 6, 14));
  }

  #[test]
  fn missing_counts_fail() {
    assert_eq!(try_normalize("Trip A", ""), Err(NormalizeError::MissingCounts));
    assert_eq!(try_normalize("Trip A (2/3)", "(1/2)"), Err(NormalizeError::MissingCounts));
    assert_eq!(normalize("Trip A", "no numbers"), None);
  }

  #[test]
  fn multiline_title_does_not_match() {
    assert!(matches!(
      try_normalize("Trip\nA (1/2/3)", ""),
      Err(NormalizeError::TitleGrammar(_))
    ));
  }

  #[test]
  fn empty_text_is_rejected() {
    assert_eq!(try_normalize("(1/2/3)", ""), Err(NormalizeError::EmptyTitle));
  }

  #[test]
  fn overflowing_count_is_rejected() {
    assert!(matches!(
      try_normalize("Trip (99999999999/1/2)", ""),
      Err(NormalizeError::CountOutOfRange(_))
    ));
  }

  #[test]
  fn explicit_triple_wins_over_unparsable_embedded() {
    let n = normalize("Trip (99999999999/1/2)", "(1/2/3)").unwrap();
    assert_eq!(n.text, "Trip");
    assert_eq!(n.participants, counts(1, 2, 3));
  }

  #[test]
  fn candidate_uses_participants_text_first() {
    let n = normalize_candidate(&raw("Эльбрус", " (3/4/10) ", Some(" (3/4/10) "))).unwrap();
    assert_eq!(n.participants, counts(3, 4, 10));
  }

  #[test]
  fn candidate_falls_back_to_split_parenthetical() {
    let n = normalize_candidate(&raw("Алтай (2/5/", "", Some("12)"))).unwrap();
    assert_eq!(n.text, "Алтай");
    assert_eq!(n.participants, counts(2, 5, 12));
  }

  #[test]
  fn candidate_fallback_without_numbers_fails() {
    let result = normalize_candidate(&raw("Алтай", "", Some(" — скоро")));
    assert_eq!(result, Err(NormalizeError::MissingCounts));
  }

  #[test]
  fn candidate_without_sibling_fails() {
    let result = normalize_candidate(&raw("Алтай", "", None));
    assert_eq!(result, Err(NormalizeError::MissingCounts));
  }
}
