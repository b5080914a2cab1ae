//! Calendar months and the name table used by the source page headers.

use std::fmt;

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Month names as they appear in the calendar page headers, indexed by
/// `number - 1`.
const MONTH_NAMES: [&str; 12] = [
  "Январь",
  "Февраль",
  "Март",
  "Апрель",
  "Май",
  "Июнь",
  "Июль",
  "Август",
  "Сентябрь",
  "Октябрь",
  "Ноябрь",
  "Декабрь",
];

/// A calendar month, always in `1..=12`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(u8);

impl Month {
  pub fn new(number: u8) -> Option<Self> {
    (1..=12).contains(&number).then_some(Self(number))
  }

  /// Resolve a header text such as `"Июнь"` to its month.
  ///
  /// Surrounding whitespace and letter case are ignored; anything else that
  /// is not an exact table entry (typos, another locale, empty text) yields
  /// `None`.
  pub fn from_name(name: &str) -> Option<Self> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
      return None;
    }
    MONTH_NAMES
      .iter()
      .position(|candidate| candidate.to_lowercase() == wanted)
      .map(|idx| Self(idx as u8 + 1))
  }

  /// The month the local wall clock is currently in.
  pub fn current() -> Self { Self(Local::now().month() as u8) }

  pub fn number(self) -> u8 { self.0 }

  pub fn name(self) -> &'static str { MONTH_NAMES[usize::from(self.0 - 1)] }
}

impl TryFrom<u8> for Month {
  type Error = Error;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Self::new(value).ok_or(Error::InvalidMonth(value))
  }
}

impl From<Month> for u8 {
  fn from(month: Month) -> Self { month.0 }
}

impl fmt::Display for Month {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}
