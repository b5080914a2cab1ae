//! Error types for `tripwatch-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("month out of range: {0} (expected 1-12)")]
  InvalidMonth(u8),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
