//! Error types for `forge-core`.

use thiserror::Error;

use crate::assessment::Dimension;

#[derive(Debug, Error)]
pub enum Error {
  /// A field the record contract requires was not supplied.
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("{field} must be an integer between 1 and 10, got {value}")]
  ScoreOutOfRange { field: &'static str, value: i64 },

  #[error("{0} must not be empty")]
  RequiredFieldEmpty(&'static str),

  #[error("an idea with id {0:?} already exists")]
  DuplicateId(String),

  #[error("idea id {0:?} cannot be used as a storage key")]
  InvalidIdeaId(String),

  #[error("{0} must be a JSON object")]
  NotAnObject(&'static str),

  #[error("expected a {expected} assessment, got a {actual} assessment")]
  DimensionMismatch {
    expected: Dimension,
    actual:   Dimension,
  },

  /// Structured text (a pasted reference list, an uploaded assessment) that
  /// failed to parse.
  #[error("malformed {what}: {source}")]
  Malformed {
    what:   &'static str,
    #[source]
    source: serde_json::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
