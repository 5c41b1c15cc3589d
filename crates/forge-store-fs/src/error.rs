//! Error type for `forge-store-fs`.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Validation and parse failures from the domain layer.
  #[error(transparent)]
  Core(#[from] forge_core::Error),

  /// An I/O failure. In-memory state is untouched, so the caller may retry.
  #[error("failed to {action} {}: {source}", .path.display())]
  Persistence {
    action: &'static str,
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("malformed repository file {}: {source}", .path.display())]
  MalformedRepository {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("malformed log archive {}: {source}", .path.display())]
  MalformedArchive {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },

  /// An assessment file exists but does not hold a valid document.
  #[error("malformed assessment {}: {source}", .path.display())]
  MalformedAssessment {
    path:   PathBuf,
    #[source]
    source: forge_core::Error,
  },

  #[error("cannot derive a week key from {}", .0.display())]
  UnnamedSource(PathBuf),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
