//! [`RepoFile`] — the idea collection persisted as one JSON array.

use std::path::{Path, PathBuf};

use forge_core::{idea::Idea, repository::Repository};

use crate::{
  Error, Result,
  fs::{read_optional, write_atomic},
};

/// The on-disk location of a [`Repository`].
#[derive(Debug, Clone)]
pub struct RepoFile {
  path: PathBuf,
}

impl RepoFile {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }

  /// Read the whole collection.
  ///
  /// Returns `Ok(None)` when the file does not exist; callers may proceed with
  /// an empty repository.
  pub fn load(&self) -> Result<Option<Repository>> {
    let Some(text) = read_optional(&self.path)? else {
      tracing::warn!(path = %self.path.display(), "repository file not found");
      return Ok(None);
    };

    let ideas: Vec<Idea> = serde_json::from_str(&text)
      .map_err(|source| Error::MalformedRepository { path: self.path.clone(), source })?;
    let read = ideas.len();
    let repo: Repository = ideas.into_iter().collect();
    if repo.len() != read {
      tracing::warn!(
        path = %self.path.display(),
        duplicates = read - repo.len(),
        "repository file held duplicate idea ids; later records won"
      );
    }

    tracing::debug!(path = %self.path.display(), ideas = repo.len(), "loaded repository");
    Ok(Some(repo))
  }

  /// Write the whole collection, replacing the file atomically.
  pub fn save(&self, repo: &Repository) -> Result<()> {
    let json = serde_json::to_string_pretty(repo)?;
    write_atomic(&self.path, json.as_bytes())?;
    tracing::debug!(path = %self.path.display(), ideas = repo.len(), "saved repository");
    Ok(())
  }
}
