//! [`FsAssessmentStore`] — one JSON file per `(idea_id, dimension)`.
//!
//! Files are named `{idea_id}_{dimension}.json`. The dimension is always the
//! segment after the last separator and comes from a closed set, so distinct
//! pairs never share a file.

use std::path::PathBuf;

use forge_core::assessment::{AssessmentDocument, AssessmentSource, Dimension};
use strum::IntoEnumIterator as _;

use crate::{
  Error, Result,
  fs::{read_optional, write_atomic},
};

pub const SEPARATOR: char = '_';

/// Assessments stored under a single directory.
#[derive(Debug, Clone)]
pub struct FsAssessmentStore {
  dir: PathBuf,
}

impl FsAssessmentStore {
  pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

  /// The file backing `(idea_id, dimension)`.
  ///
  /// Fails for identifiers that would escape the store directory.
  pub fn path_for(&self, idea_id: &str, dimension: Dimension) -> Result<PathBuf> {
    let unsafe_id = idea_id.is_empty()
      || idea_id == "."
      || idea_id == ".."
      || idea_id.contains(['/', '\\', '\0']);
    if unsafe_id {
      return Err(forge_core::Error::InvalidIdeaId(idea_id.to_owned()).into());
    }
    Ok(self.dir.join(format!("{idea_id}{SEPARATOR}{dimension}.json")))
  }

  /// Validate `document` against `dimension`, then overwrite whatever was
  /// stored for the pair. Nothing is written if validation fails.
  pub fn save(
    &self,
    idea_id: &str,
    dimension: Dimension,
    document: &AssessmentDocument,
  ) -> Result<PathBuf> {
    document.expect_dimension(dimension)?;
    let path = self.path_for(idea_id, dimension)?;
    let json = serde_json::to_string_pretty(document)?;
    write_atomic(&path, json.as_bytes())?;
    tracing::debug!(idea_id, %dimension, path = %path.display(), "saved assessment");
    Ok(path)
  }

  /// Parse pasted or uploaded document text and save it.
  pub fn save_text(
    &self,
    idea_id: &str,
    dimension: Dimension,
    text: &str,
  ) -> Result<AssessmentDocument> {
    let document = AssessmentDocument::parse(dimension, text)?;
    self.save(idea_id, dimension, &document)?;
    Ok(document)
  }

  /// The dimensions with a document on disk for `idea_id`.
  pub fn list_for(&self, idea_id: &str) -> Result<Vec<Dimension>> {
    let mut present = Vec::new();
    for dimension in Dimension::iter() {
      if self.path_for(idea_id, dimension)?.is_file() {
        present.push(dimension);
      }
    }
    Ok(present)
  }
}

impl AssessmentSource for FsAssessmentStore {
  type Error = Error;

  /// `Ok(None)` if the file is absent; [`Error::MalformedAssessment`] if it
  /// exists but is not a valid document for `dimension`.
  fn load(&self, idea_id: &str, dimension: Dimension) -> Result<Option<AssessmentDocument>> {
    let path = self.path_for(idea_id, dimension)?;
    let Some(text) = read_optional(&path)? else {
      return Ok(None);
    };
    match AssessmentDocument::parse(dimension, &text) {
      Ok(document) => Ok(Some(document)),
      Err(source) => {
        tracing::warn!(path = %path.display(), error = %source, "unreadable assessment");
        Err(Error::MalformedAssessment { path, source })
      }
    }
  }
}
