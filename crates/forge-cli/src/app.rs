//! The operations the command line drives, over the configured stores.

use anyhow::{Context as _, Result, anyhow};
use forge_core::{
  draft::IdeaDraft,
  idea::Idea,
  overlay::Selection,
  repository::{Repository, SaveOutcome},
};
use forge_store_fs::{ArchiveLoad, FsAssessmentStore, LogArchiveLoader, RepoFile};

use crate::settings::Settings;

pub type IdeaSelection = Selection<forge_store_fs::Error>;

/// Top-level application state for one invocation.
pub struct App {
  repo_file:       RepoFile,
  /// The in-memory collection, read on first use and only written back by
  /// [`App::persist`].
  repo:            Option<Repository>,
  pub assessments: FsAssessmentStore,
  archives:        LogArchiveLoader,
}

/// Load `file` into `slot` unless an earlier call already did.
fn loaded<'a>(slot: &'a mut Option<Repository>, file: &RepoFile) -> Result<&'a mut Repository> {
  match *slot {
    Some(ref mut repo) => Ok(repo),
    None => {
      let repo = file
        .load()
        .with_context(|| format!("loading {}", file.path().display()))?
        .unwrap_or_default();
      Ok(slot.insert(repo))
    }
  }
}

impl App {
  /// Open the stores named by `settings`. Nothing is read until a command
  /// needs it, so a broken repository file does not block the archive and
  /// assessment commands.
  pub fn open(settings: &Settings) -> Self {
    Self {
      repo_file:   RepoFile::new(&settings.repo_path),
      repo:        None,
      assessments: FsAssessmentStore::new(&settings.evaluations_dir),
      archives:    LogArchiveLoader::from_dirs(&settings.json_logs_dir, &settings.md_logs_dir),
    }
  }

  /// The idea collection, loading it on first use.
  pub fn repository(&mut self) -> Result<&mut Repository> {
    loaded(&mut self.repo, &self.repo_file)
  }

  pub fn find(&mut self, idea_id: &str) -> Result<&Idea> {
    self.repository()?.find(idea_id).ok_or_else(|| anyhow!("idea not found: {idea_id}"))
  }

  /// Open an idea with its assessment overlay applied.
  pub fn select(&mut self, idea_id: &str) -> Result<IdeaSelection> {
    let idea = loaded(&mut self.repo, &self.repo_file)?
      .find(idea_id)
      .ok_or_else(|| anyhow!("idea not found: {idea_id}"))?;
    let selection = Selection::open(idea, &self.assessments);
    for failure in &selection.overlay.failures {
      tracing::warn!(
        idea_id,
        dimension = %failure.dimension,
        error = %failure.error,
        "ignoring unreadable assessment"
      );
    }
    Ok(selection)
  }

  /// Validate `draft` and save it over the record `previous_id` selected, or
  /// as a new record, then write the collection to disk. A new record whose
  /// id is already taken is rejected.
  pub fn save(&mut self, previous_id: Option<&str>, draft: IdeaDraft) -> Result<(SaveOutcome, String)> {
    let idea = draft.into_idea()?;
    let idea_id = idea.idea_id.clone();
    let repo = self.repository()?;
    let outcome = match previous_id {
      Some(previous_id) => repo.save_edit(Some(previous_id), idea)?,
      None => repo.insert_new(idea)?,
    };
    self.persist()?;
    Ok((outcome, idea_id))
  }

  /// Remove an idea and write the collection to disk. Absent ids are a no-op.
  pub fn delete(&mut self, idea_id: &str) -> Result<Option<Idea>> {
    let removed = self.repository()?.delete(idea_id);
    if removed.is_some() {
      self.persist()?;
    }
    Ok(removed)
  }

  /// Write the collection to disk. A collection that was never loaded has
  /// nothing to write.
  pub fn persist(&self) -> Result<()> {
    let Some(repo) = &self.repo else { return Ok(()) };
    self
      .repo_file
      .save(repo)
      .with_context(|| format!("saving {}", self.repo_file.path().display()))
  }

  /// Load the weekly log archives. Only provenance and narrative lookups need
  /// them; skipped sources are logged by the loader and listed in the result.
  pub fn load_archives(&self) -> ArchiveLoad { self.archives.load() }
}
