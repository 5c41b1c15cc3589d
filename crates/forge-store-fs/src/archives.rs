//! Best-effort loading of weekly log archives into a
//! [`LogArchiveIndex`].
//!
//! A source that cannot be read or parsed is recorded as a
//! [`SourceFailure`] and skipped; the remaining sources still load.

use std::{
  fs,
  io,
  path::{Path, PathBuf},
};

use forge_core::archive::{LogArchiveIndex, LogArchiveIndexBuilder, WeekArchive};

use crate::{
  Error, Result,
  fs::{persistence, read_optional},
};

pub const STRUCTURED_EXTENSION: &str = "json";
pub const NARRATIVE_EXTENSION: &str = "md";

/// A source skipped during a load.
#[derive(Debug)]
pub struct SourceFailure {
  pub path:  PathBuf,
  pub error: Error,
}

/// The (possibly partial) index from one load pass, with what was skipped.
#[derive(Debug, Default)]
pub struct ArchiveLoad {
  pub index:    LogArchiveIndex,
  pub failures: Vec<SourceFailure>,
}

/// The week key for a source: its file name with `extension` stripped.
/// Names without that extension are used whole.
pub fn week_key(path: &Path, extension: &str) -> Option<String> {
  let name = path.file_name()?.to_str()?;
  let key = name
    .strip_suffix(extension)
    .and_then(|stem| stem.strip_suffix('.'))
    .unwrap_or(name);
  (!key.is_empty()).then(|| key.to_owned())
}

/// Load structured and narrative sources into one index.
///
/// Sources sharing a week key merge into one archive: structured fields from
/// the structured source, narrative text from the narrative source. A
/// narrative with no structured counterpart gets an otherwise empty archive.
pub fn load_archives<S, N>(structured: S, narrative: N) -> ArchiveLoad
where
  S: IntoIterator,
  S::Item: AsRef<Path>,
  N: IntoIterator,
  N::Item: AsRef<Path>,
{
  let mut builder = LogArchiveIndexBuilder::new();
  let mut failures = Vec::new();

  for path in structured {
    let path = path.as_ref();
    match read_structured(path) {
      Ok((week, archive)) => builder.structured(week, archive),
      Err(error) => {
        tracing::warn!(path = %path.display(), %error, "skipping structured log");
        failures.push(SourceFailure { path: path.to_path_buf(), error });
      }
    }
  }

  for path in narrative {
    let path = path.as_ref();
    match read_narrative(path) {
      Ok((week, text)) => builder.narrative(week, text),
      Err(error) => {
        tracing::warn!(path = %path.display(), %error, "skipping narrative log");
        failures.push(SourceFailure { path: path.to_path_buf(), error });
      }
    }
  }

  let index = builder.build();
  tracing::debug!(weeks = index.len(), failures = failures.len(), "loaded log archives");
  ArchiveLoad { index, failures }
}

fn read_structured(path: &Path) -> Result<(String, WeekArchive)> {
  let week =
    week_key(path, STRUCTURED_EXTENSION).ok_or_else(|| Error::UnnamedSource(path.to_path_buf()))?;
  let text = read_required(path)?;
  let archive = serde_json::from_str(&text)
    .map_err(|source| Error::MalformedArchive { path: path.to_path_buf(), source })?;
  Ok((week, archive))
}

fn read_narrative(path: &Path) -> Result<(String, String)> {
  let week =
    week_key(path, NARRATIVE_EXTENSION).ok_or_else(|| Error::UnnamedSource(path.to_path_buf()))?;
  Ok((week, read_required(path)?))
}

fn read_required(path: &Path) -> Result<String> {
  read_optional(path)?.ok_or_else(|| {
    persistence("read", path)(io::Error::from(io::ErrorKind::NotFound))
  })
}

// ─── Directory loader ────────────────────────────────────────────────────────

/// The pair of directories holding a deployment's weekly logs.
#[derive(Debug, Clone)]
pub struct LogArchiveLoader {
  pub structured_dir: PathBuf,
  pub narrative_dir:  PathBuf,
}

impl LogArchiveLoader {
  pub fn from_dirs(structured_dir: impl Into<PathBuf>, narrative_dir: impl Into<PathBuf>) -> Self {
    Self { structured_dir: structured_dir.into(), narrative_dir: narrative_dir.into() }
  }

  /// Load every `*.json` under the structured directory and every `*.md`
  /// under the narrative directory. An unlistable directory is reported as a
  /// failure; a nonexistent one simply contributes nothing.
  pub fn load(&self) -> ArchiveLoad {
    let mut failures = Vec::new();
    let structured = list_sources(&self.structured_dir, STRUCTURED_EXTENSION, &mut failures);
    let narrative = list_sources(&self.narrative_dir, NARRATIVE_EXTENSION, &mut failures);

    let mut load = load_archives(structured, narrative);
    failures.append(&mut load.failures);
    load.failures = failures;
    load
  }
}

fn list_sources(dir: &Path, extension: &str, failures: &mut Vec<SourceFailure>) -> Vec<PathBuf> {
  let entries = match fs::read_dir(dir) {
    Ok(entries) => entries,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      tracing::debug!(dir = %dir.display(), "log directory does not exist");
      return Vec::new();
    }
    Err(e) => {
      failures.push(SourceFailure { path: dir.to_path_buf(), error: persistence("list", dir)(e) });
      return Vec::new();
    }
  };

  let mut paths: Vec<PathBuf> = entries
    .filter_map(|entry| entry.ok().map(|e| e.path()))
    .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == extension))
    .collect();
  paths.sort();
  paths
}
