//! Layered configuration: built-in defaults, then an optional TOML file, then
//! `FORGE_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

pub const DEFAULT_REPO_PATH: &str = "../data/REPOSITORY/repo.json";
pub const DEFAULT_JSON_LOGS_DIR: &str = "../data/json-logs";
pub const DEFAULT_MD_LOGS_DIR: &str = "../data/md-logs";
pub const DEFAULT_EVALUATIONS_DIR: &str = "../data/evaluations";

/// Where each store lives on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  pub repo_path:       PathBuf,
  /// Structured weekly logs (`*.json`).
  pub json_logs_dir:   PathBuf,
  /// Narrative weekly logs (`*.md`).
  pub md_logs_dir:     PathBuf,
  pub evaluations_dir: PathBuf,
}

impl Settings {
  /// Read the configuration, treating a missing `file` as empty.
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("repo_path", DEFAULT_REPO_PATH)?
      .set_default("json_logs_dir", DEFAULT_JSON_LOGS_DIR)?
      .set_default("md_logs_dir", DEFAULT_MD_LOGS_DIR)?
      .set_default("evaluations_dir", DEFAULT_EVALUATIONS_DIR)?
      .add_source(config::File::from(file.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("FORGE"))
      .build()
      .with_context(|| format!("failed to read config file {}", file.display()))?;

    let cfg: Settings = settings.try_deserialize().context("failed to deserialise Settings")?;
    Ok(Self {
      repo_path:       expand_tilde(&cfg.repo_path),
      json_logs_dir:   expand_tilde(&cfg.json_logs_dir),
      md_logs_dir:     expand_tilde(&cfg.md_logs_dir),
      evaluations_dir: expand_tilde(&cfg.evaluations_dir),
    })
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_uses_defaults() {
    let cfg = Settings::load(Path::new("/nonexistent/forge.toml")).unwrap();
    assert_eq!(cfg.evaluations_dir, Path::new(DEFAULT_EVALUATIONS_DIR));
  }

  #[test]
  fn plain_paths_are_not_expanded() {
    assert_eq!(expand_tilde(Path::new("data/repo.json")), Path::new("data/repo.json"));
  }
}
