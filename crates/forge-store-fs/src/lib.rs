//! File-system backend for the Forge idea repository.
//!
//! Every record type lives in plain JSON (or markdown, for narratives) on
//! disk: one file for the idea collection, one structured and/or one
//! narrative file per week, and one file per `(idea, dimension)` assessment.
//! All access is synchronous.

mod archives;
mod assessments;
mod fs;
mod repo_file;

pub mod error;

pub use archives::{ArchiveLoad, LogArchiveLoader, SourceFailure, load_archives, week_key};
pub use assessments::FsAssessmentStore;
pub use error::{Error, Result};
pub use repo_file::RepoFile;

#[cfg(test)]
mod tests;
