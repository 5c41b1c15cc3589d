//! The in-memory idea collection.
//!
//! Records are kept in insertion order and looked up by a linear scan; the
//! collection holds a few hundred ideas at most. Every mutation is a
//! full-record replace, so `idea_id` uniqueness is checked in one place.

use serde::Serialize;

use crate::{Error, Result, idea::Idea};

/// What a save did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
  /// A record was replaced at this position.
  Updated(usize),
  /// The record was appended at this position.
  Added(usize),
}

/// An ordered collection of ideas with unique identifiers.
///
/// Serialises as a bare array. Backends deserialise a `Vec<Idea>` and collect
/// it, so duplicate identifiers in a file collapse to one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Repository {
  ideas: Vec<Idea>,
}

impl Repository {
  pub fn new() -> Self { Self::default() }

  pub fn ideas(&self) -> &[Idea] { &self.ideas }

  pub fn len(&self) -> usize { self.ideas.len() }

  pub fn is_empty(&self) -> bool { self.ideas.is_empty() }

  fn position(&self, idea_id: &str) -> Option<usize> {
    self.ideas.iter().position(|idea| idea.idea_id == idea_id)
  }

  pub fn find(&self, idea_id: &str) -> Option<&Idea> {
    self.position(idea_id).map(|i| &self.ideas[i])
  }

  /// Replace the record with the same `idea_id` in place, or append.
  pub fn upsert(&mut self, idea: Idea) -> SaveOutcome {
    match self.position(&idea.idea_id) {
      Some(i) => {
        self.ideas[i] = idea;
        SaveOutcome::Updated(i)
      }
      None => {
        self.ideas.push(idea);
        SaveOutcome::Added(self.ideas.len() - 1)
      }
    }
  }

  /// Append a newly created record. An existing `idea_id` fails with
  /// [`Error::DuplicateId`] instead of replacing that record.
  pub fn insert_new(&mut self, idea: Idea) -> Result<SaveOutcome> {
    if self.position(&idea.idea_id).is_some() {
      return Err(Error::DuplicateId(idea.idea_id));
    }
    self.ideas.push(idea);
    Ok(SaveOutcome::Added(self.ideas.len() - 1))
  }

  /// Save an edited record.
  ///
  /// `previous_id` is the identifier the record had when it was selected,
  /// before any edit. If it still matches a record, that record is replaced in
  /// place, which is how an identifier is renamed. Renaming onto another
  /// record's identifier fails with [`Error::DuplicateId`] and leaves the
  /// collection unchanged. Without a matching `previous_id` this is
  /// [`Repository::upsert`].
  pub fn save_edit(&mut self, previous_id: Option<&str>, idea: Idea) -> Result<SaveOutcome> {
    let Some(i) = previous_id.and_then(|prev| self.position(prev)) else {
      return Ok(self.upsert(idea));
    };

    if let Some(j) = self.position(&idea.idea_id)
      && j != i
    {
      return Err(Error::DuplicateId(idea.idea_id));
    }
    self.ideas[i] = idea;
    Ok(SaveOutcome::Updated(i))
  }

  /// Remove the record with `idea_id`. Returns it if it was present.
  pub fn delete(&mut self, idea_id: &str) -> Option<Idea> {
    self.position(idea_id).map(|i| self.ideas.remove(i))
  }
}

impl FromIterator<Idea> for Repository {
  /// Collect through [`Repository::upsert`]; a later duplicate replaces the
  /// earlier one in its position.
  fn from_iter<I: IntoIterator<Item = Idea>>(iter: I) -> Self {
    let mut repo = Repository::new();
    for idea in iter {
      repo.upsert(idea);
    }
    repo
  }
}
