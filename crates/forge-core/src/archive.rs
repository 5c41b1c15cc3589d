//! Weekly log archives and the in-memory index over them.
//!
//! A week's archive is assembled from up to two sources sharing a week key: a
//! structured source (metadata plus sectioned item records) and a narrative
//! source (free text). The index is rebuilt wholesale on every load and is
//! never updated piecemeal.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ─── Records ─────────────────────────────────────────────────────────────────

/// Per-week metadata from the structured source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekMetadata {
  #[serde(default)]
  pub tools_used:   Vec<String>,
  #[serde(default)]
  pub tags:         Vec<String>,
  #[serde(default)]
  pub generated_at: Option<String>,
}

/// One structured item inside a section, kept whole and in source field
/// order. Only a string `id` is interpreted; an item without one can never
/// match a reference but does not invalidate its siblings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemRecord(pub serde_json::Map<String, serde_json::Value>);

impl ItemRecord {
  pub fn id(&self) -> Option<&str> { self.0.get("id").and_then(serde_json::Value::as_str) }

  pub fn get(&self, field: &str) -> Option<&serde_json::Value> { self.0.get(field) }
}

/// The parsed content of one week.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekArchive {
  #[serde(default)]
  pub metadata:  Option<WeekMetadata>,
  /// Section name → ordered item records.
  #[serde(default)]
  pub items:     BTreeMap<String, Vec<ItemRecord>>,
  /// Narrative text; never part of the structured source.
  #[serde(skip)]
  pub narrative: Option<String>,
}

impl WeekArchive {
  /// Scan `section` for the record whose `id` equals `item_id`.
  pub fn find_item(&self, section: &str, item_id: &str) -> Option<&ItemRecord> {
    self.items.get(section)?.iter().find(|item| item.id() == Some(item_id))
  }
}

// ─── Index ───────────────────────────────────────────────────────────────────

/// Read-only lookup of week archives by week key.
#[derive(Debug, Clone, Default)]
pub struct LogArchiveIndex {
  weeks: BTreeMap<String, WeekArchive>,
}

impl LogArchiveIndex {
  pub fn get(&self, week: &str) -> Option<&WeekArchive> { self.weeks.get(week) }

  /// Week keys in sorted order.
  pub fn weeks(&self) -> impl Iterator<Item = &str> { self.weeks.keys().map(String::as_str) }

  pub fn len(&self) -> usize { self.weeks.len() }

  pub fn is_empty(&self) -> bool { self.weeks.is_empty() }
}

/// Accumulates sources for one load pass, then freezes into an index.
#[derive(Debug, Default)]
pub struct LogArchiveIndexBuilder {
  weeks: BTreeMap<String, WeekArchive>,
}

impl LogArchiveIndexBuilder {
  pub fn new() -> Self { Self::default() }

  /// Install the structured fields for `week`, keeping any narrative already
  /// attached to it.
  pub fn structured(&mut self, week: impl Into<String>, archive: WeekArchive) {
    let entry = self.weeks.entry(week.into()).or_default();
    entry.metadata = archive.metadata;
    entry.items = archive.items;
  }

  /// Attach narrative text to `week`, creating an empty archive if no
  /// structured source exists for it.
  pub fn narrative(&mut self, week: impl Into<String>, text: impl Into<String>) {
    self.weeks.entry(week.into()).or_default().narrative = Some(text.into());
  }

  pub fn build(self) -> LogArchiveIndex { LogArchiveIndex { weeks: self.weeks } }
}
