//! Provenance resolution: an idea's flat reference list joined against the
//! log archive index.
//!
//! References are grouped by week in first-seen order. Each week present in
//! the index contributes its metadata once, however many references point at
//! it, then one lookup result per reference. A week absent from the index
//! contributes a single marker for the whole group. Narrative text is left
//! out; callers that want it read it from the index directly.
//!
//! Resolution only borrows its inputs and allocates nothing but the grouping,
//! so it is safe to repeat.

use std::fmt;

use crate::{
  archive::{ItemRecord, LogArchiveIndex, WeekMetadata},
  idea::{Idea, Reference},
};

// ─── Dossier ─────────────────────────────────────────────────────────────────

/// The outcome of looking up one reference in a week that exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemLookup<'a> {
  Found {
    reference: &'a Reference,
    record:    &'a ItemRecord,
  },
  /// The section is absent, or holds no record with the item id.
  NotFound { reference: &'a Reference },
}

impl ItemLookup<'_> {
  pub fn reference(&self) -> &Reference {
    match self {
      Self::Found { reference, .. } | Self::NotFound { reference } => *reference,
    }
  }

  pub fn is_found(&self) -> bool { matches!(self, Self::Found { .. }) }
}

/// All references an idea holds into one week.
#[derive(Debug, Clone, PartialEq)]
pub enum WeekGroup<'a> {
  /// The week has no archive; no per-item lookups were attempted.
  Missing {
    week:       &'a str,
    references: Vec<&'a Reference>,
  },
  Present {
    week:     &'a str,
    metadata: Option<&'a WeekMetadata>,
    items:    Vec<ItemLookup<'a>>,
  },
}

impl<'a> WeekGroup<'a> {
  pub fn week(&self) -> &'a str {
    match self {
      Self::Missing { week, .. } | Self::Present { week, .. } => *week,
    }
  }
}

/// A week-grouped, deduplicated source report for one idea.
#[derive(Debug, Clone, PartialEq)]
pub struct Dossier<'a> {
  pub idea_id: &'a str,
  pub title:   &'a str,
  pub weeks:   Vec<WeekGroup<'a>>,
}

impl<'a> Dossier<'a> {
  /// True when the idea has no references at all.
  pub fn is_empty(&self) -> bool { self.weeks.is_empty() }

  /// Every per-reference lookup, in output order.
  pub fn lookups(&self) -> impl Iterator<Item = &ItemLookup<'a>> {
    self.weeks.iter().flat_map(|group| match group {
      WeekGroup::Present { items, .. } => items.as_slice(),
      WeekGroup::Missing { .. } => &[][..],
    })
  }
}

// ─── Resolution ──────────────────────────────────────────────────────────────

/// Build the dossier for `idea` from the archives in `index`.
pub fn resolve<'a>(idea: &'a Idea, index: &'a LogArchiveIndex) -> Dossier<'a> {
  let mut groups: Vec<(&str, Vec<&Reference>)> = Vec::new();
  for reference in &idea.related_items {
    match groups.iter_mut().find(|(week, _)| *week == reference.week) {
      Some((_, refs)) => refs.push(reference),
      None => groups.push((reference.week.as_str(), vec![reference])),
    }
  }

  let weeks = groups
    .into_iter()
    .map(|(week, references)| match index.get(week) {
      None => WeekGroup::Missing { week, references },
      Some(archive) => WeekGroup::Present {
        week,
        metadata: archive.metadata.as_ref(),
        items: references
          .into_iter()
          .map(|reference| match archive.find_item(&reference.section, &reference.item_id) {
            Some(record) => ItemLookup::Found { reference, record },
            None => ItemLookup::NotFound { reference },
          })
          .collect(),
      },
    })
    .collect();

  Dossier { idea_id: &idea.idea_id, title: &idea.title, weeks }
}

// ─── Rendering ───────────────────────────────────────────────────────────────

/// Markdown rendering of the dossier.
impl fmt::Display for Dossier<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "# Source Information for: {}", self.title)?;
    writeln!(f, "Idea ID: {}", self.idea_id)?;
    writeln!(f, "{}", "=".repeat(60))?;
    writeln!(f)?;

    if self.is_empty() {
      return writeln!(f, "No source information available for this idea.");
    }

    for group in &self.weeks {
      writeln!(f, "## Week: {}", group.week())?;
      writeln!(f)?;

      match group {
        WeekGroup::Missing { week, .. } => {
          writeln!(f, "⚠️ No source data found for week: {week}")?;
          writeln!(f)?;
        }
        WeekGroup::Present { metadata, items, .. } => {
          if let Some(meta) = metadata {
            write_metadata(f, meta)?;
          }
          writeln!(f, "### JSON Sources:")?;
          writeln!(f)?;
          for lookup in items {
            write_lookup(f, lookup)?;
          }
        }
      }

      writeln!(f, "{}", "-".repeat(40))?;
      writeln!(f)?;
    }
    Ok(())
  }
}

fn write_metadata(f: &mut fmt::Formatter<'_>, meta: &WeekMetadata) -> fmt::Result {
  writeln!(f, "### Week Metadata:")?;
  writeln!(f, "- Tools Used: {}", meta.tools_used.join(", "))?;
  writeln!(f, "- Tags: {}", meta.tags.join(", "))?;
  writeln!(f, "- Generated: {}", meta.generated_at.as_deref().unwrap_or("Unknown"))?;
  writeln!(f)
}

fn write_lookup(f: &mut fmt::Formatter<'_>, lookup: &ItemLookup<'_>) -> fmt::Result {
  let reference = lookup.reference();
  writeln!(f, "**Item: {} | Section: {}**", reference.item_id, reference.section)?;
  match lookup {
    ItemLookup::Found { record, .. } => {
      let json = serde_json::to_string_pretty(record).map_err(|_| fmt::Error)?;
      writeln!(f, "```json")?;
      writeln!(f, "{json}")?;
      writeln!(f, "```")?;
    }
    ItemLookup::NotFound { reference } => {
      writeln!(
        f,
        "⚠️ Item {} not found in section {}",
        reference.item_id, reference.section
      )?;
    }
  }
  writeln!(f)
}
