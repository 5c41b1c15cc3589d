//! Idea records — the unit of the Forge repository.
//!
//! An idea carries three scores, a tag set, and a list of provenance
//! references pointing into the weekly log archives. References are plain
//! lookup keys; they are never checked against the archives when an idea is
//! saved.

use std::fmt;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Score ───────────────────────────────────────────────────────────────────

/// An integer score in `1..=10`. Out-of-range values are rejected when the
/// record is deserialised, so every `Score` in memory is valid.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "u8")]
pub struct Score(u8);

impl Score {
  pub const MIN: Score = Score(1);
  pub const MAX: Score = Score(10);

  /// Validate `value`, naming `field` in the error.
  pub fn new(field: &'static str, value: i64) -> Result<Self> {
    if (1..=10).contains(&value) {
      Ok(Self(value as u8))
    } else {
      Err(Error::ScoreOutOfRange { field, value })
    }
  }

  pub fn get(self) -> u8 { self.0 }
}

impl Default for Score {
  fn default() -> Self { Self::MIN }
}

impl TryFrom<i64> for Score {
  type Error = Error;

  fn try_from(value: i64) -> Result<Self> { Self::new("score", value) }
}

impl From<Score> for u8 {
  fn from(score: Score) -> Self { score.0 }
}

impl fmt::Display for Score {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── Tags ────────────────────────────────────────────────────────────────────

/// An insertion-ordered set of tags.
///
/// Display order follows insertion; equality ignores it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Tags(Vec<String>);

impl Tags {
  /// Split comma-separated `text`, trimming each tag and dropping empties.
  pub fn parse(text: &str) -> Self {
    text.split(',').map(str::trim).filter(|t| !t.is_empty()).collect()
  }

  /// Append `tag` unless it is already present. Returns whether it was added.
  pub fn insert(&mut self, tag: impl Into<String>) -> bool {
    let tag = tag.into();
    if self.contains(&tag) {
      return false;
    }
    self.0.push(tag);
    true
  }

  pub fn contains(&self, tag: &str) -> bool { self.0.iter().any(|t| t == tag) }

  pub fn iter(&self) -> impl Iterator<Item = &str> { self.0.iter().map(String::as_str) }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl PartialEq for Tags {
  fn eq(&self, other: &Self) -> bool {
    self.len() == other.len() && self.iter().all(|t| other.contains(t))
  }
}

impl Eq for Tags {}

impl<S: Into<String>> FromIterator<S> for Tags {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    let mut tags = Tags::default();
    for tag in iter {
      tags.insert(tag);
    }
    tags
  }
}

impl From<Vec<String>> for Tags {
  fn from(tags: Vec<String>) -> Self { tags.into_iter().collect() }
}

impl From<Tags> for Vec<String> {
  fn from(tags: Tags) -> Self { tags.0 }
}

impl fmt::Display for Tags {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0.join(", "))
  }
}

// ─── Reference ───────────────────────────────────────────────────────────────

/// A pointer from an idea to one structured item in one weekly archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
  /// Key into the log archive index.
  pub week:    String,
  pub item_id: String,
  /// Category within the week's archive that holds the item.
  pub section: String,
}

// ─── Idea ────────────────────────────────────────────────────────────────────

/// A tracked idea. `idea_id` is caller-assigned and unique within a
/// repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
  pub idea_id:                 String,
  pub title:                   String,
  #[serde(default)]
  pub description:             String,
  #[serde(default)]
  pub maturity_score:          Score,
  #[serde(default)]
  pub personal_interest_score: Score,
  #[serde(default)]
  pub trend_score:             Score,
  #[serde(default)]
  pub tags:                    Tags,
  #[serde(default)]
  pub related_items:           Vec<Reference>,
}

impl Idea {
  /// An idea with the given identity and every other field at its default.
  pub fn new(idea_id: impl Into<String>, title: impl Into<String>) -> Self {
    Self {
      idea_id:                 idea_id.into(),
      title:                   title.into(),
      description:             String::new(),
      maturity_score:          Score::default(),
      personal_interest_score: Score::default(),
      trend_score:             Score::default(),
      tags:                    Tags::default(),
      related_items:           Vec::new(),
    }
  }

  /// The time-based default identifier offered for a new idea, e.g.
  /// `I-20240131-174502`.
  pub fn generate_id<Tz>(now: &DateTime<Tz>) -> String
  where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
  {
    format!("I-{}", now.format("%Y%m%d-%H%M%S"))
  }
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, Utc};

  use super::*;

  #[test]
  fn score_rejects_out_of_range() {
    assert!(Score::new("trend_score", 0).is_err());
    assert!(Score::new("trend_score", 11).is_err());
    assert_eq!(Score::new("trend_score", 10).unwrap(), Score::MAX);
  }

  #[test]
  fn score_deserialise_validates() {
    assert!(serde_json::from_str::<Score>("7").is_ok());
    assert!(serde_json::from_str::<Score>("42").is_err());
  }

  #[test]
  fn tags_parse_trims_and_dedupes() {
    let tags = Tags::parse(" ai, tooling ,, ai ,  ");
    assert_eq!(tags.iter().collect::<Vec<_>>(), ["ai", "tooling"]);
  }

  #[test]
  fn tags_equality_ignores_order() {
    assert_eq!(Tags::parse("a, b, c"), Tags::parse("c, a, b"));
    assert_ne!(Tags::parse("a, b"), Tags::parse("a, b, c"));
  }

  #[test]
  fn idea_defaults_optional_fields_on_load() {
    let idea: Idea =
      serde_json::from_str(r#"{"idea_id": "I-1", "title": "Verbs"}"#).unwrap();
    assert_eq!(idea, Idea::new("I-1", "Verbs"));
  }

  #[test]
  fn idea_requires_identity_on_load() {
    assert!(serde_json::from_str::<Idea>(r#"{"title": "Verbs"}"#).is_err());
  }

  #[test]
  fn generated_id_is_time_based() {
    let now = NaiveDate::from_ymd_opt(2024, 1, 31)
      .unwrap()
      .and_hms_opt(17, 45, 2)
      .unwrap()
      .and_utc();
    assert_eq!(Idea::generate_id(&now), "I-20240131-174502");
    assert!(Idea::generate_id(&Utc::now()).starts_with("I-"));
  }
}
