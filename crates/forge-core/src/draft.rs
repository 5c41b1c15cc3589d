//! The editing boundary: raw form text in, validated [`Idea`] out.

use crate::{
  Error, Result,
  idea::{Idea, Reference, Score, Tags},
};

/// Unvalidated field values as a front end collects them.
#[derive(Debug, Clone, Default)]
pub struct IdeaDraft {
  pub idea_id:                 String,
  pub title:                   String,
  pub description:             String,
  pub maturity_score:          i64,
  pub personal_interest_score: i64,
  pub trend_score:             i64,
  /// Comma-separated tag text.
  pub tags:                    String,
  /// JSON array of references; empty text means no references.
  pub related_items:           String,
}

impl IdeaDraft {
  /// Populate a draft from an existing idea, rendering tags and references
  /// back to their text forms.
  pub fn from_idea(idea: &Idea) -> Result<Self> {
    let related_items = serde_json::to_string_pretty(&idea.related_items)
      .map_err(|source| Error::Malformed { what: "related items", source })?;
    Ok(Self {
      idea_id: idea.idea_id.clone(),
      title: idea.title.clone(),
      description: idea.description.clone(),
      maturity_score: idea.maturity_score.get().into(),
      personal_interest_score: idea.personal_interest_score.get().into(),
      trend_score: idea.trend_score.get().into(),
      tags: idea.tags.to_string(),
      related_items,
    })
  }

  /// Validate the draft. Nothing is persisted here; a rejected draft leaves
  /// every store untouched.
  pub fn into_idea(self) -> Result<Idea> {
    let idea_id = self.idea_id.trim();
    if idea_id.is_empty() {
      return Err(Error::RequiredFieldEmpty("idea_id"));
    }
    let title = self.title.trim();
    if title.is_empty() {
      return Err(Error::RequiredFieldEmpty("title"));
    }

    Ok(Idea {
      idea_id:                 idea_id.to_owned(),
      title:                   title.to_owned(),
      description:             self.description.trim().to_owned(),
      maturity_score:          Score::new("maturity_score", self.maturity_score)?,
      personal_interest_score: Score::new(
        "personal_interest_score",
        self.personal_interest_score,
      )?,
      trend_score:             Score::new("trend_score", self.trend_score)?,
      tags:                    Tags::parse(&self.tags),
      related_items:           parse_references(&self.related_items)?,
    })
  }
}

/// Parse a pasted reference list. Blank text is an empty list.
pub fn parse_references(text: &str) -> Result<Vec<Reference>> {
  let text = text.trim();
  if text.is_empty() {
    return Ok(Vec::new());
  }
  serde_json::from_str(text).map_err(|source| Error::Malformed { what: "related items", source })
}
