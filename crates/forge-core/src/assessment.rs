//! Assessment documents — externally produced scores for one idea along one
//! dimension.
//!
//! A document is only ever replaced wholesale. Fields beyond the three the
//! contract names are kept verbatim so a re-saved document loses nothing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{Error, Result, idea::Score};

// ─── Dimension ───────────────────────────────────────────────────────────────

/// A scoring dimension that assessments can override.
///
/// Personal interest has no dimension; it only ever comes from the idea.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
  Serialize,
  Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
  Maturity,
  Trend,
}

impl Dimension {
  /// The required score field for this dimension's documents.
  pub fn score_field(self) -> &'static str {
    match self {
      Self::Maturity => "maturity_score",
      Self::Trend => "trend_score",
    }
  }
}

// ─── Documents ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaturityAssessment {
  pub maturity_score:       Score,
  #[serde(default)]
  pub justification:        String,
  #[serde(default)]
  pub suggested_next_steps: Vec<String>,
  #[serde(flatten)]
  pub extra:                Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAssessment {
  pub trend_score:    Score,
  #[serde(default)]
  pub justification:  String,
  #[serde(default)]
  pub suggested_tags: Vec<String>,
  #[serde(flatten)]
  pub extra:          Map<String, Value>,
}

/// An assessment for either dimension. Serialises to the bare document body;
/// the dimension is carried by the storage key, not the content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AssessmentDocument {
  Maturity(MaturityAssessment),
  Trend(TrendAssessment),
}

impl AssessmentDocument {
  /// Parse and validate raw document text for `dimension`.
  pub fn parse(dimension: Dimension, text: &str) -> Result<Self> {
    let value = serde_json::from_str(text)
      .map_err(|source| Error::Malformed { what: "assessment", source })?;
    Self::from_value(dimension, value)
  }

  /// Validate an already-parsed JSON value for `dimension`.
  ///
  /// The dimension's score field must be present; the justification and the
  /// suggestion list default to empty.
  pub fn from_value(dimension: Dimension, value: Value) -> Result<Self> {
    let Value::Object(map) = value else {
      return Err(Error::NotAnObject("assessment"));
    };
    if map.get(dimension.score_field()).is_none_or(Value::is_null) {
      return Err(Error::MissingField(dimension.score_field()));
    }

    let value = Value::Object(map);
    let malformed = |source| Error::Malformed { what: "assessment", source };
    Ok(match dimension {
      Dimension::Maturity => {
        Self::Maturity(serde_json::from_value(value).map_err(malformed)?)
      }
      Dimension::Trend => Self::Trend(serde_json::from_value(value).map_err(malformed)?),
    })
  }

  pub fn dimension(&self) -> Dimension {
    match self {
      Self::Maturity(_) => Dimension::Maturity,
      Self::Trend(_) => Dimension::Trend,
    }
  }

  pub fn score(&self) -> Score {
    match self {
      Self::Maturity(a) => a.maturity_score,
      Self::Trend(a) => a.trend_score,
    }
  }

  pub fn justification(&self) -> &str {
    match self {
      Self::Maturity(a) => &a.justification,
      Self::Trend(a) => &a.justification,
    }
  }

  /// Next steps for maturity, tags for trend.
  pub fn suggestions(&self) -> &[String] {
    match self {
      Self::Maturity(a) => &a.suggested_next_steps,
      Self::Trend(a) => &a.suggested_tags,
    }
  }

  /// Fail unless this document belongs to `dimension`.
  pub fn expect_dimension(&self, dimension: Dimension) -> Result<()> {
    if self.dimension() == dimension {
      Ok(())
    } else {
      Err(Error::DimensionMismatch { expected: dimension, actual: self.dimension() })
    }
  }
}

// ─── Source trait ────────────────────────────────────────────────────────────

/// Read access to stored assessments, keyed by `(idea_id, dimension)`.
///
/// Implemented by storage backends (e.g. `forge-store-fs`). The overlay
/// resolver depends on this abstraction only.
pub trait AssessmentSource {
  type Error: std::error::Error + 'static;

  /// The document for the pair, or `None` if none has been saved.
  fn load(
    &self,
    idea_id: &str,
    dimension: Dimension,
  ) -> Result<Option<AssessmentDocument>, Self::Error>;
}
