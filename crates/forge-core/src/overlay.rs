//! Score overlay: the scores an idea displays once its latest assessments
//! are taken into account.
//!
//! For maturity and trend, a stored assessment outranks the idea's own
//! field. Personal interest has no assessment dimension and always comes from
//! the idea. The overlay only changes a working copy. The repository record
//! keeps its stored scores until the working copy is explicitly saved, at
//! which point the overlaid values become the new baseline.
//!
//! Selecting an idea re-reads the assessments every time, so repeated
//! selection without a save shows whatever the assessment source holds at
//! that moment.

use crate::{
  assessment::{AssessmentSource, Dimension},
  idea::{Idea, Score},
};

/// Where an effective score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSource {
  /// The idea's stored field.
  Stored,
  /// A stored assessment document.
  Assessment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveScore {
  pub score:  Score,
  pub source: ScoreSource,
}

impl EffectiveScore {
  fn stored(score: Score) -> Self { Self { score, source: ScoreSource::Stored } }
}

/// An assessment that could not be read. Its dimension fell back to the
/// stored score.
#[derive(Debug)]
pub struct OverlayFailure<E> {
  pub dimension: Dimension,
  pub error:     E,
}

/// The resolved display scores for one idea.
#[derive(Debug)]
pub struct ScoreOverlay<E> {
  pub maturity:          EffectiveScore,
  pub personal_interest: Score,
  pub trend:             EffectiveScore,
  /// Assessments that were present but unreadable.
  pub failures:          Vec<OverlayFailure<E>>,
}

impl<E> ScoreOverlay<E> {
  /// Write the effective scores into `idea`.
  pub fn apply(&self, idea: &mut Idea) {
    idea.maturity_score = self.maturity.score;
    idea.personal_interest_score = self.personal_interest;
    idea.trend_score = self.trend.score;
  }
}

/// Overlay `idea`'s stored scores with the assessments in `source`.
///
/// A failed read is recorded in [`ScoreOverlay::failures`] and leaves that
/// dimension at its stored value; it never aborts the other dimension.
pub fn resolve_scores<S: AssessmentSource>(idea: &Idea, source: &S) -> ScoreOverlay<S::Error> {
  let mut overlay = ScoreOverlay {
    maturity:          EffectiveScore::stored(idea.maturity_score),
    personal_interest: idea.personal_interest_score,
    trend:             EffectiveScore::stored(idea.trend_score),
    failures:          Vec::new(),
  };

  for dimension in [Dimension::Maturity, Dimension::Trend] {
    let effective = match dimension {
      Dimension::Maturity => &mut overlay.maturity,
      Dimension::Trend => &mut overlay.trend,
    };
    match source.load(&idea.idea_id, dimension) {
      // Documents filed under the wrong dimension carry no score for this one.
      Ok(Some(doc)) if doc.dimension() == dimension => {
        *effective = EffectiveScore { score: doc.score(), source: ScoreSource::Assessment };
      }
      Ok(_) => {}
      Err(error) => overlay.failures.push(OverlayFailure { dimension, error }),
    }
  }

  overlay
}

// ─── Selection ───────────────────────────────────────────────────────────────

/// The idea a front end currently has open.
///
/// `previous_id` pins the record the working copy replaces on save, so an
/// edit to `working.idea_id` renames that record instead of adding one.
#[derive(Debug)]
pub struct Selection<E> {
  pub previous_id: String,
  pub working:     Idea,
  pub overlay:     ScoreOverlay<E>,
}

impl<E> Selection<E> {
  /// Open `idea`, applying the assessment overlay to the working copy.
  pub fn open<S>(idea: &Idea, source: &S) -> Self
  where
    S: AssessmentSource<Error = E>,
  {
    let overlay = resolve_scores(idea, source);
    let mut working = idea.clone();
    overlay.apply(&mut working);
    Self { previous_id: idea.idea_id.clone(), working, overlay }
  }
}
