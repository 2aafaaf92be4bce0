//! Three-way sentiment labels and the score-to-label threshold rule.

use serde::Serialize;

/// Symmetric threshold applied to continuous polarity scores.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Categorical vote cast by each scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "Positive"),
            SentimentLabel::Negative => write!(f, "Negative"),
            SentimentLabel::Neutral => write!(f, "Neutral"),
        }
    }
}

/// One scorer's verdict on one text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreResult {
    /// Model-defined range; `[-1.0, 1.0]` for every scorer in this crate.
    pub score: f64,
    pub label: SentimentLabel,
}

impl ScoreResult {
    /// Label `score` with [`label_for_score`].
    #[must_use]
    pub fn from_score(score: f64, threshold: f64) -> Self {
        Self {
            score,
            label: label_for_score(score, threshold),
        }
    }
}

/// Map a continuous score to a label.
///
/// Strictly above `threshold` is positive, strictly below `-threshold` is
/// negative; everything else, including NaN, is neutral.
#[must_use]
pub fn label_for_score(score: f64, threshold: f64) -> SentimentLabel {
    if score > threshold {
        SentimentLabel::Positive
    } else if score < -threshold {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}
