//! Ensemble sentiment analysis by majority vote.
//!
//! Three independent scorers label a piece of text as positive, negative or
//! neutral: a pattern-style adjective polarity heuristic, the VADER rule
//! engine, and a transformer classifier served over TEI. The labels are
//! combined by majority vote; a full three-way split defers to the classifier.

pub mod classifier;
pub mod error;
pub mod label;
pub mod lexicon;
pub mod pipeline;
pub mod polarity;
pub mod report;
pub mod vader;
pub mod vote;

pub use classifier::{normalize_prediction, ClassifierClient};
pub use error::SentimentError;
pub use label::{label_for_score, ScoreResult, SentimentLabel, DEFAULT_THRESHOLD};
pub use lexicon::{
    download_client, ensure_lexicon, LexiconSource, PolarityLexicon, VaderLexicon, WordPolarity,
};
pub use pipeline::{AnalysisResult, Ensemble};
pub use polarity::PolarityScorer;
pub use report::render_report;
pub use vader::{PolarityScores, VaderScorer};
pub use vote::{tally_votes, FinalDecision, VoteTally};
