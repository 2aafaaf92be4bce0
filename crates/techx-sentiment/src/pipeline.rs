//! Ensemble orchestration: run the three scorers in sequence, then vote.

use serde::Serialize;
use techx_core::AppConfig;

use crate::classifier::ClassifierClient;
use crate::error::SentimentError;
use crate::label::ScoreResult;
use crate::lexicon::{
    download_client, ensure_lexicon, LexiconSource, PolarityLexicon, VaderLexicon,
};
use crate::polarity::PolarityScorer;
use crate::vader::VaderScorer;
use crate::vote::{tally_votes, FinalDecision, VoteTally};

/// Everything produced for one input text.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub polarity: ScoreResult,
    pub vader: ScoreResult,
    pub classifier: ScoreResult,
    pub tally: VoteTally,
    pub decision: FinalDecision,
}

/// The three scorers, ready to analyze text.
#[derive(Debug, Clone)]
pub struct Ensemble {
    polarity: PolarityScorer,
    vader: VaderScorer,
    classifier: ClassifierClient,
}

impl Ensemble {
    #[must_use]
    pub fn new(polarity: PolarityScorer, vader: VaderScorer, classifier: ClassifierClient) -> Self {
        Self {
            polarity,
            vader,
            classifier,
        }
    }

    /// Prepare all three scorers from configuration.
    ///
    /// 1. Ensure the VADER and polarity lexicons are on disk, fetching each
    ///    once if missing.
    /// 2. Load and parse them.
    /// 3. Build the classifier client and wait for its `/health` check.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError`] if a lexicon cannot be fetched or parsed,
    /// or the classifier server is unreachable.
    pub async fn load(config: &AppConfig) -> Result<Self, SentimentError> {
        let classifier = ClassifierClient::new(
            &config.classifier_url,
            config.classifier_timeout_secs,
            &config.user_agent,
        )?;

        let http = download_client(config.lexicon_timeout_secs, &config.user_agent)?;

        let path = ensure_lexicon(&http, &LexiconSource::vader(config)).await?;
        let vader_lexicon = VaderLexicon::load(&path)?;
        tracing::info!(
            entries = vader_lexicon.len(),
            path = %path.display(),
            "VADER lexicon loaded"
        );

        let path = ensure_lexicon(&http, &LexiconSource::polarity(config)).await?;
        let polarity_lexicon = PolarityLexicon::load(&path)?;
        tracing::info!(
            words = polarity_lexicon.len(),
            path = %path.display(),
            "polarity lexicon loaded"
        );

        classifier.health().await?;
        tracing::info!(url = %config.classifier_url, "classifier ready");

        Ok(Self::new(
            PolarityScorer::new(polarity_lexicon, config.label_threshold),
            VaderScorer::new(vader_lexicon, config.label_threshold),
            classifier,
        ))
    }

    /// Score `text` with each model in turn and aggregate by majority vote.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Classifier`] if the classifier call fails.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, SentimentError> {
        let polarity = self.polarity.score(text);
        let vader = self.vader.score(text);
        let classifier = self.classifier.score(text).await?;

        let (tally, decision) = tally_votes(
            [polarity.label, vader.label, classifier.label],
            classifier.label,
        );

        tracing::info!(
            polarity = %polarity.label,
            vader = %vader.label,
            classifier = %classifier.label,
            decision = %decision,
            "analysis complete"
        );

        Ok(AnalysisResult {
            polarity,
            vader,
            classifier,
            tally,
            decision,
        })
    }
}
