//! Transformer sentiment classifier served by TEI (Text Embeddings Inference).
//!
//! The server hosts a 3-class sequence classifier trained on social-media
//! text (by default `cardiffnlp/twitter-roberta-base-sentiment-latest`).
//! Its top prediction is normalized into a signed score and a label.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::SentimentError;
use crate::label::{ScoreResult, SentimentLabel};

/// One `(label, confidence)` pair returned by `/predict`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub score: f64,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    inputs: &'a str,
}

/// `/predict` returns a flat list for a single input and a nested list for
/// batched input; both are accepted.
#[derive(Deserialize)]
#[serde(untagged)]
enum PredictResponse {
    Single(Vec<Prediction>),
    Batch(Vec<Vec<Prediction>>),
}

impl PredictResponse {
    fn into_predictions(self) -> Vec<Prediction> {
        match self {
            PredictResponse::Single(p) => p,
            PredictResponse::Batch(b) => b.into_iter().next().unwrap_or_default(),
        }
    }
}

/// Normalize a raw classifier label and confidence.
///
/// `positive` keeps the confidence, `negative` negates it, and `neutral` or
/// any unrecognized label becomes a neutral `0.0`.
#[must_use]
pub fn normalize_prediction(label: &str, confidence: f64) -> ScoreResult {
    match label.to_ascii_lowercase().as_str() {
        "positive" => ScoreResult {
            score: confidence,
            label: SentimentLabel::Positive,
        },
        "negative" => ScoreResult {
            score: -confidence,
            label: SentimentLabel::Negative,
        },
        other => {
            if other != "neutral" {
                tracing::warn!(label, "unrecognized classifier label; treating as neutral");
            }
            ScoreResult {
                score: 0.0,
                label: SentimentLabel::Neutral,
            }
        }
    }
}

/// HTTP client for a TEI classification server.
#[derive(Debug, Clone)]
pub struct ClassifierClient {
    client: Client,
    base_url: String,
}

impl ClassifierClient {
    /// Build a client for the TEI server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SentimentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Wrap an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Check that the server has finished loading the model.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Classifier`] if `/health` is unreachable or
    /// not successful.
    pub async fn health(&self) -> Result<(), SentimentError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SentimentError::Classifier(format!("health check failed: {e}")))?;
        if !response.status().is_success() {
            return Err(SentimentError::Classifier(format!(
                "classifier not ready: status {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Return the highest-confidence prediction for `text`.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Classifier`] if the request fails, the server
    /// answers with a non-2xx status, or the body holds no prediction.
    pub async fn classify(&self, text: &str) -> Result<Prediction, SentimentError> {
        let url = format!("{}/predict", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&PredictRequest { inputs: text })
            .send()
            .await
            .map_err(|e| SentimentError::Classifier(format!("predict request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(SentimentError::Classifier(format!(
                "predict returned status {}",
                response.status()
            )));
        }

        let predictions = response
            .json::<PredictResponse>()
            .await
            .map_err(|e| SentimentError::Classifier(format!("predict response parse error: {e}")))?
            .into_predictions();

        predictions
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or_else(|| SentimentError::Classifier("predict returned no labels".to_string()))
    }

    /// Classify `text` and normalize the top prediction.
    ///
    /// # Errors
    ///
    /// See [`ClassifierClient::classify`].
    pub async fn score(&self, text: &str) -> Result<ScoreResult, SentimentError> {
        let prediction = self.classify(text).await?;
        tracing::debug!(
            label = %prediction.label,
            confidence = prediction.score,
            "classifier prediction"
        );
        Ok(normalize_prediction(&prediction.label, prediction.score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_keeps_confidence() {
        let r = normalize_prediction("positive", 0.93);
        assert_eq!(r.label, SentimentLabel::Positive);
        assert!((r.score - 0.93).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_negates_confidence() {
        let r = normalize_prediction("negative", 0.8);
        assert_eq!(r.label, SentimentLabel::Negative);
        assert!((r.score + 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn neutral_is_zero() {
        let r = normalize_prediction("neutral", 0.99);
        assert_eq!(r.label, SentimentLabel::Neutral);
        assert_eq!(r.score, 0.0);
    }

    #[test]
    fn unknown_label_defaults_to_neutral() {
        let r = normalize_prediction("LABEL_7", 0.99);
        assert_eq!(r.label, SentimentLabel::Neutral);
        assert_eq!(r.score, 0.0);
    }

    #[test]
    fn label_match_ignores_case() {
        assert_eq!(
            normalize_prediction("Positive", 0.5).label,
            SentimentLabel::Positive
        );
        assert_eq!(
            normalize_prediction("NEGATIVE", 0.5).label,
            SentimentLabel::Negative
        );
    }

    #[test]
    fn batch_response_uses_first_row() {
        let body = r#"[[{"label":"negative","score":0.7},{"label":"neutral","score":0.2}]]"#;
        let parsed: PredictResponse = serde_json::from_str(body).unwrap();
        let predictions = parsed.into_predictions();
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].label, "negative");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ClassifierClient::with_client(Client::new(), "http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080");
    }
}
