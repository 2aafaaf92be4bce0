//! Integration tests for `ClassifierClient` using wiremock HTTP mocks.

use serde_json::json;
use techx_sentiment::{ClassifierClient, SentimentError, SentimentLabel};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> ClassifierClient {
    ClassifierClient::new(base_url, 5, "techx-test/0.1")
        .expect("client construction should not fail")
}

#[tokio::test]
async fn classify_picks_highest_scoring_label() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(json!({"inputs": "what a great day"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"label": "neutral", "score": 0.08},
            {"label": "positive", "score": 0.9},
            {"label": "negative", "score": 0.02}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let prediction = client
        .classify("what a great day")
        .await
        .expect("should parse prediction");

    assert_eq!(prediction.label, "positive");
    assert!((prediction.score - 0.9).abs() < f64::EPSILON);
}

#[tokio::test]
async fn score_negates_negative_confidence() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"label": "negative", "score": 0.75}])),
        )
        .mount(&server)
        .await;

    let result = test_client(&server.uri())
        .score("awful service")
        .await
        .expect("should score");

    assert_eq!(result.label, SentimentLabel::Negative);
    assert!((result.score + 0.75).abs() < f64::EPSILON);
}

#[tokio::test]
async fn score_accepts_nested_batch_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[
            {"label": "neutral", "score": 0.6},
            {"label": "positive", "score": 0.3}
        ]])))
        .mount(&server)
        .await;

    let result = test_client(&server.uri())
        .score("the meeting is at noon")
        .await
        .expect("should score");

    assert_eq!(result.label, SentimentLabel::Neutral);
    assert_eq!(result.score, 0.0);
}

#[tokio::test]
async fn server_error_is_classifier_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).score("hello").await;
    assert!(
        matches!(result, Err(SentimentError::Classifier(ref msg)) if msg.contains("503")),
        "expected Classifier error mentioning 503, got: {result:?}"
    );
}

#[tokio::test]
async fn empty_prediction_list_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).classify("hello").await;
    assert!(
        matches!(result, Err(SentimentError::Classifier(_))),
        "expected Classifier error, got: {result:?}"
    );
}

#[tokio::test]
async fn malformed_body_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).classify("hello").await;
    assert!(matches!(result, Err(SentimentError::Classifier(_))));
}

#[tokio::test]
async fn health_reports_readiness() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    test_client(&server.uri())
        .health()
        .await
        .expect("healthy server");
}

#[tokio::test]
async fn health_fails_while_model_loads() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).health().await;
    assert!(matches!(result, Err(SentimentError::Classifier(_))));
}
