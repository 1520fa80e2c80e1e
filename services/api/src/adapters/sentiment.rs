//! services/api/src/adapters/sentiment.rs
//!
//! This module contains the adapter for the sentiment classifier.
//! It implements the `SentimentAnalysisService` port from the `core` crate
//! against a hosted text-classification inference endpoint.

use async_trait::async_trait;
use mindreflect_core::domain::{Sentiment, SentimentLabel};
use mindreflect_core::ports::{PortError, PortResult, SentimentAnalysisService};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// Endpoints answer either one list per input or a single flat list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Batched(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ClassifyResponse {
    fn into_candidates(self) -> Vec<LabelScore> {
        match self {
            ClassifyResponse::Batched(batches) => batches.into_iter().next().unwrap_or_default(),
            ClassifyResponse::Flat(candidates) => candidates,
        }
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `SentimentAnalysisService` over HTTP.
#[derive(Clone)]
pub struct HttpSentimentAdapter {
    client: Client,
    url: String,
    token: Option<String>,
}

impl HttpSentimentAdapter {
    /// Creates a new `HttpSentimentAdapter` posting to `url`.
    pub fn new(client: Client, url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            url: url.into(),
            token,
        }
    }
}

/// Picks the most confident candidate and checks it is well formed.
fn top_candidate(candidates: Vec<LabelScore>) -> PortResult<Sentiment> {
    let best = candidates
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or_else(|| PortError::InvalidResponse("classifier returned no labels".to_string()))?;

    if !(0.0..=1.0).contains(&best.score) {
        return Err(PortError::InvalidResponse(format!(
            "score {} for label {} is outside [0, 1]",
            best.score, best.label
        )));
    }

    Ok(Sentiment {
        label: SentimentLabel::from(best.label.as_str()),
        score: best.score,
    })
}

//=========================================================================================
// `SentimentAnalysisService` Trait Implementation
//=========================================================================================

#[async_trait]
impl SentimentAnalysisService for HttpSentimentAdapter {
    async fn analyze(&self, text: &str) -> PortResult<Sentiment> {
        debug!("Classifying {} characters of journal text", text.len());

        let mut request = self.client.post(&self.url).json(&ClassifyRequest { inputs: text });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("sentiment request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::NOT_FOUND {
                return Err(PortError::NotFound(format!("sentiment model at {}", self.url)));
            }
            return Err(PortError::Unexpected(format!("HTTP {}: {}", status, body)));
        }

        let parsed: ClassifyResponse = response.json().await.map_err(|e| {
            PortError::InvalidResponse(format!("failed to parse classifier output: {}", e))
        })?;

        let sentiment = top_candidate(parsed.into_candidates())?;
        debug!("Classified as {} ({:.2})", sentiment.label, sentiment.score);
        Ok(sentiment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn picks_highest_scoring_label() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/classify")
            .match_header("authorization", "Bearer hf_test")
            .match_body(Matcher::Json(serde_json::json!({ "inputs": "What a lovely day" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[[{"label":"NEGATIVE","score":0.02},{"label":"POSITIVE","score":0.98}]]"#)
            .create_async()
            .await;

        let adapter = HttpSentimentAdapter::new(
            Client::new(),
            format!("{}/classify", server.url()),
            Some("hf_test".to_string()),
        );
        let sentiment = adapter.analyze("What a lovely day").await.unwrap();

        mock.assert_async().await;
        assert_eq!(sentiment.label, SentimentLabel::Positive);
        assert_eq!(sentiment.score, 0.98);
    }

    #[tokio::test]
    async fn accepts_flat_pipeline_output() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"[{"label":"NEGATIVE","score":0.91}]"#)
            .create_async()
            .await;

        let adapter = HttpSentimentAdapter::new(Client::new(), server.url(), None);
        let sentiment = adapter.analyze("ugh").await.unwrap();
        assert_eq!(sentiment.label, SentimentLabel::Negative);
        assert_eq!(sentiment.score, 0.91);
    }

    #[tokio::test]
    async fn http_errors_become_port_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(503)
            .with_body(r#"{"error":"Model is currently loading"}"#)
            .create_async()
            .await;

        let adapter = HttpSentimentAdapter::new(Client::new(), server.url(), None);
        let err = adapter.analyze("anything").await.unwrap_err();
        assert!(matches!(err, PortError::Unexpected(ref msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn malformed_output_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"[[{"label":"POSITIVE","score":1.7}]]"#)
            .create_async()
            .await;

        let adapter = HttpSentimentAdapter::new(Client::new(), server.url(), None);
        let err = adapter.analyze("anything").await.unwrap_err();
        assert!(matches!(err, PortError::InvalidResponse(_)));
    }

    #[test]
    fn empty_candidates_are_invalid() {
        assert!(matches!(top_candidate(vec![]), Err(PortError::InvalidResponse(_))));
    }
}
