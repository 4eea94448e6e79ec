//! AI-text classifier handle.
//!
//! The classifier is loaded once at startup into a [`DetectorSlot`]. A failed load
//! is remembered, and handlers answer 503 until the process restarts.

use analysis::detector::Prediction;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// A text-classification model returning its predictions, best first.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Vec<Prediction>>;
}

/// Inference endpoints answer `[{label, score}]` or `[[{label, score}, ...]]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<Prediction>>),
    Flat(Vec<Prediction>),
}

impl InferenceResponse {
    fn into_top_predictions(self) -> Vec<Prediction> {
        match self {
            InferenceResponse::Flat(preds) => preds,
            InferenceResponse::Nested(batches) => batches
                .into_iter()
                .filter_map(|mut preds| {
                    preds.sort_by(|a, b| {
                        let (a, b) = (a.score.unwrap_or(f64::MIN), b.score.unwrap_or(f64::MIN));
                        b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal)
                    });
                    preds.into_iter().next()
                })
                .collect(),
        }
    }
}

/// Classifier served over HTTP by a text-classification inference endpoint.
pub struct HttpClassifier {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl HttpClassifier {
    pub fn new(url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create inference HTTP client")?;
        Ok(Self { client, url: url.into(), token: token.filter(|t| !t.is_empty()) })
    }

    /// Build the client and run one warm-up classification so a dead endpoint is
    /// detected at startup rather than on the first request.
    pub async fn load(url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let classifier = Self::new(url, token, timeout)?;
        let warmup = classifier.classify("Hello world.").await.context("warm-up classification failed")?;
        if warmup.is_empty() {
            bail!("warm-up classification returned no predictions");
        }
        Ok(classifier)
    }
}

#[async_trait]
impl TextClassifier for HttpClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<Prediction>> {
        let mut req = self.client.post(&self.url).json(&json!({ "inputs": text }));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req
            .send()
            .await
            .context("inference request failed")?
            .error_for_status()
            .context("inference endpoint returned an error status")?;
        let parsed: InferenceResponse = resp.json().await.context("failed to decode inference response")?;
        Ok(parsed.into_top_predictions())
    }
}

/// One-time-initialized classifier handle. `None` inside the cell means loading failed.
#[derive(Default)]
pub struct DetectorSlot {
    cell: OnceCell<Option<Arc<dyn TextClassifier>>>,
}

impl DetectorSlot {
    pub fn new() -> Self { Self::default() }

    pub fn ready(classifier: Arc<dyn TextClassifier>) -> Self {
        Self { cell: OnceCell::new_with(Some(Some(classifier))) }
    }

    pub fn unavailable() -> Self {
        Self { cell: OnceCell::new_with(Some(None)) }
    }

    /// Run `load` unless the slot is already initialized. Concurrent callers wait for
    /// the first load instead of starting their own.
    pub async fn init_with<F, Fut>(&self, load: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<Arc<dyn TextClassifier>>>,
    {
        let loaded = self
            .cell
            .get_or_init(move || async move {
                match load().await {
                    Ok(classifier) => {
                        tracing::info!("AI text detection model loaded successfully");
                        Some(classifier)
                    }
                    Err(e) => {
                        tracing::error!(error = ?e, "error loading AI text detection model");
                        None
                    }
                }
            })
            .await;
        loaded.is_some()
    }

    pub fn get(&self) -> Option<Arc<dyn TextClassifier>> {
        self.cell.get().and_then(|c| c.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    #[async_trait]
    impl TextClassifier for Fixed {
        async fn classify(&self, _text: &str) -> Result<Vec<Prediction>> {
            Ok(vec![Prediction::new("Fake", 0.9)])
        }
    }

    #[test]
    fn nested_response_keeps_best_prediction() {
        let raw = r#"[[{"label":"Real","score":0.2},{"label":"Fake","score":0.8}]]"#;
        let parsed: InferenceResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.into_top_predictions(), vec![Prediction::new("Fake", 0.8)]);

        let flat: InferenceResponse = serde_json::from_str(r#"[{"label":"Real","score":0.7}]"#).unwrap();
        assert_eq!(flat.into_top_predictions(), vec![Prediction::new("Real", 0.7)]);
    }

    #[tokio::test]
    async fn slot_loads_once() {
        let slot = DetectorSlot::new();
        assert!(slot.get().is_none());
        assert!(slot.init_with(|| async { Ok::<_, anyhow::Error>(Arc::new(Fixed) as Arc<dyn TextClassifier>) }).await);
        // A second init is ignored, even a failing one.
        assert!(slot.init_with(|| async { Err::<Arc<dyn TextClassifier>, _>(anyhow::anyhow!("not reached")) }).await);
        assert!(slot.get().is_some());
    }

    #[tokio::test]
    async fn failed_load_is_remembered() {
        let slot = DetectorSlot::new();
        assert!(!slot.init_with(|| async { Err::<Arc<dyn TextClassifier>, _>(anyhow::anyhow!("no model")) }).await);
        assert!(slot.get().is_none());
        assert!(DetectorSlot::unavailable().get().is_none());
    }
}
