pub mod classifier;
pub mod config;
pub mod error;
pub mod grammar;

use analysis::detector::{assess, truncate_for_detection, AiReport, MAX_DETECTION_CHARS};
use analysis::plagiarism::{self, PlagiarismReport};
use analysis::Corpus;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use classifier::{DetectorSlot, HttpClassifier, TextClassifier};
use config::Settings;
use error::{ApiError, ApiResult};
use grammar::LanguageToolClient;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Debug, Deserialize)]
pub struct CheckTextRequest {
    pub language: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub corpus: Arc<Corpus>,
    pub grammar: LanguageToolClient,
    pub detector: Arc<DetectorSlot>,
}

impl AppState {
    pub fn new(corpus: Corpus, grammar: LanguageToolClient, detector: DetectorSlot) -> Self {
        Self { corpus: Arc::new(corpus), grammar, detector: Arc::new(detector) }
    }

    /// Load the corpus and the AI classifier. A classifier that fails to load is
    /// logged and leaves `/api/checkAiText` answering 503; the rest keeps working.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let corpus = match &settings.corpus {
            Some(path) => Corpus::from_json_file(path)
                .with_context(|| format!("failed to load corpus from {}", path.display()))?,
            None => Corpus::reference(),
        };
        tracing::info!(documents = corpus.len(), "plagiarism corpus ready");

        let grammar = LanguageToolClient::new(&settings.languagetool_url, settings.languagetool_timeout())?;
        tracing::info!(url = %grammar.url(), "grammar checks proxied");

        let detector = DetectorSlot::new();
        tracing::info!(url = %settings.detector_url, "loading AI text detection model");
        detector
            .init_with(|| async {
                let model = HttpClassifier::load(
                    settings.detector_url.clone(),
                    settings.detector_token.clone(),
                    settings.detector_timeout(),
                )
                .await?;
                Ok::<_, anyhow::Error>(Arc::new(model) as Arc<dyn TextClassifier>)
            })
            .await;

        Ok(Self::new(corpus, grammar, detector))
    }
}

pub fn build_app(state: AppState, cors_allow_origin: &[String]) -> Router {
    // CORS: explicit origin list, or any origin when none parse
    let origins: Vec<HeaderValue> = cors_allow_origin
        .iter()
        .filter_map(|s| s.trim().parse().ok())
        .collect();
    let cors = if origins.is_empty() {
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/checkText", post(check_text))
        .route("/api/checkPlagiarism", post(check_plagiarism))
        .route("/api/checkAiText", post(check_ai_text))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    ApiError::internal("An unexpected error occurred", detail).into_response()
}

fn invalid_payload(reason: impl std::fmt::Display) -> ApiError {
    tracing::debug!(error = %reason, "unparseable request body");
    ApiError::Validation("Invalid JSON payload".to_string())
}

/// Parse a JSON object body. Anything else is a validation error.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    let value: Value = serde_json::from_slice(body).map_err(invalid_payload)?;
    if !value.is_object() {
        return Err(invalid_payload("body is not a JSON object"));
    }
    serde_json::from_value(value).map_err(invalid_payload)
}

fn required_text(body: &[u8]) -> ApiResult<String> {
    parse_body::<TextRequest>(body)?
        .text
        .ok_or_else(|| ApiError::Validation("Invalid JSON payload, missing 'text' field".to_string()))
}

pub async fn check_text(State(state): State<AppState>, body: Bytes) -> ApiResult<(StatusCode, Json<Value>)> {
    let req: CheckTextRequest = parse_body(&body)?;
    let (language, text) = match (req.language, req.text) {
        (Some(l), Some(t)) if !l.is_empty() && !t.is_empty() => (l, t),
        _ => return Err(ApiError::Validation("Missing 'language' or 'text' field".to_string())),
    };
    let (status, upstream) = state
        .grammar
        .check(&language, &text)
        .await
        .map_err(|e| ApiError::UpstreamUnavailable(e.to_string()))?;
    Ok((status, Json(upstream)))
}

pub async fn check_plagiarism(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<PlagiarismReport>> {
    let text = required_text(&body)?;
    let report = plagiarism::check(&state.corpus, &text);
    tracing::info!(status = ?report.status, score = report.score, document = ?report.document_id, "plagiarism check");
    Ok(Json(report))
}

pub async fn check_ai_text(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<AiReport>> {
    let Some(detector) = state.detector.get() else {
        return Err(ApiError::ModelUnavailable(
            "AI text detection model is not available. Please check server logs.".to_string(),
        ));
    };
    let text = required_text(&body)?;
    if text.trim().is_empty() {
        return Ok(Json(AiReport::empty_input()));
    }

    let (input, truncated) = truncate_for_detection(&text);
    if truncated {
        tracing::warn!(limit = MAX_DETECTION_CHARS, "input text truncated for AI detection");
    }
    let predictions = detector
        .classify(input)
        .await
        .map_err(|e| ApiError::internal("An unexpected error occurred during AI text detection", format!("{e:#}")))?;
    let report = assess(&predictions).map_err(|e| ApiError::internal("Invalid output from AI detection model", e))?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_body_rejects_non_objects() {
        for raw in ["not json", r#"["en", "text"]"#, "null", r#"{"text": 5}"#] {
            let err = parse_body::<TextRequest>(raw.as_bytes()).unwrap_err();
            assert_eq!(err.to_string(), "Invalid JSON payload");
        }
        let ok: TextRequest = parse_body(br#"{"text": "hi", "extra": true}"#).unwrap();
        assert_eq!(ok.text.as_deref(), Some("hi"));
    }

    #[test]
    fn missing_text_is_reported() {
        let err = required_text(b"{}").unwrap_err();
        assert_eq!(err.to_string(), "Invalid JSON payload, missing 'text' field");
    }
}
