use anyhow::{Context, Result};
use axum::http::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Error connecting to LanguageTool server: {0}")]
pub struct GrammarError(#[from] reqwest::Error);

/// Form-encoded proxy to a LanguageTool-compatible `/v2/check` endpoint.
#[derive(Clone)]
pub struct LanguageToolClient {
    client: reqwest::Client,
    url: String,
}

impl LanguageToolClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create LanguageTool HTTP client")?;
        Ok(Self { client, url: url.into() })
    }

    pub fn url(&self) -> &str { &self.url }

    /// Forward `language` and `text`. Returns the upstream status and JSON body; any
    /// transport failure, non-2xx status or non-JSON body is an error.
    pub async fn check(&self, language: &str, text: &str) -> Result<(StatusCode, Value), GrammarError> {
        let resp = self
            .client
            .post(&self.url)
            .form(&[("language", language), ("text", text)])
            .send()
            .await?
            .error_for_status()?;
        let status = resp.status();
        let body = resp.json::<Value>().await?;
        Ok((status, body))
    }
}
