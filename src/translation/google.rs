use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, trace};

use super::{ProviderMetrics, ProviderReport, TranslationProcessor};
use crate::config::Config;
use crate::error::ProviderError;
use crate::locale::Locale;
use crate::retry::{with_retry_if, RetryConfig};

/// Response body of the free Google translate endpoint with `dj=1`.
#[derive(Debug, Deserialize)]
struct GoogleTranslation {
    sentences: Vec<Sentence>,
    #[serde(default)]
    src: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Sentence {
    #[serde(default)]
    trans: Option<String>,
    #[serde(default)]
    orig: Option<String>,
    #[serde(default)]
    backend: Option<i64>,
}

/// Translates through `translate.googleapis.com` (no API key).
pub struct GoogleTranslateProcessor {
    client: reqwest::Client,
    endpoint: String,
    client_id: String,
    retry: RetryConfig,
    metrics: ProviderMetrics,
}

impl GoogleTranslateProcessor {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client for translation provider")?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            endpoint: config.translate_api_url.clone(),
            client_id: config.translate_client.clone(),
            retry: RetryConfig::provider_call(config.max_retry_attempts),
            metrics: ProviderMetrics::new(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn request_once(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        self.metrics.record_api_call();
        let result = self.send(text, source_language, target_language).await;
        if result.is_err() {
            self.metrics.record_api_failure();
        }
        result
    }

    async fn send(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(ACCEPT, "application/json")
            .query(&[
                ("client", self.client_id.as_str()),
                ("sl", source_language),
                ("tl", target_language),
                ("dt", "t"),
                ("q", text),
                ("dj", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        parse_translation(&body)
    }
}

/// Concatenate the `trans` parts of every sentence, in order.
fn parse_translation(body: &str) -> Result<String, ProviderError> {
    let parsed: GoogleTranslation =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;

    trace!(
        "Provider detected source '{:?}' with confidence {:?}",
        parsed.src,
        parsed.confidence
    );

    let mut translated = String::new();
    let mut found = false;
    for sentence in &parsed.sentences {
        trace!(
            "Sentence (backend {:?}): {:?} -> {:?}",
            sentence.backend,
            sentence.orig,
            sentence.trans
        );
        if let Some(trans) = &sentence.trans {
            translated.push_str(trans);
            found = true;
        }
    }

    if !found {
        return Err(ProviderError::EmptyResponse);
    }
    Ok(translated)
}

#[async_trait]
impl TranslationProcessor for GoogleTranslateProcessor {
    fn name(&self) -> &str {
        "google-free"
    }

    async fn translate(
        &self,
        text: &str,
        source: &Locale,
        target: &Locale,
    ) -> Result<String, ProviderError> {
        let operation = format!("Translation {} -> {}", source, target);
        let translated = with_retry_if(
            &self.retry,
            &operation,
            || self.request_once(text, source.language(), target.language()),
            ProviderError::is_retryable,
        )
        .await?;

        self.metrics.record_translation();
        debug!("{}: {:?} -> {:?}", operation, text, translated);
        Ok(translated)
    }

    fn metrics(&self) -> Option<ProviderReport> {
        Some(self.metrics.report())
    }
}
