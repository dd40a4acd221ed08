// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Anthropic Messages API, specialized to structured
//! extraction.
//!
//! One non-streaming request per call: the model is asked for a single JSON
//! object matching [`ExtractionResult`]. Failures map to `Fallback` errors
//! whose messages carry distinguishing substrings ("timed out",
//! "rate limit", "quota", "authentication") that callers key retry policy on.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use kansel_core::traits::LlmFallback;
use kansel_core::{ExtractionResult, KanselError};

const API_BASE_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SYSTEM_PROMPT: &str = "You analyze customer service emails about subscription \
cancellations. The email text has PII placeholders like [email] and [phone]. Respond \
with exactly one JSON object and nothing else, with these fields: is_cancellation \
(bool), reason (\"moving\"|\"payment_issue\"|\"other\"|\"unknown\"), move_date \
(\"YYYY-MM-DD\" or null), language (\"no\"|\"en\"|\"sv\"), edge_case (\"none\"|\
\"no_app_access\"|\"corporate_account\"|\"future_move_date\"|\"already_canceled\"|\
\"sameie_concern\"|\"payment_dispute\"), has_payment_issue (bool), payment_concerns \
(string array), urgency (\"immediate\"|\"future\"|\"unclear\"), customer_concerns \
(string array), policy_risks (string array), confidence_factors (object with \
clear_intent, complete_information, standard_case booleans).";

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

fn fallback_err(message: impl Into<String>) -> KanselError {
    KanselError::Fallback {
        message: message.into(),
        source: None,
    }
}

/// Messages API client implementing the `LlmFallback` trait.
#[derive(Debug, Clone)]
pub struct AnthropicExtractor {
    client: reqwest::Client,
    model: String,
    base_url: String,
}

impl AnthropicExtractor {
    pub fn new(api_key: &str, model: String) -> Result<Self, KanselError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key)
                .map_err(|e| KanselError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| KanselError::Fallback {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            model,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    fn build_request(&self, masked_email: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "max_tokens": 1024,
            "system": SYSTEM_PROMPT,
            "messages": [{ "role": "user", "content": masked_email }],
        })
    }

    async fn send(&self, masked_email: &str) -> Result<ExtractionResult, KanselError> {
        let request = self.build_request(masked_email);
        let response = self
            .client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    fallback_err(format!(
                        "extraction request timed out after {REQUEST_TIMEOUT:?}"
                    ))
                } else {
                    fallback_err(format!("HTTP request failed: {e}"))
                }
            })?;

        let status = response.status();
        debug!(status = %status, "extraction response received");
        let body = response
            .text()
            .await
            .map_err(|e| fallback_err(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            let message = match status.as_u16() {
                429 => format!("rate limit exceeded: {body}"),
                401 | 403 => format!("authentication failed: {body}"),
                400 if body.contains("credit") || body.contains("quota") => {
                    format!("quota exhausted: {body}")
                }
                _ => format!("API returned {status}: {body}"),
            };
            return Err(fallback_err(message));
        }

        parse_extraction(&body)
    }
}

/// Pull the first text block out of the response and parse it as an
/// [`ExtractionResult`]. Tolerates markdown code fences around the JSON.
fn parse_extraction(body: &str) -> Result<ExtractionResult, KanselError> {
    let response: MessagesResponse = serde_json::from_str(body)
        .map_err(|e| fallback_err(format!("malformed API response: {e}")))?;
    let text = response
        .content
        .iter()
        .find(|block| block.kind == "text")
        .map(|block| block.text.as_str())
        .ok_or_else(|| fallback_err("response contained no text block"))?;

    let trimmed = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    serde_json::from_str(trimmed)
        .map_err(|e| fallback_err(format!("model did not return valid extraction JSON: {e}")))
}

#[async_trait]
impl LlmFallback for AnthropicExtractor {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn extract(
        &self,
        masked_email: &str,
        cancel: CancellationToken,
    ) -> Result<ExtractionResult, KanselError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(fallback_err("extraction canceled")),
            result = self.send(masked_email) => result,
        }
    }
}
