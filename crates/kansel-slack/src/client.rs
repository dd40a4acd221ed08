// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for posting review messages to Slack.
//!
//! One formatted message per draft: masked original, generated reply,
//! confidence with priority label, and the extraction summary. The outbound
//! sanitizer runs on the full payload before anything leaves the process.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use kansel_core::traits::Delivery;
use kansel_core::{DeliveryError, KanselError, ReviewPriority, ReviewRequest};
use kansel_privacy::assert_masked;

/// Client for one Slack webhook endpoint.
#[derive(Debug, Clone)]
pub struct SlackClient {
    client: reqwest::Client,
    webhook_url: String,
}

impl SlackClient {
    pub fn new(webhook_url: String) -> Result<Self, KanselError> {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| KanselError::Delivery {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            webhook_url,
        })
    }

    /// Render the review message text for one request.
    pub fn format_message(request: &ReviewRequest) -> String {
        let extraction = &request.extraction;
        let priority = ReviewPriority::from_score(request.confidence);
        let move_date = extraction
            .move_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let subject = request.subject.as_deref().unwrap_or("-");
        let mut message = format!(
            "New cancellation draft for review\n\
             Ticket: {} | Draft: {}\n\
             Subject: {}\n\
             Confidence: {:.2} ({})\n\
             Reason: {} | Language: {} | Edge case: {} | Urgency: {}\n\
             Move date: {}\n\n\
             --- Original (masked) ---\n{}\n\n\
             --- Draft reply ---\n{}",
            request.ticket_id,
            request.draft_id,
            subject,
            request.confidence,
            priority,
            extraction.reason,
            extraction.language,
            extraction.edge_case,
            extraction.urgency,
            move_date,
            request.original_email,
            request.draft_text,
        );
        if !extraction.policy_risks.is_empty() {
            message.push_str(&format!(
                "\n\nPolicy risks: {}",
                extraction.policy_risks.join(", ")
            ));
        }
        if let Some(url) = &request.ticket_url {
            message.push_str(&format!("\n\nTicket: {url}"));
        }
        message
    }

    fn parse_retry_after(headers: &HeaderMap, body: &str) -> Option<u64> {
        // Header wins over any body field.
        let from_header = headers
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok());
        if from_header.is_some() {
            return from_header;
        }
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("retry_after").and_then(|r| r.as_u64()))
    }
}

#[async_trait]
impl Delivery for SlackClient {
    async fn post_review(&self, request: &ReviewRequest) -> Result<(), DeliveryError> {
        let text = Self::format_message(request);
        // Hard gate: an unmasked payload is never sent, retried or not.
        assert_masked(&text).map_err(|e| DeliveryError::Fatal(e.to_string()))?;

        let payload = serde_json::json!({
            "channel": request.channel,
            "text": text,
        });

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DeliveryError::Transient(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        debug!(status = %status, ticket_id = %request.ticket_id, "Slack response received");

        if status.is_success() {
            return Ok(());
        }

        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            return Err(DeliveryError::RateLimited {
                retry_after: Self::parse_retry_after(&headers, &body),
            });
        }
        if status.is_server_error() {
            return Err(DeliveryError::Transient(format!(
                "Slack returned {status}: {body}"
            )));
        }
        Err(DeliveryError::Fatal(format!(
            "Slack returned {status}: {body}"
        )))
    }
}
