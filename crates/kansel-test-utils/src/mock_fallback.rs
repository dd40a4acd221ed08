// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted LLM fallback mock.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use kansel_core::traits::LlmFallback;
use kansel_core::{ExtractionResult, KanselError};

/// An `LlmFallback` implementation that replays queued extractions.
///
/// With an empty queue, `extract` returns a `Fallback` error, which mirrors
/// an unavailable provider. Inputs are recorded for assertions.
#[derive(Default)]
pub struct MockFallback {
    results: Mutex<VecDeque<Result<ExtractionResult, KanselError>>>,
    inputs: Mutex<Vec<String>>,
}

impl MockFallback {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_result(&self, result: Result<ExtractionResult, KanselError>) {
        self.results.lock().await.push_back(result);
    }

    /// Masked email bodies the fallback was asked to extract, in order.
    pub async fn inputs(&self) -> Vec<String> {
        self.inputs.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.inputs.lock().await.len()
    }
}

#[async_trait]
impl LlmFallback for MockFallback {
    fn model_id(&self) -> &str {
        "mock-model"
    }

    async fn extract(
        &self,
        masked_email: &str,
        _cancel: CancellationToken,
    ) -> Result<ExtractionResult, KanselError> {
        self.inputs.lock().await.push(masked_email.to_string());
        self.results
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| {
                Err(KanselError::Fallback {
                    message: "no scripted result queued".to_string(),
                    source: None,
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kansel_core::Language;

    #[tokio::test]
    async fn replays_results_and_records_inputs() {
        let mock = MockFallback::new();
        mock.push_result(Ok(ExtractionResult::non_cancellation(Language::En)))
            .await;

        let got = mock
            .extract("masked body", CancellationToken::new())
            .await
            .unwrap();
        assert!(!got.is_cancellation);

        // Queue exhausted: next call errors.
        assert!(mock
            .extract("second body", CancellationToken::new())
            .await
            .is_err());
        assert_eq!(mock.inputs().await, vec!["masked body", "second body"]);
    }
}
