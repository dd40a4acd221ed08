// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LLM fallback collaborator trait.
//!
//! Invoked only when the deterministic classifier flags an ambiguous or
//! non-standard case. Input is already-masked text; implementations must
//! never see raw PII.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::KanselError;
use crate::types::ExtractionResult;

/// Structured extraction via an LLM, bounded by the orchestrator's timeout.
#[async_trait]
pub trait LlmFallback: Send + Sync {
    /// Model identifier recorded on drafts produced from this extraction.
    fn model_id(&self) -> &str;

    /// Extract intent from masked email text. Implementations must observe
    /// `cancel` and abort the pending network call when it fires.
    async fn extract(
        &self,
        masked_email: &str,
        cancel: CancellationToken,
    ) -> Result<ExtractionResult, KanselError>;
}
