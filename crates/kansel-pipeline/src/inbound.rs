// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound webhook payload normalization.
//!
//! The email collaborator has posted two shapes over time: the legacy
//! single-field `raw_email` form, and the current `subject` + `body` form.
//! One pure function folds both into [`InboundEmail`] so the orchestrator
//! only ever sees one shape.

use serde::Deserialize;

use kansel_core::{InboundEmail, KanselError};

/// Wire shape accepted from the inbound webhook. All fields optional; the
/// normalizer decides what is actually required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundPayload {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    /// Legacy form: full email text in one field.
    #[serde(default)]
    pub raw_email: Option<String>,
}

/// Fold the two accepted wire shapes into one [`InboundEmail`].
///
/// The current `body` field wins over legacy `raw_email` when both are
/// present. An email with no usable text is rejected here, before any
/// pipeline work happens.
pub fn normalize(payload: InboundPayload) -> Result<InboundEmail, KanselError> {
    let body = payload
        .body
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .or(payload.raw_email.as_deref().filter(|b| !b.trim().is_empty()))
        .map(str::to_string)
        .ok_or_else(|| {
            KanselError::Validation("inbound email has no body text".to_string())
        })?;

    let subject = payload
        .subject
        .filter(|s| !s.trim().is_empty());

    Ok(InboundEmail {
        source: payload.source.unwrap_or_else(|| "email".to_string()),
        customer_email: payload
            .customer_email
            .unwrap_or_else(|| "unknown".to_string()),
        subject,
        raw_email: body,
    })
}
