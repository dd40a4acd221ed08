// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hybrid triage orchestrator.
//!
//! One `process_email` call runs the whole pipeline: normalize-validated
//! input is masked, classified deterministically, and routed. A standard
//! unambiguous case goes straight to the template drafter; anything else
//! consults the LLM fallback, bounded by a wall-clock timeout and a
//! cancellation token. The fallback only ever supplies a better extraction;
//! drafting and scoring stay deterministic on both routes.
//!
//! Errors never escape: every failure is absorbed into a
//! [`ProcessOutcome`] with `success = false`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};
use uuid::Uuid;

use kansel_core::traits::{Delivery, LlmFallback, Storage};
use kansel_core::{
    Draft, ExtractionResult, InboundEmail, KanselError, ProcessOutcome, ProcessRoute,
    ReviewRequest, Ticket,
};
use kansel_draft::DraftRequest;
use kansel_extract::{classify, score};
use kansel_privacy::mask;

/// Model label recorded on drafts produced without the LLM.
const TEMPLATE_MODEL: &str = "template-fallback";

/// Orchestrator knobs.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Slack channel review messages are posted to.
    pub channel: String,
    /// Base URL for ticket links; the ticket id is appended.
    pub ticket_url_base: Option<String>,
    /// Wall-clock budget for one fallback extraction.
    pub fallback_timeout: Duration,
    /// Retrieved guidance snippets handed to the drafter.
    pub context_snippets: Vec<String>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            channel: "#cancellation-review".to_string(),
            ticket_url_base: None,
            fallback_timeout: Duration::from_secs(30),
            context_snippets: Vec::new(),
        }
    }
}

/// The triage pipeline over injected collaborators.
pub struct Pipeline<S, D, F> {
    storage: Arc<S>,
    delivery: Arc<D>,
    /// `None` runs template-only triage (no API key configured).
    fallback: Option<Arc<F>>,
    settings: PipelineSettings,
    /// Tracks detached dispatch tasks so shutdown can wait for them.
    dispatches: TaskTracker,
}

impl<S, D, F> Pipeline<S, D, F>
where
    S: Storage + 'static,
    D: Delivery + 'static,
    F: LlmFallback + 'static,
{
    pub fn new(
        storage: Arc<S>,
        delivery: Arc<D>,
        fallback: Option<Arc<F>>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            storage,
            delivery,
            fallback,
            settings,
            dispatches: TaskTracker::new(),
        }
    }

    /// Wait for every in-flight Slack dispatch to finish. Called before a
    /// one-shot process exits so a detached post (or its retry enqueue) is
    /// not cut off mid-flight.
    pub async fn drain_dispatches(&self) {
        self.dispatches.close();
        self.dispatches.wait().await;
    }

    /// Process one inbound email end to end. Never returns an error; every
    /// failure is folded into the outcome.
    pub async fn process_email(&self, email: InboundEmail) -> ProcessOutcome {
        match self.run(email).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "pipeline run failed");
                ProcessOutcome::error(e.to_string())
            }
        }
    }

    async fn run(&self, email: InboundEmail) -> Result<ProcessOutcome, KanselError> {
        if email.raw_email.trim().is_empty() {
            return Err(KanselError::Validation(
                "inbound email has no body text".to_string(),
            ));
        }

        // Everything downstream of this point sees masked text only.
        let masked_body = mask(&email.raw_email);
        let masked_customer = mask(&email.customer_email);

        let deterministic = classify(&masked_body);
        if !deterministic.is_cancellation {
            debug!(source = %email.source, "not a cancellation, no action");
            return Ok(ProcessOutcome::no_action(deterministic));
        }

        let (extraction, route, model) = if deterministic.confidence_factors.is_standard() {
            (deterministic, ProcessRoute::Template, TEMPLATE_MODEL.to_string())
        } else {
            self.consult_fallback(&masked_body, deterministic).await
        };

        // The fallback can overturn the cancellation verdict; gating re-applies.
        if !extraction.is_cancellation {
            debug!(source = %email.source, "fallback ruled out cancellation, no action");
            return Ok(ProcessOutcome::no_action(extraction));
        }

        let confidence = score(&extraction);
        let draft_text = kansel_draft::draft(
            &DraftRequest::new(&extraction).with_context(&self.settings.context_snippets),
        );

        let now = Utc::now().to_rfc3339();
        let ticket = Ticket {
            id: Uuid::new_v4().to_string(),
            source: email.source.clone(),
            customer_email: masked_customer,
            raw_email: masked_body.clone(),
            reason: extraction.reason,
            move_date: extraction.move_date,
            created_at: now.clone(),
        };
        self.storage.create_ticket(&ticket).await?;

        let draft = Draft {
            id: Uuid::new_v4().to_string(),
            ticket_id: ticket.id.clone(),
            language: extraction.language,
            draft_text: draft_text.clone(),
            confidence: format!("{confidence:.2}"),
            model,
            created_at: now,
        };
        self.storage.create_draft(&draft).await?;

        info!(
            ticket_id = %ticket.id,
            draft_id = %draft.id,
            route = %route,
            confidence,
            "draft created"
        );

        let request = ReviewRequest {
            ticket_id: ticket.id.clone(),
            draft_id: draft.id.clone(),
            channel: self.settings.channel.clone(),
            original_email: masked_body,
            subject: email.subject,
            body: None,
            draft_text: draft_text.clone(),
            confidence,
            extraction: extraction.clone(),
            ticket_url: self
                .settings
                .ticket_url_base
                .as_ref()
                .map(|base| format!("{}/{}", base.trim_end_matches('/'), ticket.id)),
        };
        self.dispatch(request);

        Ok(ProcessOutcome {
            success: true,
            ticket_id: Some(ticket.id),
            draft_id: Some(draft.id),
            draft_text: Some(draft_text),
            confidence,
            route,
            extraction: Some(extraction),
            error: None,
        })
    }

    /// Ask the LLM for a better extraction, falling back to the deterministic
    /// one on any failure. Returns the extraction plus the route and model
    /// label that describe where it came from.
    async fn consult_fallback(
        &self,
        masked_body: &str,
        deterministic: ExtractionResult,
    ) -> (ExtractionResult, ProcessRoute, String) {
        let Some(fallback) = &self.fallback else {
            return (deterministic, ProcessRoute::Template, TEMPLATE_MODEL.to_string());
        };

        let cancel = CancellationToken::new();
        let attempt = tokio::time::timeout(
            self.settings.fallback_timeout,
            fallback.extract(masked_body, cancel.clone()),
        )
        .await;

        match attempt {
            Ok(Ok(extraction)) => {
                let model = fallback.model_id().to_string();
                (extraction, ProcessRoute::LlmFallback, model)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "fallback extraction failed, using deterministic result");
                (deterministic, ProcessRoute::Template, TEMPLATE_MODEL.to_string())
            }
            Err(_) => {
                cancel.cancel();
                warn!(
                    timeout = ?self.settings.fallback_timeout,
                    "fallback extraction timed out, using deterministic result"
                );
                (deterministic, ProcessRoute::Template, TEMPLATE_MODEL.to_string())
            }
        }
    }

    /// Fire-and-forget Slack dispatch. A failed post lands in the retry
    /// queue; nothing here ever delays or fails the originating request.
    fn dispatch(&self, request: ReviewRequest) {
        let delivery = Arc::clone(&self.delivery);
        let storage = Arc::clone(&self.storage);
        self.dispatches.spawn(async move {
            if let Err(e) = delivery.post_review(&request).await {
                warn!(
                    ticket_id = %request.ticket_id,
                    error = %e,
                    "review post failed, enqueueing retry"
                );
                let item = request.to_retry_item(&e.to_string());
                if let Err(e) = storage.enqueue_retry(&item).await {
                    warn!(ticket_id = %request.ticket_id, error = %e, "retry enqueue failed");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kansel_core::{CancellationReason, DeliveryError, EdgeCase, Language};
    use kansel_storage::SqliteStorage;
    use kansel_test_utils::{MockDelivery, MockFallback};
    use tempfile::tempdir;

    fn email(body: &str) -> InboundEmail {
        InboundEmail {
            source: "test".to_string(),
            customer_email: "kari@example.com".to_string(),
            subject: Some("Oppsigelse".to_string()),
            raw_email: body.to_string(),
        }
    }

    async fn setup() -> (
        Arc<SqliteStorage>,
        Arc<MockDelivery>,
        Arc<MockFallback>,
        tempfile::TempDir,
    ) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pipeline.db");
        let storage = Arc::new(SqliteStorage::open(path.to_str().unwrap()).await.unwrap());
        (
            storage,
            Arc::new(MockDelivery::new()),
            Arc::new(MockFallback::new()),
            dir,
        )
    }

    fn pipeline(
        storage: &Arc<SqliteStorage>,
        delivery: &Arc<MockDelivery>,
        fallback: Option<&Arc<MockFallback>>,
    ) -> Pipeline<SqliteStorage, MockDelivery, MockFallback> {
        Pipeline::new(
            Arc::clone(storage),
            Arc::clone(delivery),
            fallback.map(Arc::clone),
            PipelineSettings {
                ticket_url_base: Some("https://tickets.example".to_string()),
                ..PipelineSettings::default()
            },
        )
    }

    #[tokio::test]
    async fn standard_norwegian_relocation_routes_to_template() {
        let (storage, delivery, _fallback, _dir) = setup().await;
        let pipeline = pipeline(&storage, &delivery, None);

        let outcome = pipeline
            .process_email(email(
                "Hei, jeg skal flytte til Bergen og vil si opp abonnementet mitt \
                 ved slutten av m\u{e5}neden.",
            ))
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.route, ProcessRoute::Template);
        let draft_text = outcome.draft_text.as_deref().unwrap();
        assert!(draft_text.contains("utgangen av m\u{e5}neden"), "got: {draft_text}");

        // Ticket and draft persisted.
        let ticket = storage
            .get_ticket(outcome.ticket_id.as_deref().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ticket.reason, CancellationReason::Moving);
        let draft = storage
            .get_draft(outcome.draft_id.as_deref().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(draft.model, "template-fallback");
        assert_eq!(draft.language, Language::No);

        pipeline.drain_dispatches().await;
        let posts = delivery.posts().await;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].channel, "#cancellation-review");
        assert!(
            posts[0]
                .ticket_url
                .as_deref()
                .unwrap()
                .starts_with("https://tickets.example/")
        );
    }

    #[tokio::test]
    async fn survey_email_takes_no_action() {
        let (storage, delivery, _fallback, _dir) = setup().await;
        let pipeline = pipeline(&storage, &delivery, None);

        let outcome = pipeline
            .process_email(email(
                "How would you rate your experience with our app? Please fill in our survey.",
            ))
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.route, ProcessRoute::NoAction);
        assert!(outcome.ticket_id.is_none());
        assert!(outcome.draft_id.is_none());
        assert_eq!(delivery.post_count().await, 0);
    }

    #[tokio::test]
    async fn non_standard_case_consults_fallback() {
        let (storage, delivery, fallback, _dir) = setup().await;

        let mut extraction = ExtractionResult::non_cancellation(Language::No);
        extraction.is_cancellation = true;
        extraction.reason = CancellationReason::Moving;
        extraction.edge_case = EdgeCase::NoAppAccess;
        extraction.confidence_factors.clear_intent = true;
        extraction.confidence_factors.complete_information = true;
        fallback.push_result(Ok(extraction)).await;

        let pipeline = pipeline(&storage, &delivery, Some(&fallback));
        // No-app-access wording keeps the deterministic factors non-standard.
        let outcome = pipeline
            .process_email(email(
                "Hei, jeg vil si opp abonnementet, men jeg har ikke tilgang til appen \
                 lenger. Ring meg p\u{e5} 91234567 eller skriv til kari@example.com.",
            ))
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.route, ProcessRoute::LlmFallback);
        assert_eq!(fallback.call_count().await, 1);

        // The model only ever sees masked text.
        let inputs = fallback.inputs().await;
        assert!(inputs[0].contains("[phone]"), "got: {}", inputs[0]);
        assert!(inputs[0].contains("[email]"), "got: {}", inputs[0]);
        assert!(!inputs[0].contains("91234567"));
        assert!(!inputs[0].contains("kari@example.com"));

        let draft = storage
            .get_draft(outcome.draft_id.as_deref().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(draft.model, "mock-model");
        // Edge template: manual handling wording, no app reference.
        let text = outcome.draft_text.as_deref().unwrap();
        assert!(text.contains("manuelt"), "got: {text}");
        assert!(!text.contains("i appen"), "got: {text}");
    }

    #[tokio::test]
    async fn fallback_failure_degrades_to_deterministic_template() {
        let (storage, delivery, fallback, _dir) = setup().await;
        fallback
            .push_result(Err(KanselError::Fallback {
                message: "rate limit exceeded".to_string(),
                source: None,
            }))
            .await;

        let pipeline = pipeline(&storage, &delivery, Some(&fallback));
        let outcome = pipeline
            .process_email(email(
                "Hei, jeg vil si opp abonnementet, men jeg har ikke tilgang til appen lenger.",
            ))
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.route, ProcessRoute::Template);
        let draft = storage
            .get_draft(outcome.draft_id.as_deref().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(draft.model, "template-fallback");
    }

    #[tokio::test]
    async fn fallback_can_rule_out_cancellation() {
        let (storage, delivery, fallback, _dir) = setup().await;
        fallback
            .push_result(Ok(ExtractionResult::non_cancellation(Language::No)))
            .await;

        let pipeline = pipeline(&storage, &delivery, Some(&fallback));
        let outcome = pipeline
            .process_email(email(
                "Kanskje jeg burde si opp abonnementet, hva koster det egentlig?",
            ))
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.route, ProcessRoute::NoAction);
        assert!(outcome.ticket_id.is_none());
    }

    #[tokio::test]
    async fn failed_post_lands_in_retry_queue() {
        let (storage, delivery, _fallback, _dir) = setup().await;
        delivery
            .push_outcome(Err(DeliveryError::Transient("503".to_string())))
            .await;

        let pipeline = pipeline(&storage, &delivery, None);
        let outcome = pipeline
            .process_email(email(
                "Hei, jeg skal flytte til Bergen og vil si opp abonnementet mitt \
                 ved slutten av m\u{e5}neden.",
            ))
            .await;
        assert!(outcome.success);

        // Draining covers both the failed post and the retry enqueue.
        pipeline.drain_dispatches().await;
        assert_eq!(delivery.post_count().await, 1);
        let stats = storage.retry_queue_stats().await.unwrap();
        assert_eq!(stats.pending, 1);

        let due = storage.due_retry_items(5).await.unwrap();
        assert_eq!(due[0].ticket_id, outcome.ticket_id.unwrap());
        assert_eq!(due[0].last_error.as_deref(), Some("transient delivery failure: 503"));
    }

    #[tokio::test]
    async fn empty_body_is_an_error_outcome() {
        let (storage, delivery, _fallback, _dir) = setup().await;
        let pipeline = pipeline(&storage, &delivery, None);

        let outcome = pipeline.process_email(email("   ")).await;
        assert!(!outcome.success);
        assert_eq!(outcome.route, ProcessRoute::Error);
        assert!(outcome.error.as_deref().unwrap().contains("no body text"));
    }

    #[tokio::test]
    async fn persisted_ticket_is_masked() {
        let (storage, delivery, _fallback, _dir) = setup().await;
        let pipeline = pipeline(&storage, &delivery, None);

        let outcome = pipeline
            .process_email(email(
                "Hei, jeg skal flytte og vil si opp. Ring meg p\u{e5} +47 99 88 77 66.",
            ))
            .await;

        let ticket = storage
            .get_ticket(outcome.ticket_id.as_deref().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(ticket.raw_email.contains("[phone]"), "got: {}", ticket.raw_email);
        assert!(!ticket.raw_email.contains("99 88 77 66"));
        assert_eq!(ticket.customer_email, "[email]");
    }
}
