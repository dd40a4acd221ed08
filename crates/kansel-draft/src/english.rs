// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! English reply templates. Mirrors the Norwegian branch structure.

use chrono::{Months, NaiveDate};
use kansel_core::{CancellationReason, EdgeCase, ExtractionResult};

use crate::DraftRequest;

const GREETING: &str = "Hi,";
const POLICY: &str = "Please note that the cancellation takes effect at the end of the \
                      month it is registered in.";
const APP_REFERENCE: &str = "You can also review and manage the cancellation directly \
                             in the app under \"Subscription\".";
const SIGNOFF: &str = "Best regards,\nCustomer Service";

fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub(crate) fn render(request: &DraftRequest) -> Vec<String> {
    let extraction = request.extraction;
    let mut paragraphs = vec![GREETING.to_string()];

    match extraction.edge_case {
        EdgeCase::NoAppAccess => {
            paragraphs.push(
                "Thank you for reaching out. We will register the cancellation manually \
                 for you, so there is nothing more you need to do yourself."
                    .to_string(),
            );
            paragraphs.push(POLICY.to_string());
        }
        EdgeCase::SameieConcern => {
            paragraphs.push(
                "Thank you for reaching out. Since the subscription is tied to a housing \
                 association agreement, we would like to clarify the contract before \
                 closing anything. We are forwarding your case to the team handling \
                 shared agreements, and they will contact you."
                    .to_string(),
            );
            paragraphs.push(POLICY.to_string());
        }
        EdgeCase::FutureMoveDate => {
            let lead = match extraction.move_date {
                Some(date) => format!(
                    "Thank you for letting us know about your move on {}. Since the date \
                     is a while away, we recommend waiting until closer to the move \
                     before finalizing the cancellation, so the subscription is not \
                     closed too early.",
                    format_date(date)
                ),
                None => "Thank you for letting us know about your move. Since it is a \
                         while away, we recommend waiting until closer to the move date \
                         before finalizing the cancellation."
                    .to_string(),
            };
            paragraphs.push(lead);
            paragraphs.push(POLICY.to_string());
        }
        EdgeCase::AlreadyCanceled => {
            paragraphs.push(
                "Thank you for reaching out. You mention that the subscription has \
                 already been cancelled, so we are double-checking the status of your \
                 agreement and will confirm as soon as it is verified."
                    .to_string(),
            );
            paragraphs.push(POLICY.to_string());
        }
        _ => {
            standard_body(extraction, request.reference_date, &mut paragraphs);
            paragraphs.push(POLICY.to_string());
            paragraphs.push(APP_REFERENCE.to_string());
        }
    }

    paragraphs.push(SIGNOFF.to_string());
    paragraphs
}

fn standard_body(extraction: &ExtractionResult, today: NaiveDate, out: &mut Vec<String>) {
    match extraction.reason {
        CancellationReason::Moving => match extraction.move_date {
            Some(date) => {
                out.push(format!(
                    "Thank you for letting us know about your move. We have registered \
                     your cancellation request in connection with the move on {}.",
                    format_date(date)
                ));
                let far = today
                    .checked_add_months(Months::new(2))
                    .map(|horizon| date > horizon)
                    .unwrap_or(false);
                if far {
                    out.push(format!(
                        "Since the move date is a while away, it may be worth waiting \
                         until closer to {} before the cancellation takes effect.",
                        format_date(date)
                    ));
                }
            }
            None => out.push(
                "Thank you for letting us know about your move. We have registered your \
                 cancellation request. If you can share the move date, we will make sure \
                 the end date matches."
                    .to_string(),
            ),
        },
        CancellationReason::PaymentIssue => out.push(
            "We are sorry about the billing trouble. The cancellation is registered, \
             and we are forwarding the payment question to our billing team for a \
             closer look."
                .to_string(),
        ),
        CancellationReason::Other | CancellationReason::Unknown => out.push(
            "Thank you for reaching out. We have registered your request to cancel the \
             subscription."
                .to_string(),
        ),
    }
}
