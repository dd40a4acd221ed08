// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Norwegian reply templates.

use chrono::{Months, NaiveDate};
use kansel_core::{CancellationReason, EdgeCase, ExtractionResult};

use crate::DraftRequest;

const GREETING: &str = "Hei,";
const POLICY: &str =
    "Merk at oppsigelsen gjelder fra utgangen av måneden den registreres i.";
const APP_REFERENCE: &str =
    "Du kan også se og administrere oppsigelsen direkte i appen under «Abonnement».";
const SIGNOFF: &str = "Vennlig hilsen\nKundeservice";

fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

pub(crate) fn render(request: &DraftRequest) -> Vec<String> {
    let extraction = request.extraction;
    let mut paragraphs = vec![GREETING.to_string()];

    match extraction.edge_case {
        EdgeCase::NoAppAccess => {
            paragraphs.push(
                "Takk for henvendelsen. Vi registrerer oppsigelsen manuelt for deg, \
                 så du trenger ikke å gjøre noe mer selv."
                    .to_string(),
            );
            paragraphs.push(POLICY.to_string());
        }
        EdgeCase::SameieConcern => {
            paragraphs.push(
                "Takk for henvendelsen. Siden abonnementet er knyttet til et sameie, \
                 vil vi gjerne avklare avtaleforholdet før vi avslutter noe. Vi sender \
                 saken videre til teamet som håndterer fellesavtaler, og de tar kontakt \
                 med deg."
                    .to_string(),
            );
            paragraphs.push(POLICY.to_string());
        }
        EdgeCase::FutureMoveDate => {
            let lead = match extraction.move_date {
                Some(date) => format!(
                    "Takk for beskjed om flyttingen {}. Siden datoen ligger et stykke \
                     frem i tid, anbefaler vi å vente med selve oppsigelsen til nærmere \
                     flyttedatoen, slik at abonnementet ikke avsluttes for tidlig.",
                    format_date(date)
                ),
                None => "Takk for beskjed om flyttingen. Siden den ligger et stykke frem \
                         i tid, anbefaler vi å vente med selve oppsigelsen til nærmere \
                         flyttedatoen."
                    .to_string(),
            };
            paragraphs.push(lead);
            paragraphs.push(POLICY.to_string());
        }
        EdgeCase::AlreadyCanceled => {
            paragraphs.push(
                "Takk for henvendelsen. Du oppgir at abonnementet allerede skal være \
                 sagt opp, så vi dobbeltsjekker nå statusen på avtalen din. Du hører \
                 fra oss så snart det er bekreftet."
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
                    "Takk for beskjed om flyttingen. Vi har registrert ønsket ditt om å \
                     si opp abonnementet i forbindelse med flytting {}.",
                    format_date(date)
                ));
                let far = today
                    .checked_add_months(Months::new(2))
                    .map(|horizon| date > horizon)
                    .unwrap_or(false);
                if far {
                    out.push(format!(
                        "Siden flyttedatoen ligger et stykke frem i tid, kan det lønne \
                         seg å vente med oppsigelsen til nærmere {}.",
                        format_date(date)
                    ));
                }
            }
            None => out.push(
                "Takk for beskjed om flyttingen. Vi har registrert ønsket ditt om å si \
                 opp abonnementet. Gi oss gjerne beskjed om flyttedatoen, så sørger vi \
                 for riktig sluttdato."
                    .to_string(),
            ),
        },
        CancellationReason::PaymentIssue => out.push(
            "Vi beklager utfordringene med faktureringen. Oppsigelsen er registrert, og \
             vi sender betalingsspørsmålet videre til fakturateamet vårt, som ser \
             nærmere på saken."
                .to_string(),
        ),
        CancellationReason::Other | CancellationReason::Unknown => out.push(
            "Takk for henvendelsen. Vi har registrert ønsket ditt om å si opp \
             abonnementet."
                .to_string(),
        ),
    }
}
