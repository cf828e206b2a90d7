// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::events::NotificationEvent;

/// A notification email ready to be queued for delivery.
///
/// Composition and delivery are separate concerns: this crate builds the
/// message, the persistence layer queues it, and an external relay sends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMail {
    /// The recipient email address.
    pub to: String,
    /// The subject line.
    pub subject: String,
    /// The HTML body.
    pub html: String,
}

/// Composes one notification email per recipient for an event.
///
/// Returns an empty vector when no recipients are configured. Subject and
/// body are in Portuguese, matching the audience of the field teams.
#[must_use]
pub fn compose_mail(event: &NotificationEvent, recipients: &[String]) -> Vec<ComposedMail> {
    let (subject, html): (String, String) = render(event);

    recipients
        .iter()
        .map(|recipient| ComposedMail {
            to: recipient.clone(),
            subject: subject.clone(),
            html: html.clone(),
        })
        .collect()
}

fn render(event: &NotificationEvent) -> (String, String) {
    match event {
        NotificationEvent::AreaCreated { area } => (
            format!("CanaControl: nova área {}", area.sector_lote),
            format!(
                "<p>A área <strong>{}</strong> (talhões {}) foi cadastrada.</p>\
                 <p>Plantio em {}; primeira vistoria agendada para {}.</p>",
                area.sector_lote,
                area.plots,
                area.planting_date,
                area.next_inspection_date.as_deref().unwrap_or("—")
            ),
        ),
        NotificationEvent::AreaUpdated { area_id, .. } => (
            String::from("CanaControl: área atualizada"),
            format!("<p>A área <strong>{area_id}</strong> teve seus dados atualizados.</p>"),
        ),
        NotificationEvent::AreaDeleted { area_id } => (
            String::from("CanaControl: área removida"),
            format!("<p>A área <strong>{area_id}</strong> foi removida do acompanhamento.</p>"),
        ),
        NotificationEvent::StatusUpdated {
            area_id,
            new_status,
        } => (
            format!("CanaControl: vistoria registrada ({new_status})"),
            format!(
                "<p>Uma vistoria foi registrada para a área <strong>{area_id}</strong>.</p>\
                 <p>Novo status: <strong>{new_status}</strong>.</p>"
            ),
        ),
    }
}
