// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::create_test_area_result;
use crate::{DeliveryState, OutboundMail, Persistence, PersistenceError};

fn test_mail(recipient: &str) -> OutboundMail {
    OutboundMail::new(
        recipient.to_string(),
        String::from("Nova área cadastrada"),
        String::from("<p>Área S1/L01 cadastrada.</p>"),
    )
}

#[test]
fn test_enqueued_mail_starts_queued() {
    let persistence: Persistence = Persistence::new_in_memory().expect("In-memory database");

    let mail_id: i64 = persistence
        .enqueue_mail(&test_mail("gestor@example.com"))
        .expect("Enqueue mail");
    assert!(mail_id > 0);

    let queued: Vec<OutboundMail> = persistence.list_queued_mail().expect("List succeeds");
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].mail_id, Some(mail_id));
    assert_eq!(queued[0].delivery_state, DeliveryState::Queued);
    assert_eq!(queued[0].recipient, "gestor@example.com");
}

#[test]
fn test_queue_preserves_enqueue_order() {
    let persistence: Persistence = Persistence::new_in_memory().expect("In-memory database");

    persistence
        .enqueue_mail(&test_mail("primeiro@example.com"))
        .expect("Enqueue mail");
    persistence
        .enqueue_mail(&test_mail("segundo@example.com"))
        .expect("Enqueue mail");

    let queued: Vec<OutboundMail> = persistence.list_queued_mail().expect("List succeeds");
    assert_eq!(queued[0].recipient, "primeiro@example.com");
    assert_eq!(queued[1].recipient, "segundo@example.com");
}

#[test]
fn test_delivered_mail_leaves_the_queue() {
    let persistence: Persistence = Persistence::new_in_memory().expect("In-memory database");

    let mail_id: i64 = persistence
        .enqueue_mail(&test_mail("gestor@example.com"))
        .expect("Enqueue mail");
    persistence
        .mark_mail_delivery(mail_id, DeliveryState::Success, None)
        .expect("Mark delivered");

    let queued: Vec<OutboundMail> = persistence.list_queued_mail().expect("List succeeds");
    assert!(queued.is_empty());
}

#[test]
fn test_failed_delivery_records_error_message() {
    let persistence: Persistence = Persistence::new_in_memory().expect("In-memory database");

    let mail_id: i64 = persistence
        .enqueue_mail(&test_mail("gestor@example.com"))
        .expect("Enqueue mail");
    persistence
        .mark_mail_delivery(mail_id, DeliveryState::Error, Some("SMTP timeout"))
        .expect("Mark failed");

    // Failed mail is no longer queued but keeps its error detail.
    let queued: Vec<OutboundMail> = persistence.list_queued_mail().expect("List succeeds");
    assert!(queued.is_empty());
}

#[test]
fn test_marking_unknown_mail_is_rejected() {
    let persistence: Persistence = Persistence::new_in_memory().expect("In-memory database");

    let result = persistence.mark_mail_delivery(999, DeliveryState::Success, None);

    assert_eq!(result, Err(PersistenceError::MailNotFound(999)));
}

#[test]
fn test_mail_queue_is_independent_of_area_state() {
    let mut persistence: Persistence = Persistence::new_in_memory().expect("In-memory database");
    let created = create_test_area_result("S1/L01");
    persistence.create_area(&created).expect("Persist creation");

    persistence
        .enqueue_mail(&test_mail("gestor@example.com"))
        .expect("Enqueue mail");

    assert_eq!(persistence.list_queued_mail().expect("List").len(), 1);
    assert_eq!(persistence.list_areas().expect("List").len(), 1);
}
