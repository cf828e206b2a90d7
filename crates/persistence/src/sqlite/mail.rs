// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rusqlite::{Connection, Result as SqliteResult, params};
use tracing::debug;

use crate::data_models::{DeliveryState, OutboundMail};
use crate::error::PersistenceError;

/// Enqueues a notification email for delivery.
///
/// # Returns
///
/// The mail ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn enqueue_mail(conn: &Connection, mail: &OutboundMail) -> Result<i64, PersistenceError> {
    conn.execute(
        "INSERT INTO outbound_mail (recipient, subject, html_body, delivery_state)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            mail.recipient,
            mail.subject,
            mail.html_body,
            mail.delivery_state.as_str()
        ],
    )?;

    let mail_id: i64 = conn.last_insert_rowid();
    debug!(mail_id, recipient = %mail.recipient, "Enqueued notification email");

    Ok(mail_id)
}

/// Retrieves all emails still waiting for delivery, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_queued_mail(conn: &Connection) -> Result<Vec<OutboundMail>, PersistenceError> {
    let mut stmt = conn.prepare(
        "SELECT mail_id, recipient, subject, html_body, delivery_state, error_message
         FROM outbound_mail
         WHERE delivery_state = 'QUEUED'
         ORDER BY mail_id ASC",
    )?;

    let rows: Vec<(i64, String, String, String, String, Option<String>)> = stmt
        .query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
            ))
        })?
        .collect::<SqliteResult<Vec<_>>>()?;

    rows.into_iter()
        .map(
            |(mail_id, recipient, subject, html_body, state, error_message)| {
                Ok(OutboundMail {
                    mail_id: Some(mail_id),
                    recipient,
                    subject,
                    html_body,
                    delivery_state: DeliveryState::parse(&state)?,
                    error_message,
                })
            },
        )
        .collect()
}

/// Records the delivery outcome for a queued email.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `mail_id` - The mail document to update
/// * `state` - The new delivery state
/// * `error_message` - The failure detail, for `Error` outcomes
///
/// # Errors
///
/// Returns `MailNotFound` if no mail document exists with this ID.
pub fn mark_mail_delivery(
    conn: &Connection,
    mail_id: i64,
    state: DeliveryState,
    error_message: Option<&str>,
) -> Result<(), PersistenceError> {
    let updated: usize = conn.execute(
        "UPDATE outbound_mail
         SET delivery_state = ?2, error_message = ?3, updated_at = CURRENT_TIMESTAMP
         WHERE mail_id = ?1",
        params![mail_id, state.as_str(), error_message],
    )?;

    if updated == 0 {
        return Err(PersistenceError::MailNotFound(mail_id));
    }

    debug!(mail_id, state = %state, "Recorded mail delivery outcome");

    Ok(())
}
