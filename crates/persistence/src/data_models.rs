// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;

/// Serializable form of an audit actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable form of an audit cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable form of an audit action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable form of a state snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

/// Row tuple for an audit event as stored in the database.
pub type AuditEventRow = (
    i64,
    Option<String>,
    String,
    String,
    String,
    String,
    String,
);

/// Delivery state of a queued notification email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryState {
    /// Waiting for the delivery worker.
    Queued,
    /// Delivered successfully.
    Success,
    /// Delivery failed; see the error message.
    Error,
}

impl DeliveryState {
    /// Converts this state to its storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "QUEUED",
            Self::Success => "SUCCESS",
            Self::Error => "ERROR",
        }
    }

    /// Parses a storage representation back into a state.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a known delivery state.
    pub fn parse(value: &str) -> Result<Self, PersistenceError> {
        match value {
            "QUEUED" => Ok(Self::Queued),
            "SUCCESS" => Ok(Self::Success),
            "ERROR" => Ok(Self::Error),
            other => Err(PersistenceError::ReconstructionError(format!(
                "Unknown delivery state: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for DeliveryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A notification email document queued for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMail {
    /// The row ID assigned by the database. `None` until enqueued.
    pub mail_id: Option<i64>,
    /// The recipient email address.
    pub recipient: String,
    /// The email subject line.
    pub subject: String,
    /// The HTML body.
    pub html_body: String,
    /// The current delivery state.
    pub delivery_state: DeliveryState,
    /// The delivery error message, if delivery failed.
    pub error_message: Option<String>,
}

impl OutboundMail {
    /// Creates a new mail document in the queued state.
    #[must_use]
    pub const fn new(recipient: String, subject: String, html_body: String) -> Self {
        Self {
            mail_id: None,
            recipient,
            subject,
            html_body,
            delivery_state: DeliveryState::Queued,
            error_message: None,
        }
    }
}
