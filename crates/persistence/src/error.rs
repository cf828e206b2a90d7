// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cana_control_domain::DomainError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// The requested audit event was not found.
    EventNotFound(i64),
    /// The requested area was not found.
    AreaNotFound(String),
    /// The requested user was not found.
    UserNotFound(String),
    /// A user with this uid already exists.
    UserExists(String),
    /// The recipient email is already on the notification list.
    RecipientExists(String),
    /// The recipient email is not on the notification list.
    RecipientNotFound(String),
    /// The requested mail document was not found.
    MailNotFound(i64),
    /// Stored data failed to reconstruct into domain types.
    ReconstructionError(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::EventNotFound(id) => write!(f, "Event not found: {id}"),
            Self::AreaNotFound(id) => write!(f, "Area not found: {id}"),
            Self::UserNotFound(uid) => write!(f, "User not found: {uid}"),
            Self::UserExists(uid) => write!(f, "User already exists: {uid}"),
            Self::RecipientExists(email) => {
                write!(f, "Recipient already on the notification list: {email}")
            }
            Self::RecipientNotFound(email) => {
                write!(f, "Recipient not on the notification list: {email}")
            }
            Self::MailNotFound(id) => write!(f, "Mail document not found: {id}"),
            Self::ReconstructionError(msg) => {
                write!(f, "State reconstruction error: {msg}")
            }
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<rusqlite::Error> for PersistenceError {
    fn from(err: rusqlite::Error) -> Self {
        Self::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::ReconstructionError(err.to_string())
    }
}
