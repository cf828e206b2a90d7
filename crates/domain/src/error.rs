// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Sector/lote label is empty or malformed.
    InvalidSectorLote(String),
    /// Plot list is empty or invalid.
    InvalidPlots(String),
    /// Email address is empty or malformed.
    InvalidEmail(String),
    /// User name is empty or invalid.
    InvalidName(String),
    /// Role string is not a recognized role.
    InvalidRole(String),
    /// Area status string is not a recognized status.
    InvalidStatus(String),
    /// Failed to parse a date from a string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// The requested area was not found.
    AreaNotFound {
        /// The area identifier.
        area_id: String,
    },
    /// The area is already complete; no further inspections are accepted.
    AreaCompleted {
        /// The area identifier.
        area_id: String,
    },
    /// A user with this uid already exists.
    DuplicateUser {
        /// The user's uid.
        uid: String,
    },
    /// The requested user was not found.
    UserNotFound {
        /// The user's uid.
        uid: String,
    },
    /// The recipient email is already on the notification list.
    DuplicateRecipient {
        /// The duplicate email.
        email: String,
    },
    /// The recipient email was not found on the notification list.
    RecipientNotFound {
        /// The missing email.
        email: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSectorLote(msg) => write!(f, "Invalid sector/lote: {msg}"),
            Self::InvalidPlots(msg) => write!(f, "Invalid plots: {msg}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidRole(msg) => write!(f, "Invalid role: {msg}"),
            Self::InvalidStatus(msg) => write!(f, "Invalid area status: {msg}"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::AreaNotFound { area_id } => write!(f, "Area '{area_id}' not found"),
            Self::AreaCompleted { area_id } => {
                write!(
                    f,
                    "Area '{area_id}' is already complete; no further inspections are accepted"
                )
            }
            Self::DuplicateUser { uid } => {
                write!(f, "User with uid '{uid}' already exists")
            }
            Self::UserNotFound { uid } => write!(f, "User with uid '{uid}' not found"),
            Self::DuplicateRecipient { email } => {
                write!(f, "Recipient '{email}' is already on the notification list")
            }
            Self::RecipientNotFound { email } => {
                write!(f, "Recipient '{email}' is not on the notification list")
            }
        }
    }
}

impl std::error::Error for DomainError {}
