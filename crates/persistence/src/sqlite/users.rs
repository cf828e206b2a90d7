// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use cana_control_domain::{UserProfile, UserRole};
use rusqlite::{Connection, Result as SqliteResult, Transaction, params};
use tracing::debug;

use crate::error::PersistenceError;

/// Inserts a new user profile.
///
/// # Arguments
///
/// * `tx` - The active database transaction
/// * `profile` - The profile to insert
///
/// # Errors
///
/// Returns `UserExists` if a profile with this uid already exists.
pub fn insert_user(tx: &Transaction<'_>, profile: &UserProfile) -> Result<(), PersistenceError> {
    let exists: bool = tx
        .query_row(
            "SELECT 1 FROM users WHERE uid = ?1",
            params![profile.uid],
            |_| Ok(()),
        )
        .map(|()| true)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(false),
            other => Err(PersistenceError::DatabaseError(other.to_string())),
        })?;

    if exists {
        return Err(PersistenceError::UserExists(profile.uid.clone()));
    }

    tx.execute(
        "INSERT INTO users (uid, email, name, role) VALUES (?1, ?2, ?3, ?4)",
        params![
            profile.uid,
            profile.email,
            profile.name,
            profile.role.as_str()
        ],
    )?;

    debug!(uid = %profile.uid, role = %profile.role, "Inserted user profile");

    Ok(())
}

/// Retrieves a user profile by uid.
///
/// # Errors
///
/// Returns `UserNotFound` if no profile exists for this uid.
pub fn get_user(conn: &Connection, uid: &str) -> Result<UserProfile, PersistenceError> {
    let row_result: SqliteResult<(String, String, String, String)> = conn.query_row(
        "SELECT uid, email, name, role FROM users WHERE uid = ?1",
        params![uid],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
    );

    match row_result {
        Ok((uid, email, name, role)) => Ok(UserProfile {
            uid,
            email,
            name,
            role: UserRole::from_str(&role)?,
        }),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            Err(PersistenceError::UserNotFound(uid.to_string()))
        }
        Err(e) => Err(PersistenceError::DatabaseError(e.to_string())),
    }
}

/// Retrieves all user profiles, ordered by name.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_users(conn: &Connection) -> Result<Vec<UserProfile>, PersistenceError> {
    let mut stmt = conn.prepare("SELECT uid, email, name, role FROM users ORDER BY name ASC")?;

    let rows: Vec<(String, String, String, String)> = stmt
        .query_map([], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })?
        .collect::<SqliteResult<Vec<_>>>()?;

    rows.into_iter()
        .map(|(uid, email, name, role)| {
            Ok(UserProfile {
                uid,
                email,
                name,
                role: UserRole::from_str(&role)?,
            })
        })
        .collect()
}

/// Adds an email address to the notification recipient list.
///
/// # Errors
///
/// Returns `RecipientExists` if the address is already on the list.
pub fn add_recipient(tx: &Transaction<'_>, email: &str) -> Result<(), PersistenceError> {
    let inserted: usize = tx.execute(
        "INSERT OR IGNORE INTO recipient_emails (email) VALUES (?1)",
        params![email],
    )?;

    if inserted == 0 {
        return Err(PersistenceError::RecipientExists(email.to_string()));
    }

    debug!(email, "Added notification recipient");

    Ok(())
}

/// Removes an email address from the notification recipient list.
///
/// # Errors
///
/// Returns `RecipientNotFound` if the address is not on the list.
pub fn remove_recipient(tx: &Transaction<'_>, email: &str) -> Result<(), PersistenceError> {
    let removed: usize = tx.execute(
        "DELETE FROM recipient_emails WHERE email = ?1",
        params![email],
    )?;

    if removed == 0 {
        return Err(PersistenceError::RecipientNotFound(email.to_string()));
    }

    debug!(email, "Removed notification recipient");

    Ok(())
}

/// Retrieves all notification recipient addresses, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_recipients(conn: &Connection) -> Result<Vec<String>, PersistenceError> {
    let mut stmt =
        conn.prepare("SELECT email FROM recipient_emails ORDER BY added_at ASC, email ASC")?;

    let emails: Vec<String> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<SqliteResult<Vec<_>>>()?;

    Ok(emails)
}
