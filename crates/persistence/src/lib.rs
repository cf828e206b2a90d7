// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for CanaControl.
//!
//! This crate stores canonical area state, user profiles, notification
//! settings, the outbound mail queue, and the append-only audit log in
//! `SQLite`. Every mutation writes its audit event and its canonical state
//! change in a single transaction, so the log and the state can never
//! disagree.
//!
//! `SQLite` is the only backend: in-memory databases for unit and
//! integration tests, a file-based database (WAL mode) for deployments.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;

use cana_control::{CreationResult, TransitionResult};
use cana_control_audit::AuditEvent;
use cana_control_domain::{Area, AreaId, Inspection, UserProfile};
use rusqlite::{Connection, Transaction};

mod data_models;
mod error;
mod sqlite;

#[cfg(test)]
mod tests;

pub use data_models::{DeliveryState, OutboundMail};
pub use error::PersistenceError;

/// Persistence adapter for canonical state and the audit log.
///
/// All mutating methods run inside a transaction that also records the
/// caller's audit event.
pub struct Persistence {
    conn: Connection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite`
    /// database.
    ///
    /// Each call receives its own private database, so tests are isolated
    /// by construction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let conn: Connection = Connection::open_in_memory()
            .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

        sqlite::schema::initialize_schema(&conn)?;
        sqlite::schema::verify_foreign_key_enforcement(&conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite`
    /// database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let conn: Connection = Connection::open(path)
            .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

        sqlite::schema::enable_wal_mode(&conn)?;
        sqlite::schema::initialize_schema(&conn)?;
        sqlite::schema::verify_foreign_key_enforcement(&conn)?;

        Ok(Self { conn })
    }

    /// Persists a newly created area together with its audit event.
    ///
    /// # Returns
    ///
    /// The event ID assigned to the audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails; nothing is written on error.
    pub fn create_area(&mut self, result: &CreationResult) -> Result<i64, PersistenceError> {
        let tx: Transaction<'_> = self.conn.transaction()?;
        let event_id: i64 = sqlite::persistence::persist_creation(&tx, result)?;
        tx.commit()?;
        Ok(event_id)
    }

    /// Persists a transition on an existing area together with its audit
    /// event.
    ///
    /// # Returns
    ///
    /// The event ID assigned to the audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails; nothing is written on error.
    pub fn apply_transition(&mut self, result: &TransitionResult) -> Result<i64, PersistenceError> {
        let tx: Transaction<'_> = self.conn.transaction()?;
        let event_id: i64 = sqlite::persistence::persist_transition(&tx, result)?;
        tx.commit()?;
        Ok(event_id)
    }

    /// Retrieves a single area with its full inspection history, newest
    /// inspection first.
    ///
    /// # Errors
    ///
    /// Returns `AreaNotFound` if no such area exists.
    pub fn get_area(&self, area_id: &AreaId) -> Result<Area, PersistenceError> {
        sqlite::queries::get_area(&self.conn, area_id)
    }

    /// Retrieves all areas for the overview.
    ///
    /// Areas with a scheduled inspection come first, soonest first;
    /// completed areas sort last. Each area carries only its most recent
    /// inspection.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_areas(&self) -> Result<Vec<Area>, PersistenceError> {
        sqlite::queries::list_areas(&self.conn)
    }

    /// Retrieves the inspection history for an area, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_inspections(&self, area_id: &AreaId) -> Result<Vec<Inspection>, PersistenceError> {
        sqlite::queries::get_inspections(&self.conn, area_id)
    }

    /// Creates a user profile together with its audit event.
    ///
    /// # Returns
    ///
    /// The event ID assigned to the audit event.
    ///
    /// # Errors
    ///
    /// Returns `UserExists` if a profile with this uid already exists.
    pub fn create_user(
        &mut self,
        profile: &UserProfile,
        audit_event: &AuditEvent,
    ) -> Result<i64, PersistenceError> {
        let tx: Transaction<'_> = self.conn.transaction()?;
        let event_id: i64 = sqlite::persistence::persist_audit_event(&tx, audit_event)?;
        sqlite::users::insert_user(&tx, profile)?;
        tx.commit()?;
        Ok(event_id)
    }

    /// Retrieves the user profile for a uid.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if no profile exists for this uid.
    pub fn get_user(&self, uid: &str) -> Result<UserProfile, PersistenceError> {
        sqlite::users::get_user(&self.conn, uid)
    }

    /// Retrieves all user profiles, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_users(&self) -> Result<Vec<UserProfile>, PersistenceError> {
        sqlite::users::list_users(&self.conn)
    }

    /// Adds a notification recipient together with its audit event.
    ///
    /// # Returns
    ///
    /// The event ID assigned to the audit event.
    ///
    /// # Errors
    ///
    /// Returns `RecipientExists` if the address is already on the list.
    pub fn add_recipient(
        &mut self,
        email: &str,
        audit_event: &AuditEvent,
    ) -> Result<i64, PersistenceError> {
        let tx: Transaction<'_> = self.conn.transaction()?;
        let event_id: i64 = sqlite::persistence::persist_audit_event(&tx, audit_event)?;
        sqlite::users::add_recipient(&tx, email)?;
        tx.commit()?;
        Ok(event_id)
    }

    /// Removes a notification recipient together with its audit event.
    ///
    /// # Returns
    ///
    /// The event ID assigned to the audit event.
    ///
    /// # Errors
    ///
    /// Returns `RecipientNotFound` if the address is not on the list.
    pub fn remove_recipient(
        &mut self,
        email: &str,
        audit_event: &AuditEvent,
    ) -> Result<i64, PersistenceError> {
        let tx: Transaction<'_> = self.conn.transaction()?;
        let event_id: i64 = sqlite::persistence::persist_audit_event(&tx, audit_event)?;
        sqlite::users::remove_recipient(&tx, email)?;
        tx.commit()?;
        Ok(event_id)
    }

    /// Retrieves the notification recipient list, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_recipients(&self) -> Result<Vec<String>, PersistenceError> {
        sqlite::users::list_recipients(&self.conn)
    }

    /// Enqueues a notification email for delivery.
    ///
    /// # Returns
    ///
    /// The mail ID assigned by the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn enqueue_mail(&self, mail: &OutboundMail) -> Result<i64, PersistenceError> {
        sqlite::mail::enqueue_mail(&self.conn, mail)
    }

    /// Retrieves all emails still waiting for delivery, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_queued_mail(&self) -> Result<Vec<OutboundMail>, PersistenceError> {
        sqlite::mail::list_queued_mail(&self.conn)
    }

    /// Records the delivery outcome for a queued email.
    ///
    /// # Errors
    ///
    /// Returns `MailNotFound` if no mail document exists with this ID.
    pub fn mark_mail_delivery(
        &self,
        mail_id: i64,
        state: DeliveryState,
        error_message: Option<&str>,
    ) -> Result<(), PersistenceError> {
        sqlite::mail::mark_mail_delivery(&self.conn, mail_id, state, error_message)
    }

    /// Retrieves an audit event by ID.
    ///
    /// # Errors
    ///
    /// Returns `EventNotFound` if no event exists with this ID.
    pub fn get_audit_event(&self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        sqlite::queries::get_audit_event(&self.conn, event_id)
    }

    /// Retrieves the audit timeline, newest event first.
    ///
    /// # Arguments
    ///
    /// * `area_id` - Restrict the timeline to one area, or `None` for all
    /// * `limit` - Maximum number of events to return
    ///
    /// # Errors
    ///
    /// Returns an error if events cannot be retrieved or deserialized.
    pub fn get_audit_timeline(
        &self,
        area_id: Option<&AreaId>,
        limit: u32,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        sqlite::queries::get_audit_timeline(&self.conn, area_id, limit)
    }
}
