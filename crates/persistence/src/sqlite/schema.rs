// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rusqlite::Connection;
use tracing::info;

use crate::error::PersistenceError;

/// Initializes the database schema.
///
/// # Arguments
///
/// * `conn` - The database connection to initialize
///
/// # Errors
///
/// Returns an error if schema creation fails.
pub fn initialize_schema(conn: &Connection) -> Result<(), PersistenceError> {
    info!("Initializing database schema");

    // Enable foreign key enforcement
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute_batch(
        "
        -- User profiles (role source of truth)
        CREATE TABLE IF NOT EXISTS users (
            uid TEXT PRIMARY KEY NOT NULL,
            email TEXT NOT NULL COLLATE NOCASE,
            name TEXT NOT NULL,
            role TEXT NOT NULL CHECK(role IN ('admin', 'technician')),
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        -- Canonical area state
        CREATE TABLE IF NOT EXISTS areas (
            area_id TEXT PRIMARY KEY NOT NULL,
            sector_lote TEXT NOT NULL,
            plots TEXT NOT NULL,
            planting_date TEXT NOT NULL,
            next_inspection_date TEXT,
            status TEXT NOT NULL CHECK(status IN ('Agendada', 'Pendente', 'Concluída')),
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_areas_next_inspection
            ON areas(next_inspection_date);

        CREATE TABLE IF NOT EXISTS inspections (
            inspection_id TEXT PRIMARY KEY NOT NULL,
            area_id TEXT NOT NULL,
            date TEXT NOT NULL,
            height_cm INTEGER NOT NULL CHECK(height_cm >= 0),
            observations TEXT NOT NULL,
            at_size INTEGER NOT NULL CHECK(at_size IN (0, 1)),
            FOREIGN KEY(area_id) REFERENCES areas(area_id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_inspections_by_area
            ON inspections(area_id, date DESC);

        -- Notification settings
        CREATE TABLE IF NOT EXISTS recipient_emails (
            email TEXT PRIMARY KEY NOT NULL COLLATE NOCASE,
            added_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        -- Notification email queue
        CREATE TABLE IF NOT EXISTS outbound_mail (
            mail_id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipient TEXT NOT NULL,
            subject TEXT NOT NULL,
            html_body TEXT NOT NULL,
            delivery_state TEXT NOT NULL DEFAULT 'QUEUED'
                CHECK(delivery_state IN ('QUEUED', 'SUCCESS', 'ERROR')),
            error_message TEXT,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_outbound_mail_state
            ON outbound_mail(delivery_state);

        -- Audit log
        CREATE TABLE IF NOT EXISTS audit_events (
            event_id INTEGER PRIMARY KEY AUTOINCREMENT,
            area_id TEXT,
            actor_json TEXT NOT NULL,
            cause_json TEXT NOT NULL,
            action_json TEXT NOT NULL,
            before_snapshot_json TEXT NOT NULL,
            after_snapshot_json TEXT NOT NULL,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_audit_events_area
            ON audit_events(area_id, event_id);
        ",
    )?;

    Ok(())
}

/// Verifies that foreign key enforcement is active on the connection.
///
/// # Errors
///
/// Returns an error if the pragma cannot be read or enforcement is off.
pub fn verify_foreign_key_enforcement(conn: &Connection) -> Result<(), PersistenceError> {
    let enabled: i64 = conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?;

    if enabled == 1 {
        Ok(())
    } else {
        Err(PersistenceError::ForeignKeyEnforcementNotEnabled)
    }
}

/// Enables WAL journal mode for better read concurrency on file databases.
///
/// # Errors
///
/// Returns an error if the pragma cannot be applied.
pub fn enable_wal_mode(conn: &Connection) -> Result<(), PersistenceError> {
    let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    info!(journal_mode = %mode, "Configured journal mode");
    Ok(())
}
