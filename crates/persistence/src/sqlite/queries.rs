// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use cana_control_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use cana_control_domain::{Area, AreaId, AreaStatus, Inspection, InspectionId, SectorLote};
use rusqlite::{Connection, Result as SqliteResult, params};

use crate::data_models::{ActionData, ActorData, AuditEventRow, CauseData, StateSnapshotData};
use crate::error::PersistenceError;

/// Retrieves a single area with its inspections, newest first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `area_id` - The area to retrieve
///
/// # Errors
///
/// Returns an error if the area is not found or stored data fails to
/// reconstruct into domain types.
pub fn get_area(conn: &Connection, area_id: &AreaId) -> Result<Area, PersistenceError> {
    let row_result: SqliteResult<(String, String, String, String, Option<String>, String)> = conn
        .query_row(
            "SELECT area_id, sector_lote, plots, planting_date,
                    next_inspection_date, status
             FROM areas
             WHERE area_id = ?1",
            params![area_id.value()],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            },
        );

    match row_result {
        Ok(row) => {
            let inspections: Vec<Inspection> = get_inspections(conn, area_id)?;
            reconstruct_area(row, inspections)
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            Err(PersistenceError::AreaNotFound(area_id.value().to_string()))
        }
        Err(e) => Err(PersistenceError::DatabaseError(e.to_string())),
    }
}

/// Retrieves all areas ordered by next inspection date.
///
/// Areas with a scheduled date come first, soonest first; completed areas
/// (no scheduled date) sort last. Each area carries only its most recent
/// inspection, which is what the overview needs.
///
/// # Errors
///
/// Returns an error if the query fails or stored data fails to reconstruct.
pub fn list_areas(conn: &Connection) -> Result<Vec<Area>, PersistenceError> {
    let mut stmt = conn.prepare(
        "SELECT area_id, sector_lote, plots, planting_date,
                next_inspection_date, status
         FROM areas
         ORDER BY next_inspection_date IS NULL, next_inspection_date ASC, area_id ASC",
    )?;

    let rows: Vec<(String, String, String, String, Option<String>, String)> = stmt
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

    let mut areas: Vec<Area> = Vec::with_capacity(rows.len());
    for row in rows {
        let area_id: AreaId = AreaId::new(&row.0);
        let inspections: Vec<Inspection> = get_latest_inspection(conn, &area_id)?;
        areas.push(reconstruct_area(row, inspections)?);
    }

    Ok(areas)
}

/// Retrieves all inspections for an area, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_inspections(
    conn: &Connection,
    area_id: &AreaId,
) -> Result<Vec<Inspection>, PersistenceError> {
    let mut stmt = conn.prepare(
        "SELECT inspection_id, date, height_cm, observations, at_size
         FROM inspections
         WHERE area_id = ?1
         ORDER BY date DESC, rowid DESC",
    )?;

    let inspections: Vec<Inspection> = stmt
        .query_map(params![area_id.value()], map_inspection_row)?
        .collect::<SqliteResult<Vec<_>>>()?;

    Ok(inspections)
}

fn get_latest_inspection(
    conn: &Connection,
    area_id: &AreaId,
) -> Result<Vec<Inspection>, PersistenceError> {
    let mut stmt = conn.prepare(
        "SELECT inspection_id, date, height_cm, observations, at_size
         FROM inspections
         WHERE area_id = ?1
         ORDER BY date DESC, rowid DESC
         LIMIT 1",
    )?;

    let inspections: Vec<Inspection> = stmt
        .query_map(params![area_id.value()], map_inspection_row)?
        .collect::<SqliteResult<Vec<_>>>()?;

    Ok(inspections)
}

fn map_inspection_row(row: &rusqlite::Row<'_>) -> SqliteResult<Inspection> {
    Ok(Inspection {
        id: InspectionId::new(&row.get::<_, String>(0)?),
        date: row.get(1)?,
        height_cm: row.get(2)?,
        observations: row.get(3)?,
        at_size: row.get::<_, i64>(4)? != 0,
    })
}

fn reconstruct_area(
    row: (String, String, String, String, Option<String>, String),
    inspections: Vec<Inspection>,
) -> Result<Area, PersistenceError> {
    let (area_id, sector_lote, plots, planting_date, next_inspection_date, status) = row;

    Ok(Area {
        id: AreaId::new(&area_id),
        sector_lote: SectorLote::parse(&sector_lote)?,
        plots,
        planting_date,
        next_inspection_date,
        status: AreaStatus::from_str(&status)?,
        inspections,
    })
}

/// Retrieves an audit event by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `event_id` - The event ID to retrieve
///
/// # Errors
///
/// Returns an error if the event is not found or cannot be deserialized.
pub fn get_audit_event(conn: &Connection, event_id: i64) -> Result<AuditEvent, PersistenceError> {
    let row_result: SqliteResult<AuditEventRow> = conn.query_row(
        "SELECT event_id, area_id, actor_json, cause_json, action_json,
                before_snapshot_json, after_snapshot_json
         FROM audit_events
         WHERE event_id = ?1",
        params![event_id],
        |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
            ))
        },
    );

    match row_result {
        Ok(row) => reconstruct_audit_event(row),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(PersistenceError::EventNotFound(event_id)),
        Err(e) => Err(PersistenceError::DatabaseError(e.to_string())),
    }
}

/// Retrieves the audit timeline, newest event first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `area_id` - Restrict the timeline to one area, or `None` for all events
/// * `limit` - Maximum number of events to return
///
/// # Errors
///
/// Returns an error if events cannot be retrieved or deserialized.
pub fn get_audit_timeline(
    conn: &Connection,
    area_id: Option<&AreaId>,
    limit: u32,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let mut stmt = conn.prepare(
        "SELECT event_id, area_id, actor_json, cause_json, action_json,
                before_snapshot_json, after_snapshot_json
         FROM audit_events
         WHERE (?1 IS NULL OR area_id = ?1)
         ORDER BY event_id DESC
         LIMIT ?2",
    )?;

    let rows: Vec<AuditEventRow> = stmt
        .query_map(params![area_id.map(AreaId::value), limit], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
            ))
        })?
        .collect::<SqliteResult<Vec<_>>>()?;

    rows.into_iter().map(reconstruct_audit_event).collect()
}

fn reconstruct_audit_event(row: AuditEventRow) -> Result<AuditEvent, PersistenceError> {
    let (event_id, area_id, actor_json, cause_json, action_json, before_json, after_json) = row;

    let actor_data: ActorData = serde_json::from_str(&actor_json)?;
    let cause_data: CauseData = serde_json::from_str(&cause_json)?;
    let action_data: ActionData = serde_json::from_str(&action_json)?;
    let before_data: StateSnapshotData = serde_json::from_str(&before_json)?;
    let after_data: StateSnapshotData = serde_json::from_str(&after_json)?;

    Ok(AuditEvent::with_id(
        event_id,
        Actor::new(actor_data.id, actor_data.actor_type),
        Cause::new(cause_data.id, cause_data.description),
        Action::new(action_data.name, action_data.details),
        StateSnapshot::new(before_data.data),
        StateSnapshot::new(after_data.data),
        area_id.as_deref().map(AreaId::new),
    ))
}
