// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cana_control::{CreationResult, TransitionResult};
use cana_control_audit::AuditEvent;
use cana_control_domain::{Area, Inspection};
use rusqlite::{Transaction, params};
use tracing::{debug, info};

use crate::data_models::{ActionData, ActorData, CauseData, StateSnapshotData};
use crate::error::PersistenceError;

/// Persists an area creation (canonical row plus audit event).
///
/// # Arguments
///
/// * `tx` - The active database transaction
/// * `result` - The creation result to persist
///
/// # Returns
///
/// The event ID assigned to the persisted audit event.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn persist_creation(
    tx: &Transaction<'_>,
    result: &CreationResult,
) -> Result<i64, PersistenceError> {
    let event_id: i64 = persist_audit_event(tx, &result.audit_event)?;
    debug!(event_id, "Persisted creation audit event");

    insert_area_tx(tx, &result.area)?;
    debug!(
        area_id = %result.area.id,
        sector_lote = %result.area.sector_lote,
        "Inserted area into canonical table"
    );

    info!(event_id, "Persisted area creation");

    Ok(event_id)
}

/// Persists a transition result for an existing area.
///
/// Canonical state is updated based on the action type: `UpdateArea` and
/// `RecordInspection` rewrite the area row, `DeleteArea` removes it (and its
/// inspections via cascade). `RecordInspection` additionally inserts the
/// newest inspection row.
///
/// # Arguments
///
/// * `tx` - The active database transaction
/// * `result` - The transition result to persist
///
/// # Returns
///
/// The event ID assigned to the persisted audit event.
///
/// # Errors
///
/// Returns an error if persistence fails or the transition shape does not
/// match its action (e.g. a deletion carrying a new state).
pub fn persist_transition(
    tx: &Transaction<'_>,
    result: &TransitionResult,
) -> Result<i64, PersistenceError> {
    let event_id: i64 = persist_audit_event(tx, &result.audit_event)?;
    debug!(event_id, "Persisted audit event");

    match result.audit_event.action.name.as_str() {
        "DeleteArea" => {
            let area_id: &str = result
                .audit_event
                .area_id
                .as_ref()
                .map(cana_control_domain::AreaId::value)
                .ok_or_else(|| {
                    PersistenceError::ReconstructionError(
                        "DeleteArea event has no area scope".to_string(),
                    )
                })?;

            let deleted: usize =
                tx.execute("DELETE FROM areas WHERE area_id = ?1", params![area_id])?;
            if deleted == 0 {
                return Err(PersistenceError::AreaNotFound(area_id.to_string()));
            }
            debug!(area_id, "Deleted area from canonical table");
        }
        "RecordInspection" => {
            let area: &Area = require_new_state(result)?;
            update_area_tx(tx, area)?;

            // The state machine prepends the new inspection.
            let inspection: &Inspection = area.inspections.first().ok_or_else(|| {
                PersistenceError::ReconstructionError(
                    "RecordInspection produced no inspections".to_string(),
                )
            })?;
            insert_inspection_tx(tx, &area.id, inspection)?;
            debug!(
                area_id = %area.id,
                inspection_id = %inspection.id,
                "Inserted inspection"
            );
        }
        _ => {
            let area: &Area = require_new_state(result)?;
            update_area_tx(tx, area)?;
            debug!(area_id = %area.id, "Synced canonical area row");
        }
    }

    info!(event_id, action = %result.audit_event.action.name, "Persisted transition");

    Ok(event_id)
}

/// Persists an audit event within a transaction.
///
/// # Arguments
///
/// * `tx` - The active database transaction
/// * `event` - The audit event to persist
///
/// # Returns
///
/// The event ID assigned by the database.
///
/// # Errors
///
/// Returns an error if persistence or serialization fails.
pub fn persist_audit_event(
    tx: &Transaction<'_>,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    let actor_data: ActorData = ActorData {
        id: event.actor.id.clone(),
        actor_type: event.actor.actor_type.clone(),
    };

    let cause_data: CauseData = CauseData {
        id: event.cause.id.clone(),
        description: event.cause.description.clone(),
    };

    let action_data: ActionData = ActionData {
        name: event.action.name.clone(),
        details: event.action.details.clone(),
    };

    let before_data: StateSnapshotData = StateSnapshotData {
        data: event.before.data.clone(),
    };

    let after_data: StateSnapshotData = StateSnapshotData {
        data: event.after.data.clone(),
    };

    tx.execute(
        "INSERT INTO audit_events (
            area_id, actor_json, cause_json, action_json,
            before_snapshot_json, after_snapshot_json
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            event
                .area_id
                .as_ref()
                .map(cana_control_domain::AreaId::value),
            serde_json::to_string(&actor_data)?,
            serde_json::to_string(&cause_data)?,
            serde_json::to_string(&action_data)?,
            serde_json::to_string(&before_data)?,
            serde_json::to_string(&after_data)?,
        ],
    )?;

    Ok(tx.last_insert_rowid())
}

fn require_new_state(result: &TransitionResult) -> Result<&Area, PersistenceError> {
    result.new_state.as_ref().ok_or_else(|| {
        PersistenceError::ReconstructionError(format!(
            "{} transition has no new state",
            result.audit_event.action.name
        ))
    })
}

fn insert_area_tx(tx: &Transaction<'_>, area: &Area) -> Result<(), PersistenceError> {
    tx.execute(
        "INSERT INTO areas (
            area_id, sector_lote, plots, planting_date,
            next_inspection_date, status
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            area.id.value(),
            area.sector_lote.value(),
            area.plots,
            area.planting_date,
            area.next_inspection_date,
            area.status.as_str(),
        ],
    )?;

    Ok(())
}

fn update_area_tx(tx: &Transaction<'_>, area: &Area) -> Result<(), PersistenceError> {
    let updated: usize = tx.execute(
        "UPDATE areas SET
            sector_lote = ?2,
            plots = ?3,
            planting_date = ?4,
            next_inspection_date = ?5,
            status = ?6
         WHERE area_id = ?1",
        params![
            area.id.value(),
            area.sector_lote.value(),
            area.plots,
            area.planting_date,
            area.next_inspection_date,
            area.status.as_str(),
        ],
    )?;

    if updated == 0 {
        return Err(PersistenceError::AreaNotFound(area.id.value().to_string()));
    }

    Ok(())
}

fn insert_inspection_tx(
    tx: &Transaction<'_>,
    area_id: &cana_control_domain::AreaId,
    inspection: &Inspection,
) -> Result<(), PersistenceError> {
    tx.execute(
        "INSERT INTO inspections (
            inspection_id, area_id, date, height_cm, observations, at_size
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            inspection.id.value(),
            area_id.value(),
            inspection.date,
            inspection.height_cm,
            inspection.observations,
            i32::from(inspection.at_size),
        ],
    )?;

    Ok(())
}
