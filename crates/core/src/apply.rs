// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{AreaChanges, Command, InspectionInput};
use crate::error::CoreError;
use crate::state::{CreationResult, TransitionResult, area_snapshot};
use cana_control_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use cana_control_domain::{
    Area, AreaId, AreaStatus, DomainError, Inspection, InspectionId, SectorLote,
    follow_up_inspection_date, initial_inspection_date, validate_area_fields,
};

/// Creates a new area from its descriptive fields, deriving the schedule.
///
/// The first inspection is scheduled 90 days after planting and the area
/// starts `Agendada` with no inspection history.
///
/// # Errors
///
/// Returns an error if the planting date is invalid or the field
/// constraints are violated.
pub fn create_area(
    sector_lote: SectorLote,
    plots: String,
    planting_date: String,
    actor: Actor,
    cause: Cause,
) -> Result<CreationResult, CoreError> {
    let next_inspection_date: String = initial_inspection_date(&planting_date)?;

    let area: Area = Area {
        id: AreaId::generate(),
        sector_lote,
        plots,
        planting_date,
        next_inspection_date: Some(next_inspection_date),
        status: AreaStatus::Agendada,
        inspections: Vec::new(),
    };

    validate_area_fields(&area)?;

    let before: StateSnapshot = StateSnapshot::new(String::from("absent"));
    let after: StateSnapshot = area_snapshot(&area);

    let action: Action = Action::new(
        String::from("CreateArea"),
        Some(format!(
            "Created area '{}' planted {}, first inspection {}",
            area.sector_lote,
            area.planting_date,
            area.next_inspection_date.as_deref().unwrap_or("none")
        )),
    );
    let audit_event: AuditEvent =
        AuditEvent::new(actor, cause, action, before, after, Some(area.id.clone()));

    Ok(CreationResult { area, audit_event })
}

/// Applies a command to an existing area, producing a new state and audit
/// event.
///
/// # Errors
///
/// Returns an error if the command violates a domain rule: invalid field
/// values, an invalid inspection date, or an inspection against a completed
/// area.
pub fn apply(
    area: &Area,
    command: Command,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::UpdateArea { changes } => apply_update(area, changes, actor, cause),
        Command::DeleteArea => {
            let before: StateSnapshot = area_snapshot(area);
            let after: StateSnapshot = StateSnapshot::new(String::from("absent"));

            let action: Action = Action::new(
                String::from("DeleteArea"),
                Some(format!("Deleted area '{}'", area.sector_lote)),
            );
            let audit_event: AuditEvent =
                AuditEvent::new(actor, cause, action, before, after, Some(area.id.clone()));

            Ok(TransitionResult {
                new_state: None,
                audit_event,
            })
        }
        Command::RecordInspection { inspection } => {
            apply_inspection(area, inspection, actor, cause)
        }
    }
}

fn apply_update(
    area: &Area,
    changes: AreaChanges,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let before: StateSnapshot = area_snapshot(area);

    let mut new_area: Area = area.clone();
    if let Some(sector_lote) = changes.sector_lote {
        new_area.sector_lote = sector_lote;
    }
    if let Some(plots) = changes.plots {
        new_area.plots = plots;
    }
    if let Some(planting_date) = changes.planting_date {
        new_area.planting_date = planting_date;
    }

    validate_area_fields(&new_area)?;

    let after: StateSnapshot = area_snapshot(&new_area);

    let action: Action = Action::new(
        String::from("UpdateArea"),
        Some(format!("Updated area '{}'", new_area.sector_lote)),
    );
    let audit_event: AuditEvent =
        AuditEvent::new(actor, cause, action, before, after, Some(area.id.clone()));

    Ok(TransitionResult {
        new_state: Some(new_area),
        audit_event,
    })
}

fn apply_inspection(
    area: &Area,
    inspection: InspectionInput,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    // Concluida is terminal.
    if !area.status.accepts_inspections() {
        return Err(CoreError::DomainViolation(DomainError::AreaCompleted {
            area_id: area.id.value().to_string(),
        }));
    }

    let new_status: AreaStatus = AreaStatus::after_inspection(inspection.at_size);
    let next_inspection_date: Option<String> = match new_status {
        AreaStatus::Concluida => None,
        _ => Some(follow_up_inspection_date(&inspection.date)?),
    };

    let record: Inspection = Inspection {
        id: InspectionId::generate(),
        date: inspection.date,
        height_cm: inspection.height_cm,
        observations: inspection.observations,
        at_size: inspection.at_size,
    };

    let before: StateSnapshot = area_snapshot(area);

    let mut new_area: Area = area.clone();
    new_area.status = new_status;
    new_area.next_inspection_date = next_inspection_date;
    // Newest first.
    new_area.inspections.insert(0, record.clone());

    let after: StateSnapshot = area_snapshot(&new_area);

    let action: Action = Action::new(
        String::from("RecordInspection"),
        Some(format!(
            "Recorded {}cm on {} for area '{}': status {}",
            record.height_cm, record.date, new_area.sector_lote, new_area.status
        )),
    );
    let audit_event: AuditEvent =
        AuditEvent::new(actor, cause, action, before, after, Some(area.id.clone()));

    Ok(TransitionResult {
        new_state: Some(new_area),
        audit_event,
    })
}
