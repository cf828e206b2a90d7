// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cana_control_audit::{AuditEvent, StateSnapshot};
use cana_control_domain::Area;

/// Converts an area to a snapshot for audit purposes.
#[must_use]
pub fn area_snapshot(area: &Area) -> StateSnapshot {
    StateSnapshot::new(format!(
        "sector_lote={},status={},next_inspection={},inspections_count={}",
        area.sector_lote.value(),
        area.status,
        area.next_inspection_date.as_deref().unwrap_or("none"),
        area.inspections.len()
    ))
}

/// The result of a successful state transition on an existing area.
///
/// Transitions are atomic: they either succeed completely or fail without
/// side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The area after the transition. `None` when the area was deleted.
    pub new_state: Option<Area>,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

/// The result of creating a new area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationResult {
    /// The newly created area, with its schedule derived from the planting
    /// date.
    pub area: Area,
    /// The audit event recording the creation.
    pub audit_event: AuditEvent,
}
