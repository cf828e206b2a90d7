// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cana_control_domain::{Area, AreaStatus, Inspection};
use serde::Serialize;

/// Wire form of an inspection inside a webhook payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionPayload {
    pub id: String,
    pub date: String,
    pub height_cm: u32,
    pub observations: String,
    pub at_size: bool,
}

impl From<&Inspection> for InspectionPayload {
    fn from(inspection: &Inspection) -> Self {
        Self {
            id: inspection.id.value().to_string(),
            date: inspection.date.clone(),
            height_cm: inspection.height_cm,
            observations: inspection.observations.clone(),
            at_size: inspection.at_size,
        }
    }
}

/// Wire form of an area inside a webhook payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaPayload {
    pub id: String,
    pub sector_lote: String,
    pub plots: String,
    pub planting_date: String,
    pub next_inspection_date: Option<String>,
    pub status: AreaStatus,
    pub inspections: Vec<InspectionPayload>,
}

impl From<&Area> for AreaPayload {
    fn from(area: &Area) -> Self {
        Self {
            id: area.id.value().to_string(),
            sector_lote: area.sector_lote.value().to_string(),
            plots: area.plots.clone(),
            planting_date: area.planting_date.clone(),
            next_inspection_date: area.next_inspection_date.clone(),
            status: area.status,
            inspections: area.inspections.iter().map(InspectionPayload::from).collect(),
        }
    }
}

/// Wire form of a partial area update inside a webhook payload.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaChangesPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector_lote: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plots: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planting_date: Option<String>,
}

/// A notification fired after a successful mutation.
///
/// The serialized form matches the wire format downstream automations
/// already consume: an `event` discriminator plus camelCase fields.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum NotificationEvent {
    /// A new area was registered.
    AreaCreated { area: AreaPayload },
    /// An existing area's descriptive fields changed.
    AreaUpdated {
        area_id: String,
        changes: AreaChangesPayload,
    },
    /// An area was removed.
    AreaDeleted { area_id: String },
    /// An inspection moved the area through its lifecycle.
    StatusUpdated {
        area_id: String,
        new_status: AreaStatus,
    },
}

impl NotificationEvent {
    /// Returns the wire name of this event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AreaCreated { .. } => "area_created",
            Self::AreaUpdated { .. } => "area_updated",
            Self::AreaDeleted { .. } => "area_deleted",
            Self::StatusUpdated { .. } => "status_updated",
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_area_deleted_wire_format() {
        let event: NotificationEvent = NotificationEvent::AreaDeleted {
            area_id: String::from("area-1"),
        };

        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "area_deleted");
        assert_eq!(json["areaId"], "area-1");
    }

    #[test]
    fn test_status_updated_uses_accented_status_names() {
        let event: NotificationEvent = NotificationEvent::StatusUpdated {
            area_id: String::from("area-1"),
            new_status: AreaStatus::Concluida,
        };

        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "status_updated");
        assert_eq!(json["newStatus"], "Concluída");
    }

    #[test]
    fn test_area_updated_omits_unchanged_fields() {
        let event: NotificationEvent = NotificationEvent::AreaUpdated {
            area_id: String::from("area-1"),
            changes: AreaChangesPayload {
                plots: Some(String::from("T05")),
                ..AreaChangesPayload::default()
            },
        };

        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["changes"]["plots"], "T05");
        assert!(json["changes"].get("sectorLote").is_none());
        assert!(json["changes"].get("plantingDate").is_none());
    }

    #[test]
    fn test_area_created_nests_camel_case_area() {
        use cana_control_domain::{AreaId, SectorLote};

        let area: Area = Area {
            id: AreaId::new("area-1"),
            sector_lote: SectorLote::parse("S1/L01").unwrap(),
            plots: String::from("T01, T02"),
            planting_date: String::from("2024-05-10"),
            next_inspection_date: Some(String::from("2024-08-08")),
            status: AreaStatus::Agendada,
            inspections: Vec::new(),
        };
        let event: NotificationEvent = NotificationEvent::AreaCreated {
            area: AreaPayload::from(&area),
        };

        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "area_created");
        assert_eq!(json["area"]["sectorLote"], "S1/L01");
        assert_eq!(json["area"]["plantingDate"], "2024-05-10");
        assert_eq!(json["area"]["nextInspectionDate"], "2024-08-08");
        assert_eq!(json["area"]["status"], "Agendada");
    }
}
