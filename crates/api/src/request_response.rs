// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use cana_control_domain::{Area, AreaStatus, Inspection};

/// API request to register a new growth area.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct CreateAreaRequest {
    /// The "SECTOR/LOTE" label.
    pub sector_lote: String,
    /// Free-form plot list, e.g. "T01, T02".
    pub plots: String,
    /// The planting date (ISO 8601 date string).
    pub planting_date: String,
}

/// API response for a successful area creation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateAreaResponse {
    /// The assigned area identifier.
    pub area_id: String,
    /// The sector/lote label.
    pub sector_lote: String,
    /// The derived first inspection date.
    pub next_inspection_date: String,
    /// A success message.
    pub message: String,
}

/// API request to update an existing area's descriptive fields.
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct UpdateAreaRequest {
    /// A replacement "SECTOR/LOTE" label.
    pub sector_lote: Option<String>,
    /// A replacement plot list.
    pub plots: Option<String>,
    /// A replacement planting date (ISO 8601 date string).
    pub planting_date: Option<String>,
}

/// API response for a successful area update.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateAreaResponse {
    /// The area identifier.
    pub area_id: String,
    /// A success message.
    pub message: String,
}

/// API response for a successful area deletion.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeleteAreaResponse {
    /// The removed area's identifier.
    pub area_id: String,
    /// A success message.
    pub message: String,
}

/// API request to record an inspection against an area.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct RecordInspectionRequest {
    /// The inspection date (ISO 8601 date string).
    pub date: String,
    /// Measured crop height in centimeters.
    pub height_cm: u32,
    /// Free-form technician observations.
    pub observations: String,
    /// Whether the crop reached target height.
    pub at_size: bool,
}

/// API response for a successfully recorded inspection.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecordInspectionResponse {
    /// The area identifier.
    pub area_id: String,
    /// The area's status after the inspection.
    pub new_status: AreaStatus,
    /// The next scheduled inspection date, absent once the area completes.
    pub next_inspection_date: Option<String>,
    /// A success message.
    pub message: String,
}

/// API request to create a user profile.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct CreateUserRequest {
    /// The identity provider uid for the new user.
    pub uid: String,
    /// The user's email address.
    pub email: String,
    /// The user's display name.
    pub name: String,
    /// The role, "admin" or "technician".
    pub role: String,
}

/// API response for a successful user creation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateUserResponse {
    /// The new user's uid.
    pub uid: String,
    /// The assigned role.
    pub role: String,
    /// A success message.
    pub message: String,
}

/// API response for a recipient-list mutation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecipientResponse {
    /// The affected email address.
    pub email: String,
    /// A success message.
    pub message: String,
}

/// Wire form of an inspection in read responses.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InspectionInfo {
    /// The inspection identifier.
    pub id: String,
    /// The inspection date.
    pub date: String,
    /// Measured crop height in centimeters.
    pub height_cm: u32,
    /// Technician observations.
    pub observations: String,
    /// Whether the crop reached target height.
    pub at_size: bool,
}

impl From<&Inspection> for InspectionInfo {
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

/// Wire form of an area in read responses.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AreaInfo {
    /// The area identifier.
    pub id: String,
    /// The sector/lote label.
    pub sector_lote: String,
    /// The plot list.
    pub plots: String,
    /// The planting date.
    pub planting_date: String,
    /// The next scheduled inspection date, if any.
    pub next_inspection_date: Option<String>,
    /// The lifecycle status.
    pub status: AreaStatus,
    /// Inspections, newest first.
    pub inspections: Vec<InspectionInfo>,
}

impl From<&Area> for AreaInfo {
    fn from(area: &Area) -> Self {
        Self {
            id: area.id.value().to_string(),
            sector_lote: area.sector_lote.value().to_string(),
            plots: area.plots.clone(),
            planting_date: area.planting_date.clone(),
            next_inspection_date: area.next_inspection_date.clone(),
            status: area.status,
            inspections: area.inspections.iter().map(InspectionInfo::from).collect(),
        }
    }
}
