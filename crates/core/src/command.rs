// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cana_control_domain::SectorLote;

/// The measured data of a single field visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectionInput {
    /// The inspection date (ISO 8601 date string).
    pub date: String,
    /// Measured crop height in centimeters.
    pub height_cm: u32,
    /// Free-form technician observations.
    pub observations: String,
    /// Whether the crop reached target height.
    pub at_size: bool,
}

/// A partial update to an area's descriptive fields.
///
/// Only the present fields change. Status and scheduling are never edited
/// directly; they move exclusively through [`Command::RecordInspection`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaChanges {
    /// New sector/lote label, if changing.
    pub sector_lote: Option<SectorLote>,
    /// New plot list, if changing.
    pub plots: Option<String>,
    /// New planting date, if changing. Rescheduling the first inspection is
    /// the caller's decision; this only replaces the stored date.
    pub planting_date: Option<String>,
}

impl AreaChanges {
    /// Returns whether this update changes anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sector_lote.is_none() && self.plots.is_none() && self.planting_date.is_none()
    }
}

/// A command represents user intent as data only.
///
/// Commands are the only way to request area state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Update an existing area's descriptive fields.
    UpdateArea {
        /// The fields to change.
        changes: AreaChanges,
    },
    /// Delete an area and its inspection history.
    DeleteArea,
    /// Record a height measurement, driving the status machine.
    RecordInspection {
        /// The inspection data.
        inspection: InspectionInput,
    },
}
