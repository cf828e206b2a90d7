// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::status::AreaStatus;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Opaque identifier for a growth area.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AreaId(String);

impl AreaId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an existing identifier value.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AreaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier for an inspection record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InspectionId(String);

impl InspectionId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an existing identifier value.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InspectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A "SECTOR/LOTE" field label, e.g. `S1/L01`.
///
/// The two halves name the sector and the lote of the plantation. The label
/// is stored as entered; the halves are split on demand for reporting and
/// for building suggestion prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorLote(String);

impl SectorLote {
    /// Parses a sector/lote label.
    ///
    /// # Errors
    ///
    /// Returns an error if the label is empty or does not contain exactly
    /// one `/` separating two non-empty halves.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidSectorLote(String::from(
                "Sector/lote cannot be empty",
            )));
        }
        let mut halves = trimmed.splitn(2, '/');
        let sector: &str = halves.next().unwrap_or("");
        let lote: &str = halves.next().unwrap_or("");
        if sector.is_empty() || lote.is_empty() || lote.contains('/') {
            return Err(DomainError::InvalidSectorLote(format!(
                "Expected 'SECTOR/LOTE', got '{trimmed}'"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the full label.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }

    /// Returns the sector half of the label.
    #[must_use]
    pub fn sector(&self) -> &str {
        self.0.split('/').next().unwrap_or(&self.0)
    }

    /// Returns the lote half of the label.
    #[must_use]
    pub fn lote(&self) -> &str {
        self.0.split('/').nth(1).unwrap_or("")
    }
}

impl std::fmt::Display for SectorLote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single height measurement recorded during a field visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspection {
    /// The inspection identifier.
    pub id: InspectionId,
    /// The inspection date (ISO 8601 date string).
    pub date: String,
    /// Measured crop height in centimeters.
    pub height_cm: u32,
    /// Free-form technician observations.
    pub observations: String,
    /// Whether the crop reached target height.
    pub at_size: bool,
}

/// A sugarcane growth area under inspection.
///
/// Inspections are kept newest-first; `next_inspection_date` is `None` once
/// the area is complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    /// The area identifier.
    pub id: AreaId,
    /// The sector/lote label.
    pub sector_lote: SectorLote,
    /// Free-form plot list, e.g. "T01, T02".
    pub plots: String,
    /// The planting date (ISO 8601 date string).
    pub planting_date: String,
    /// The date of the next scheduled inspection, if any.
    pub next_inspection_date: Option<String>,
    /// The lifecycle status.
    pub status: AreaStatus,
    /// Recorded inspections, newest first.
    pub inspections: Vec<Inspection>,
}

impl Area {
    /// Returns the most recent inspection, if any.
    #[must_use]
    pub fn last_inspection(&self) -> Option<&Inspection> {
        self.inspections.first()
    }
}

/// Roles assignable to application users.
///
/// Roles gate mutations: only admins may manage areas, users, and
/// notification settings; technicians may record inspections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    /// Full structural and corrective authority.
    #[serde(rename = "admin")]
    Admin,
    /// May record inspections and request suggestions.
    #[serde(rename = "technician")]
    Technician,
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "technician" => Ok(Self::Technician),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl UserRole {
    /// Converts this role to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Technician => "technician",
        }
    }
}

/// An application user profile.
///
/// The uid is the external identity provider's subject. Identity
/// verification happens outside this system; the profile is the source of
/// truth for the role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The identity provider uid.
    pub uid: String,
    /// The user's email address.
    pub email: String,
    /// The user's display name.
    pub name: String,
    /// The user's role.
    pub role: UserRole,
}
