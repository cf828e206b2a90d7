// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Represents the lifecycle state of a growth area.
///
/// An area starts `Agendada` (first inspection scheduled 90 days after
/// planting). Each recorded inspection moves it to `Pendente` (crop below
/// target height, follow-up scheduled) or `Concluida` (crop at target
/// height). `Concluida` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AreaStatus {
    /// Initial state. The first inspection is scheduled.
    #[default]
    #[serde(rename = "Agendada")]
    Agendada,
    /// An inspection found the crop below target height; a follow-up is scheduled.
    #[serde(rename = "Pendente")]
    Pendente,
    /// The crop reached target height. Terminal state.
    #[serde(rename = "Concluída")]
    Concluida,
}

impl FromStr for AreaStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Agendada" => Ok(Self::Agendada),
            "Pendente" => Ok(Self::Pendente),
            "Concluída" | "Concluida" => Ok(Self::Concluida),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for AreaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AreaStatus {
    /// Converts this status to its canonical string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Agendada => "Agendada",
            Self::Pendente => "Pendente",
            Self::Concluida => "Concluída",
        }
    }

    /// Returns whether this status accepts further inspections.
    ///
    /// `Agendada` and `Pendente` areas may be inspected; `Concluida` is
    /// terminal.
    #[must_use]
    pub const fn accepts_inspections(&self) -> bool {
        matches!(self, Self::Agendada | Self::Pendente)
    }

    /// Derives the status that results from recording an inspection.
    ///
    /// `at_size == true` means the crop reached target height and the area
    /// completes; otherwise a follow-up is needed.
    #[must_use]
    pub const fn after_inspection(at_size: bool) -> Self {
        if at_size { Self::Concluida } else { Self::Pendente }
    }
}
