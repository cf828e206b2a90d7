// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cana_control_domain::Area;

/// The inspection context a suggestion is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionInput {
    /// Measured crop height in centimeters.
    pub height_cm: u32,
    /// The inspection date (ISO 8601 date string).
    pub inspection_date: String,
    /// The sector half of the area's label.
    pub sector: String,
    /// The lote half of the area's label.
    pub lote: String,
    /// The area's plot list.
    pub talhoes: String,
}

impl SuggestionInput {
    /// Builds the input from an area and the measurement being recorded.
    #[must_use]
    pub fn from_area(area: &Area, height_cm: u32, inspection_date: String) -> Self {
        Self {
            height_cm,
            inspection_date,
            sector: area.sector_lote.sector().to_string(),
            lote: area.sector_lote.lote().to_string(),
            talhoes: area.plots.clone(),
        }
    }
}

/// Renders the agronomy prompt for a suggestion request.
#[must_use]
pub fn build_prompt(input: &SuggestionInput) -> String {
    format!(
        "You are an experienced agricultural technician specializing in sugarcane inspections.\n\
         \n\
         Based on the following information, provide a list of potential observations about \
         the sugarcane's condition. Consider factors like height, date, and location to \
         identify potential issues or areas of concern. Be specific and provide actionable \
         insights.\n\
         \n\
         Height: {} cm\n\
         Inspection Date: {}\n\
         Sector: {}\n\
         Lote: {}\n\
         Talhoes: {}\n\
         \n\
         Provide the observations as a numbered list.",
        input.height_cm, input.inspection_date, input.sector, input.lote, input.talhoes
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use cana_control_domain::{AreaId, AreaStatus, SectorLote};

    fn test_area() -> Area {
        Area {
            id: AreaId::new("area-1"),
            sector_lote: SectorLote::parse("S1/L01").unwrap(),
            plots: String::from("T01, T02"),
            planting_date: String::from("2024-05-10"),
            next_inspection_date: Some(String::from("2024-08-08")),
            status: AreaStatus::Agendada,
            inspections: Vec::new(),
        }
    }

    #[test]
    fn test_input_splits_sector_and_lote() {
        let input: SuggestionInput =
            SuggestionInput::from_area(&test_area(), 120, String::from("2024-08-08"));

        assert_eq!(input.sector, "S1");
        assert_eq!(input.lote, "L01");
        assert_eq!(input.talhoes, "T01, T02");
    }

    #[test]
    fn test_prompt_carries_all_context() {
        let input: SuggestionInput =
            SuggestionInput::from_area(&test_area(), 120, String::from("2024-08-08"));

        let prompt: String = build_prompt(&input);

        assert!(prompt.contains("Height: 120 cm"));
        assert!(prompt.contains("Inspection Date: 2024-08-08"));
        assert!(prompt.contains("Sector: S1"));
        assert!(prompt.contains("Lote: L01"));
        assert!(prompt.contains("Talhoes: T01, T02"));
        assert!(prompt.contains("numbered list"));
    }
}
