// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use time::Date;

/// Days between planting and the first scheduled inspection.
pub const INITIAL_INSPECTION_INTERVAL_DAYS: i64 = 90;

/// Days between an inspection that found the crop below target height and
/// the scheduled follow-up.
pub const FOLLOW_UP_INTERVAL_DAYS: i64 = 20;

/// Parses an ISO 8601 date string (e.g. `2024-05-10`).
///
/// # Errors
///
/// Returns an error if the string is empty or does not parse as an ISO date.
pub fn parse_iso_date(date_string: &str) -> Result<Date, DomainError> {
    if date_string.is_empty() {
        return Err(DomainError::DateParseError {
            date_string: date_string.to_string(),
            error: String::from("date is empty"),
        });
    }
    Date::parse(
        date_string,
        &time::format_description::well_known::Iso8601::DEFAULT,
    )
    .map_err(|e| DomainError::DateParseError {
        date_string: date_string.to_string(),
        error: e.to_string(),
    })
}

/// Adds a day offset to an ISO 8601 date string, returning an ISO string.
///
/// # Errors
///
/// Returns an error if the date fails to parse or the arithmetic overflows.
pub fn add_days(date_string: &str, days: i64) -> Result<String, DomainError> {
    let date: Date = parse_iso_date(date_string)?;
    let shifted: Date = date.checked_add(time::Duration::days(days)).ok_or_else(|| {
        DomainError::DateArithmeticOverflow {
            operation: format!("adding {days} days to {date_string}"),
        }
    })?;
    Ok(shifted.to_string())
}

/// Computes the first inspection date for a newly created area.
///
/// The first inspection is scheduled 90 days after planting.
///
/// # Errors
///
/// Returns an error if the planting date is invalid.
pub fn initial_inspection_date(planting_date: &str) -> Result<String, DomainError> {
    add_days(planting_date, INITIAL_INSPECTION_INTERVAL_DAYS)
}

/// Computes the follow-up inspection date after a below-target inspection.
///
/// The follow-up is scheduled 20 days after the inspection.
///
/// # Errors
///
/// Returns an error if the inspection date is invalid.
pub fn follow_up_inspection_date(inspection_date: &str) -> Result<String, DomainError> {
    add_days(inspection_date, FOLLOW_UP_INTERVAL_DAYS)
}
