// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::scheduling::parse_iso_date;
use crate::types::{Area, UserProfile};

/// Validates the field constraints of an area.
///
/// # Errors
///
/// Returns an error if the plot list is empty or the planting date does not
/// parse as an ISO date. (The sector/lote label is validated at parse time
/// by [`crate::SectorLote::parse`].)
pub fn validate_area_fields(area: &Area) -> Result<(), DomainError> {
    if area.plots.trim().is_empty() {
        return Err(DomainError::InvalidPlots(String::from(
            "Plot list cannot be empty",
        )));
    }
    parse_iso_date(&area.planting_date)?;
    if let Some(next) = &area.next_inspection_date {
        parse_iso_date(next)?;
    }
    Ok(())
}

/// Validates an email address.
///
/// Intentionally shallow: the address must be non-empty and contain a `@`
/// with non-empty local and domain parts. Deliverability is the relay's
/// problem.
///
/// # Errors
///
/// Returns an error if the address is malformed.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let trimmed: &str = email.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidEmail(String::from(
            "Email cannot be empty",
        )));
    }
    let Some((local, domain)) = trimmed.split_once('@') else {
        return Err(DomainError::InvalidEmail(format!(
            "'{trimmed}' is missing '@'"
        )));
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(DomainError::InvalidEmail(format!(
            "'{trimmed}' is not a valid address"
        )));
    }
    Ok(())
}

/// Validates the field constraints of a user profile.
///
/// # Errors
///
/// Returns an error if the uid or name is empty, or the email is malformed.
pub fn validate_user_fields(user: &UserProfile) -> Result<(), DomainError> {
    if user.uid.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "User uid cannot be empty",
        )));
    }
    if user.name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "User name cannot be empty",
        )));
    }
    validate_email(&user.email)
}
