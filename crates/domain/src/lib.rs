// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod scheduling;
mod status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use scheduling::{
    FOLLOW_UP_INTERVAL_DAYS, INITIAL_INSPECTION_INTERVAL_DAYS, add_days,
    follow_up_inspection_date, initial_inspection_date, parse_iso_date,
};
pub use status::AreaStatus;
pub use types::{Area, AreaId, Inspection, InspectionId, SectorLote, UserProfile, UserRole};
pub use validation::{validate_area_fields, validate_email, validate_user_fields};
