// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! AI-assisted observation suggestions for inspections.
//!
//! Given the inspection context (crop height, date, field location) this
//! crate builds an agronomy prompt and asks a configured text-suggestion
//! service for candidate observations. The feature is strictly optional:
//! any failure degrades to a single fallback suggestion and must never
//! error the caller.

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
#![allow(clippy::multiple_crate_versions)]

mod client;
mod error;
mod prompt;

pub use client::{HttpSuggestionService, SuggestionService, UnconfiguredSuggestionService};
pub use error::SuggestError;
pub use prompt::{SuggestionInput, build_prompt};

/// The suggestion shown when the service is unavailable or fails.
pub const FALLBACK_SUGGESTION: &str = "Não foi possível obter sugestões da IA.";

/// Returns the degraded-mode suggestion list.
#[must_use]
pub fn fallback_suggestions() -> Vec<String> {
    vec![FALLBACK_SUGGESTION.to_string()]
}
