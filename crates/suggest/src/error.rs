// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// Errors from the suggestion service.
///
/// Callers are expected to treat every variant the same way: log it and fall
/// back to the static suggestion.
#[derive(Debug, Error)]
pub enum SuggestError {
    /// No suggestion endpoint is configured.
    #[error("No suggestion endpoint configured")]
    NotConfigured,

    /// The request could not reach the service.
    #[error("Suggestion request failed: {0}")]
    NetworkError(String),

    /// The service answered with a non-success status.
    #[error("Suggestion service rejected the request: HTTP {status}")]
    ServiceError { status: u16 },

    /// The response body did not match the expected shape.
    #[error("Suggestion response could not be parsed: {0}")]
    ParseError(String),

    /// The service answered with an empty suggestion list.
    #[error("Suggestion service returned no suggestions")]
    EmptyResponse,
}
