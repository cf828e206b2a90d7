// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SuggestError;
use crate::prompt::{SuggestionInput, build_prompt};

const SUGGESTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Seam for observation-suggestion backends.
///
/// The server depends on this trait, not on a concrete client, so tests can
/// substitute a canned implementation.
#[async_trait]
pub trait SuggestionService: Send + Sync {
    /// Returns candidate observations for the given inspection context.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable, rejects the request,
    /// or answers with an unusable body.
    async fn suggest(&self, input: &SuggestionInput) -> Result<Vec<String>, SuggestError>;
}

#[derive(Debug, Serialize)]
struct SuggestionRequest {
    prompt: String,
}

#[derive(Debug, Deserialize)]
struct SuggestionResponse {
    suggestions: Vec<String>,
}

/// HTTP suggestion client.
///
/// Posts `{"prompt": …}` to the configured endpoint and expects
/// `{"suggestions": […]}` back.
#[derive(Debug, Clone)]
pub struct HttpSuggestionService {
    client: Client,
    endpoint: String,
}

impl HttpSuggestionService {
    /// Creates a client for the given suggestion endpoint.
    #[must_use]
    pub fn new(endpoint: String) -> Self {
        let client: Client = Client::builder()
            .timeout(SUGGESTION_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self { client, endpoint }
    }
}

#[async_trait]
impl SuggestionService for HttpSuggestionService {
    async fn suggest(&self, input: &SuggestionInput) -> Result<Vec<String>, SuggestError> {
        let request: SuggestionRequest = SuggestionRequest {
            prompt: build_prompt(input),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| SuggestError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SuggestError::ServiceError {
                status: response.status().as_u16(),
            });
        }

        let body: SuggestionResponse = response
            .json()
            .await
            .map_err(|e| SuggestError::ParseError(e.to_string()))?;

        if body.suggestions.is_empty() {
            return Err(SuggestError::EmptyResponse);
        }

        debug!(
            count = body.suggestions.len(),
            "Received observation suggestions"
        );

        Ok(body.suggestions)
    }
}

/// Placeholder backend used when no endpoint is configured.
///
/// Always errors, so callers take their fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredSuggestionService;

#[async_trait]
impl SuggestionService for UnconfiguredSuggestionService {
    async fn suggest(&self, _input: &SuggestionInput) -> Result<Vec<String>, SuggestError> {
        Err(SuggestError::NotConfigured)
    }
}
