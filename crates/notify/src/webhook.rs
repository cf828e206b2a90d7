// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use crate::events::NotificationEvent;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Best-effort webhook delivery.
///
/// When no URL is configured the notifier is a no-op. Delivery failures are
/// logged at warn level and swallowed; the caller's mutation has already
/// committed and must not be failed retroactively.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: Option<String>,
}

impl WebhookNotifier {
    /// Creates a notifier posting to the given URL, or a no-op notifier
    /// when `url` is `None`.
    #[must_use]
    pub fn new(url: Option<String>) -> Self {
        let client: Client = Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self { client, url }
    }

    /// Returns whether a webhook URL is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    /// Posts the event to the configured webhook, if any.
    ///
    /// Never returns an error: failures are logged and dropped.
    pub async fn notify(&self, event: &NotificationEvent) {
        let Some(url) = self.url.as_deref() else {
            debug!(event = event.name(), "No webhook URL configured, skipping");
            return;
        };

        match self.client.post(url).json(event).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(event = event.name(), "Webhook delivered");
            }
            Ok(response) => {
                warn!(
                    event = event.name(),
                    status = %response.status(),
                    "Webhook delivery rejected"
                );
            }
            Err(e) => {
                warn!(event = event.name(), error = %e, "Webhook delivery failed");
            }
        }
    }
}
