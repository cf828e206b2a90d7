// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Outbound notification pipeline for CanaControl.
//!
//! Every successful mutation fires two best-effort side effects after the
//! primary write commits: a JSON webhook call and one queued email per
//! configured recipient. Neither path may block or fail the mutation;
//! failures are logged and dropped.

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

mod events;
mod mail;
mod webhook;

pub use events::{AreaChangesPayload, AreaPayload, InspectionPayload, NotificationEvent};
pub use mail::{ComposedMail, compose_mail};
pub use webhook::WebhookNotifier;
