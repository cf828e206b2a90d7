// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod mail_tests;
mod user_tests;

use cana_control::{CreationResult, create_area};
use cana_control_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use cana_control_domain::{SectorLote, UserProfile, UserRole};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("uid-admin"), String::from("admin"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("Test operation"))
}

/// Creates a creation result for an area planted on 2024-05-10.
pub fn create_test_area_result(sector_lote: &str) -> CreationResult {
    create_area(
        SectorLote::parse(sector_lote).expect("Valid sector/lote"),
        String::from("T01, T02"),
        String::from("2024-05-10"),
        create_test_actor(),
        create_test_cause(),
    )
    .expect("Valid area")
}

pub fn create_test_profile(uid: &str, role: UserRole) -> UserProfile {
    UserProfile {
        uid: uid.to_string(),
        email: format!("{uid}@example.com"),
        name: format!("User {uid}"),
        role,
    }
}

/// Creates a globally scoped audit event (no area).
pub fn create_global_event(action_name: &str) -> AuditEvent {
    AuditEvent::new(
        create_test_actor(),
        create_test_cause(),
        Action::new(action_name.to_string(), None),
        StateSnapshot::new(String::from("absent")),
        StateSnapshot::new(String::from("present")),
        None,
    )
}
