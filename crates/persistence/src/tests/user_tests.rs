// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cana_control_domain::{UserProfile, UserRole};

use crate::tests::{create_global_event, create_test_profile};
use crate::{Persistence, PersistenceError};

#[test]
fn test_create_and_get_user_round_trips() {
    let mut persistence: Persistence = Persistence::new_in_memory().expect("In-memory database");
    let profile: UserProfile = create_test_profile("uid-1", UserRole::Technician);

    let event_id: i64 = persistence
        .create_user(&profile, &create_global_event("CreateUser"))
        .expect("Persist user");
    assert!(event_id > 0);

    let loaded: UserProfile = persistence.get_user("uid-1").expect("User exists");
    assert_eq!(loaded, profile);
}

#[test]
fn test_duplicate_uid_is_rejected() {
    let mut persistence: Persistence = Persistence::new_in_memory().expect("In-memory database");
    let profile: UserProfile = create_test_profile("uid-1", UserRole::Admin);

    persistence
        .create_user(&profile, &create_global_event("CreateUser"))
        .expect("Persist user");
    let result = persistence.create_user(&profile, &create_global_event("CreateUser"));

    assert_eq!(
        result,
        Err(PersistenceError::UserExists(String::from("uid-1")))
    );
}

#[test]
fn test_rejected_duplicate_writes_no_audit_event() {
    let mut persistence: Persistence = Persistence::new_in_memory().expect("In-memory database");
    let profile: UserProfile = create_test_profile("uid-1", UserRole::Admin);

    persistence
        .create_user(&profile, &create_global_event("CreateUser"))
        .expect("Persist user");
    let _ = persistence.create_user(&profile, &create_global_event("CreateUser"));

    // The failed attempt rolled back, so only the first event remains.
    let timeline = persistence
        .get_audit_timeline(None, 100)
        .expect("Timeline loads");
    assert_eq!(timeline.len(), 1);
}

#[test]
fn test_get_missing_user_returns_not_found() {
    let persistence: Persistence = Persistence::new_in_memory().expect("In-memory database");

    assert_eq!(
        persistence.get_user("ghost"),
        Err(PersistenceError::UserNotFound(String::from("ghost")))
    );
}

#[test]
fn test_list_users_orders_by_name() {
    let mut persistence: Persistence = Persistence::new_in_memory().expect("In-memory database");

    let carla: UserProfile = UserProfile {
        uid: String::from("uid-c"),
        email: String::from("carla@example.com"),
        name: String::from("Carla"),
        role: UserRole::Technician,
    };
    let ana: UserProfile = UserProfile {
        uid: String::from("uid-a"),
        email: String::from("ana@example.com"),
        name: String::from("Ana"),
        role: UserRole::Admin,
    };

    persistence
        .create_user(&carla, &create_global_event("CreateUser"))
        .expect("Persist user");
    persistence
        .create_user(&ana, &create_global_event("CreateUser"))
        .expect("Persist user");

    let users: Vec<UserProfile> = persistence.list_users().expect("List succeeds");
    assert_eq!(users[0].name, "Ana");
    assert_eq!(users[1].name, "Carla");
}

#[test]
fn test_recipient_list_add_list_remove() {
    let mut persistence: Persistence = Persistence::new_in_memory().expect("In-memory database");

    persistence
        .add_recipient("gestor@example.com", &create_global_event("AddRecipient"))
        .expect("Add recipient");
    persistence
        .add_recipient("campo@example.com", &create_global_event("AddRecipient"))
        .expect("Add recipient");

    let recipients: Vec<String> = persistence.list_recipients().expect("List succeeds");
    assert_eq!(recipients.len(), 2);
    assert!(recipients.contains(&String::from("gestor@example.com")));

    persistence
        .remove_recipient(
            "gestor@example.com",
            &create_global_event("RemoveRecipient"),
        )
        .expect("Remove recipient");

    let recipients: Vec<String> = persistence.list_recipients().expect("List succeeds");
    assert_eq!(recipients, vec![String::from("campo@example.com")]);
}

#[test]
fn test_duplicate_recipient_is_rejected() {
    let mut persistence: Persistence = Persistence::new_in_memory().expect("In-memory database");

    persistence
        .add_recipient("gestor@example.com", &create_global_event("AddRecipient"))
        .expect("Add recipient");
    let result =
        persistence.add_recipient("gestor@example.com", &create_global_event("AddRecipient"));

    assert_eq!(
        result,
        Err(PersistenceError::RecipientExists(String::from(
            "gestor@example.com"
        )))
    );
}

#[test]
fn test_removing_unknown_recipient_is_rejected() {
    let mut persistence: Persistence = Persistence::new_in_memory().expect("In-memory database");

    let result =
        persistence.remove_recipient("ghost@example.com", &create_global_event("RemoveRecipient"));

    assert_eq!(
        result,
        Err(PersistenceError::RecipientNotFound(String::from(
            "ghost@example.com"
        )))
    );
}
