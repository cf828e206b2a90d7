// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AreaStatus, DomainError};
use std::str::FromStr;

#[test]
fn test_default_status_is_agendada() {
    assert_eq!(AreaStatus::default(), AreaStatus::Agendada);
}

#[test]
fn test_status_roundtrip_through_string() {
    for status in [
        AreaStatus::Agendada,
        AreaStatus::Pendente,
        AreaStatus::Concluida,
    ] {
        let parsed: AreaStatus = AreaStatus::from_str(status.as_str()).unwrap();
        assert_eq!(status, parsed);
    }
}

#[test]
fn test_status_accepts_ascii_spelling_of_concluida() {
    let parsed: AreaStatus = AreaStatus::from_str("Concluida").unwrap();
    assert_eq!(parsed, AreaStatus::Concluida);
}

#[test]
fn test_unknown_status_is_rejected() {
    let result = AreaStatus::from_str("Cancelada");
    assert!(matches!(result, Err(DomainError::InvalidStatus(_))));
}

#[test]
fn test_agendada_and_pendente_accept_inspections() {
    assert!(AreaStatus::Agendada.accepts_inspections());
    assert!(AreaStatus::Pendente.accepts_inspections());
}

#[test]
fn test_concluida_is_terminal() {
    assert!(!AreaStatus::Concluida.accepts_inspections());
}

#[test]
fn test_at_size_inspection_completes_the_area() {
    assert_eq!(AreaStatus::after_inspection(true), AreaStatus::Concluida);
}

#[test]
fn test_below_target_inspection_leaves_area_pending() {
    assert_eq!(AreaStatus::after_inspection(false), AreaStatus::Pendente);
}
