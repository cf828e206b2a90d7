// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cana_control_audit::{Actor, Cause};
use cana_control_domain::{Area, SectorLote};

use crate::{CreationResult, create_area};

pub fn test_actor() -> Actor {
    Actor::new(String::from("uid-admin"), String::from("admin"))
}

pub fn test_cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("Test request"))
}

/// Creates a fresh `Agendada` area planted on 2024-05-10.
pub fn test_area() -> Area {
    let result: CreationResult = create_area(
        SectorLote::parse("S1/L01").unwrap(),
        String::from("T01, T02"),
        String::from("2024-05-10"),
        test_actor(),
        test_cause(),
    )
    .unwrap();
    result.area
}
