// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cana_control::CreationResult;
use cana_control_audit::Cause;
use cana_control_domain::Area;

use crate::{AuthenticatedActor, CreateAreaRequest, Role, create_area};

pub fn admin_actor() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("uid-admin"), Role::Admin)
}

pub fn technician_actor() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("uid-tech"), Role::Technician)
}

pub fn test_cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("Test request"))
}

/// Creates a fresh area planted on 2024-05-10 through the API boundary.
pub fn test_area() -> Area {
    let result: crate::ApiResult<crate::CreateAreaResponse, CreationResult> = create_area(
        CreateAreaRequest {
            sector_lote: String::from("S1/L01"),
            plots: String::from("T01, T02"),
            planting_date: String::from("2024-05-10"),
        },
        &admin_actor(),
        test_cause(),
    )
    .expect("Valid area");
    result.result.area
}
