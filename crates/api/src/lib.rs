// Copyright (C) 2026 CanaControl Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::str::FromStr;

use cana_control::{
    AreaChanges, Command, CoreError, CreationResult, InspectionInput, TransitionResult, apply,
};
use cana_control_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use cana_control_domain::{
    Area, DomainError, SectorLote, UserProfile, UserRole, validate_email, validate_user_fields,
};

mod request_response;

#[cfg(test)]
mod tests;

pub use request_response::{
    AreaInfo, CreateAreaRequest, CreateAreaResponse, CreateUserRequest, CreateUserResponse,
    DeleteAreaResponse, InspectionInfo, RecipientResponse, RecordInspectionRequest,
    RecordInspectionResponse, UpdateAreaRequest, UpdateAreaResponse,
};

/// Actor roles for authorization.
///
/// Roles gate what an authenticated actor may do. They are sourced from the
/// actor's stored user profile, never from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: full structural and corrective authority.
    ///
    /// Admins may manage areas, user profiles, and notification settings,
    /// in addition to everything technicians may do.
    Admin,
    /// Technician role: field operators.
    ///
    /// Technicians may record inspections and request observation
    /// suggestions, but may not change the structural data.
    Technician,
}

impl From<UserRole> for Role {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => Self::Admin,
            UserRole::Technician => Self::Technician,
        }
    }
}

/// An authenticated actor with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The actor's identity provider uid.
    pub uid: String,
    /// The role from the actor's stored profile.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(uid: String, role: Role) -> Self {
        Self { uid, role }
    }

    /// Builds the actor from a stored user profile.
    #[must_use]
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self::new(profile.uid.clone(), Role::from(profile.role))
    }

    /// Converts this authenticated actor into an audit Actor.
    ///
    /// This is used when recording audit events to attribute actions
    /// to the authenticated user.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        let actor_type: String = match self.role {
            Role::Admin => String::from("admin"),
            Role::Technician => String::from("technician"),
        };
        Actor::new(self.uid.clone(), actor_type)
    }
}

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidSectorLote(msg) => ApiError::InvalidInput {
            field: String::from("sector_lote"),
            message: msg,
        },
        DomainError::InvalidPlots(msg) => ApiError::InvalidInput {
            field: String::from("plots"),
            message: msg,
        },
        DomainError::InvalidEmail(msg) => ApiError::InvalidInput {
            field: String::from("email"),
            message: msg,
        },
        DomainError::InvalidName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::InvalidRole(msg) => ApiError::InvalidInput {
            field: String::from("role"),
            message: format!("Unknown role '{msg}'"),
        },
        DomainError::InvalidStatus(msg) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown status '{msg}'"),
        },
        DomainError::DateParseError { date_string, error } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("'{date_string}' is not a valid ISO 8601 date: {error}"),
        },
        DomainError::DateArithmeticOverflow { operation } => ApiError::DomainRuleViolation {
            rule: String::from("date_arithmetic"),
            message: format!("Date arithmetic overflow during {operation}"),
        },
        DomainError::AreaNotFound { area_id } => ApiError::DomainRuleViolation {
            rule: String::from("area_exists"),
            message: format!("Area '{area_id}' not found"),
        },
        DomainError::AreaCompleted { area_id } => ApiError::DomainRuleViolation {
            rule: String::from("completed_area_is_terminal"),
            message: format!("Area '{area_id}' is completed and accepts no further inspections"),
        },
        DomainError::DuplicateUser { uid } => ApiError::DomainRuleViolation {
            rule: String::from("unique_uid"),
            message: format!("User with uid '{uid}' already exists"),
        },
        DomainError::UserNotFound { uid } => ApiError::DomainRuleViolation {
            rule: String::from("user_exists"),
            message: format!("User with uid '{uid}' not found"),
        },
        DomainError::DuplicateRecipient { email } => ApiError::DomainRuleViolation {
            rule: String::from("unique_recipient"),
            message: format!("Recipient '{email}' is already on the notification list"),
        },
        DomainError::RecipientNotFound { email } => ApiError::DomainRuleViolation {
            rule: String::from("recipient_exists"),
            message: format!("Recipient '{email}' is not on the notification list"),
        },
    }
}

fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Authorization service for enforcing role-based access control.
///
/// This service determines whether an authenticated actor has permission
/// to perform a specific action based on their role.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if an actor may manage areas (create, update, delete).
    ///
    /// Only Admin actors may change the structural area data.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_manage_areas(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Technician => Err(AuthError::Unauthorized {
                action: String::from("manage_areas"),
                required_role: String::from("Admin"),
            }),
        }
    }

    /// Checks if an actor may create user profiles.
    ///
    /// Only Admin actors may create users.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_manage_users(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Technician => Err(AuthError::Unauthorized {
                action: String::from("manage_users"),
                required_role: String::from("Admin"),
            }),
        }
    }

    /// Checks if an actor may change notification settings.
    ///
    /// Only Admin actors may edit the recipient list.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_manage_settings(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Technician => Err(AuthError::Unauthorized {
                action: String::from("manage_settings"),
                required_role: String::from("Admin"),
            }),
        }
    }
}

/// The result of an API operation: the response plus the audit payload the
/// caller must persist.
///
/// `R` is the persistence payload: a [`CreationResult`], a
/// [`TransitionResult`], or a bare audit event for global operations. This
/// pairing ensures successful API operations always produce an audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResult<T, R> {
    /// The API response.
    pub response: T,
    /// The state change and audit event to persist.
    pub result: R,
}

/// The persistence payload for a user creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCreation {
    /// The validated profile to store.
    pub profile: UserProfile,
    /// The audit event recording the creation.
    pub audit_event: AuditEvent,
}

/// Registers a new growth area via the API boundary with authorization.
///
/// The first inspection is scheduled 90 days after planting; the area
/// starts `Agendada`.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The sector/lote label, plot list, or planting date is invalid
pub fn create_area(
    request: CreateAreaRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<CreateAreaResponse, CreationResult>, ApiError> {
    // Enforce authorization before executing command
    AuthorizationService::authorize_manage_areas(authenticated_actor)?;

    let actor: Actor = authenticated_actor.to_audit_actor();
    let sector_lote: SectorLote =
        SectorLote::parse(&request.sector_lote).map_err(translate_domain_error)?;

    let result: CreationResult = cana_control::create_area(
        sector_lote,
        request.plots,
        request.planting_date,
        actor,
        cause,
    )
    .map_err(translate_core_error)?;

    let response: CreateAreaResponse = CreateAreaResponse {
        area_id: result.area.id.value().to_string(),
        sector_lote: result.area.sector_lote.value().to_string(),
        next_inspection_date: result
            .area
            .next_inspection_date
            .clone()
            .unwrap_or_default(),
        message: format!(
            "Successfully registered area '{}', first inspection on {}",
            result.area.sector_lote,
            result.area.next_inspection_date.as_deref().unwrap_or("-")
        ),
    };

    Ok(ApiResult { response, result })
}

/// Updates an area's descriptive fields via the API boundary.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - A supplied field value is invalid
/// - No field is provided
pub fn update_area(
    area: &Area,
    request: UpdateAreaRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<UpdateAreaResponse, TransitionResult>, ApiError> {
    // Enforce authorization before executing command
    AuthorizationService::authorize_manage_areas(authenticated_actor)?;

    let actor: Actor = authenticated_actor.to_audit_actor();

    let sector_lote: Option<SectorLote> = match request.sector_lote {
        Some(label) => Some(SectorLote::parse(&label).map_err(translate_domain_error)?),
        None => None,
    };

    let changes: AreaChanges = AreaChanges {
        sector_lote,
        plots: request.plots,
        planting_date: request.planting_date,
    };
    if changes.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("changes"),
            message: String::from("At least one field must be provided"),
        });
    }

    let result: TransitionResult = apply(area, Command::UpdateArea { changes }, actor, cause)
        .map_err(translate_core_error)?;

    let response: UpdateAreaResponse = UpdateAreaResponse {
        area_id: area.id.value().to_string(),
        message: format!("Successfully updated area '{}'", area.sector_lote),
    };

    Ok(ApiResult { response, result })
}

/// Deletes an area via the API boundary.
///
/// # Errors
///
/// Returns an error if the actor is not authorized (not an Admin).
pub fn delete_area(
    area: &Area,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<DeleteAreaResponse, TransitionResult>, ApiError> {
    // Enforce authorization before executing command
    AuthorizationService::authorize_manage_areas(authenticated_actor)?;

    let actor: Actor = authenticated_actor.to_audit_actor();

    let result: TransitionResult =
        apply(area, Command::DeleteArea, actor, cause).map_err(translate_core_error)?;

    let response: DeleteAreaResponse = DeleteAreaResponse {
        area_id: area.id.value().to_string(),
        message: format!("Successfully deleted area '{}'", area.sector_lote),
    };

    Ok(ApiResult { response, result })
}

/// Records an inspection via the API boundary.
///
/// Any authenticated actor may record inspections; this is the technician's
/// daily operation.
///
/// # Errors
///
/// Returns an error if:
/// - The inspection date is invalid
/// - The area is completed and accepts no further inspections
pub fn record_inspection(
    area: &Area,
    request: RecordInspectionRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<RecordInspectionResponse, TransitionResult>, ApiError> {
    let actor: Actor = authenticated_actor.to_audit_actor();

    let inspection: InspectionInput = InspectionInput {
        date: request.date,
        height_cm: request.height_cm,
        observations: request.observations,
        at_size: request.at_size,
    };

    let result: TransitionResult = apply(
        area,
        Command::RecordInspection { inspection },
        actor,
        cause,
    )
    .map_err(translate_core_error)?;

    let (new_status, next_inspection_date) = result.new_state.as_ref().map_or(
        (area.status, None),
        |new_area| (new_area.status, new_area.next_inspection_date.clone()),
    );

    let response: RecordInspectionResponse = RecordInspectionResponse {
        area_id: area.id.value().to_string(),
        new_status,
        next_inspection_date: next_inspection_date.clone(),
        message: format!(
            "Inspection recorded for area '{}': status {}, next inspection {}",
            area.sector_lote,
            new_status,
            next_inspection_date.as_deref().unwrap_or("none")
        ),
    };

    Ok(ApiResult { response, result })
}

/// Creates a user profile via the API boundary with authorization.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The uid or name is empty, the email is malformed, or the role is
///   unknown
pub fn create_user(
    request: CreateUserRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<CreateUserResponse, UserCreation>, ApiError> {
    // Enforce authorization before executing command
    AuthorizationService::authorize_manage_users(authenticated_actor)?;

    let actor: Actor = authenticated_actor.to_audit_actor();
    let role: UserRole = UserRole::from_str(&request.role).map_err(translate_domain_error)?;

    let profile: UserProfile = UserProfile {
        uid: request.uid,
        email: request.email,
        name: request.name,
        role,
    };
    validate_user_fields(&profile).map_err(translate_domain_error)?;

    let action: Action = Action::new(
        String::from("CreateUser"),
        Some(format!(
            "Created user '{}' with role {}",
            profile.uid, profile.role
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        StateSnapshot::new(String::from("absent")),
        StateSnapshot::new(format!("uid={},role={}", profile.uid, profile.role)),
        None,
    );

    let response: CreateUserResponse = CreateUserResponse {
        uid: profile.uid.clone(),
        role: profile.role.to_string(),
        message: format!("Successfully created user '{}'", profile.uid),
    };

    Ok(ApiResult {
        response,
        result: UserCreation {
            profile,
            audit_event,
        },
    })
}

/// Adds a notification recipient via the API boundary with authorization.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The email address is malformed
pub fn add_recipient(
    email: String,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<RecipientResponse, AuditEvent>, ApiError> {
    // Enforce authorization before executing command
    AuthorizationService::authorize_manage_settings(authenticated_actor)?;

    let actor: Actor = authenticated_actor.to_audit_actor();
    validate_email(&email).map_err(translate_domain_error)?;

    let action: Action = Action::new(
        String::from("AddRecipient"),
        Some(format!("Added '{email}' to the notification list")),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        StateSnapshot::new(String::from("absent")),
        StateSnapshot::new(format!("recipient={email}")),
        None,
    );

    let response: RecipientResponse = RecipientResponse {
        email: email.clone(),
        message: format!("Added '{email}' to the notification list"),
    };

    Ok(ApiResult {
        response,
        result: audit_event,
    })
}

/// Removes a notification recipient via the API boundary with authorization.
///
/// # Errors
///
/// Returns an error if the actor is not authorized (not an Admin).
pub fn remove_recipient(
    email: String,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<RecipientResponse, AuditEvent>, ApiError> {
    // Enforce authorization before executing command
    AuthorizationService::authorize_manage_settings(authenticated_actor)?;

    let actor: Actor = authenticated_actor.to_audit_actor();

    let action: Action = Action::new(
        String::from("RemoveRecipient"),
        Some(format!("Removed '{email}' from the notification list")),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        StateSnapshot::new(format!("recipient={email}")),
        StateSnapshot::new(String::from("absent")),
        None,
    );

    let response: RecipientResponse = RecipientResponse {
        email: email.clone(),
        message: format!("Removed '{email}' from the notification list"),
    };

    Ok(ApiResult {
        response,
        result: audit_event,
    })
}
