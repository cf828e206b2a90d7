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
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use cana_control::{CreationResult, TransitionResult};
use cana_control_api::{
    ApiError, ApiResult, AreaInfo, AuthenticatedActor, CreateAreaRequest, CreateAreaResponse,
    CreateUserRequest, CreateUserResponse, DeleteAreaResponse, RecipientResponse,
    RecordInspectionRequest, RecordInspectionResponse, UpdateAreaRequest, UpdateAreaResponse,
    UserCreation, create_area, create_user, delete_area, record_inspection, update_area,
};
use cana_control_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use cana_control_domain::{Area, AreaId, AreaStatus, UserProfile, UserRole};
use cana_control_notify::{
    AreaChangesPayload, AreaPayload, ComposedMail, NotificationEvent, WebhookNotifier,
    compose_mail,
};
use cana_control_persistence::{OutboundMail, Persistence, PersistenceError};
use cana_control_suggest::{
    HttpSuggestionService, SuggestionInput, SuggestionService, UnconfiguredSuggestionService,
    fallback_suggestions,
};

/// CanaControl Server - HTTP backend for sugarcane field inspections
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Webhook URL to notify after successful mutations. Disabled if absent.
    #[arg(long)]
    webhook_url: Option<String>,

    /// Endpoint of the observation suggestion service. Disabled if absent.
    #[arg(long)]
    suggestion_endpoint: Option<String>,

    /// Uid of the initial admin to provision on startup.
    #[arg(long)]
    seed_admin_uid: Option<String>,

    /// Email of the initial admin to provision on startup.
    #[arg(long, requires = "seed_admin_uid")]
    seed_admin_email: Option<String>,

    /// Display name of the initial admin to provision on startup.
    #[arg(long, requires = "seed_admin_uid")]
    seed_admin_name: Option<String>,
}

/// Application state shared across handlers.
///
/// The persistence layer is wrapped in a Mutex to allow safe concurrent
/// access; the notifier and suggestion service are cheap to share.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for areas, users, mail, and audit events.
    persistence: Arc<Mutex<Persistence>>,
    /// The outbound webhook notifier.
    notifier: WebhookNotifier,
    /// The observation suggestion service.
    suggester: Arc<dyn SuggestionService>,
}

/// API request for creating an area.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateAreaApiRequest {
    /// The actor uid performing this action.
    actor_uid: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The sector/lote label, e.g. "Setor Norte / Lote 5".
    sector_lote: String,
    /// Free-form plot list, e.g. "T01, T02".
    plots: String,
    /// The planting date (ISO 8601).
    planting_date: String,
}

/// API request for updating an area's descriptive fields.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct UpdateAreaApiRequest {
    /// The actor uid performing this action.
    actor_uid: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// New sector/lote label, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    sector_lote: Option<String>,
    /// New plot list, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    plots: Option<String>,
    /// New planting date, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    planting_date: Option<String>,
}

/// API request carrying only the actor/cause envelope.
///
/// Used for delete operations where the target is in the path.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ActorApiRequest {
    /// The actor uid performing this action.
    actor_uid: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
}

/// API request for recording an inspection.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RecordInspectionApiRequest {
    /// The actor uid performing this action.
    actor_uid: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The inspection date (ISO 8601).
    date: String,
    /// Measured crop height in centimeters.
    height_cm: u32,
    /// Free-form technician observations.
    observations: String,
    /// Whether the crop reached target height.
    at_size: bool,
}

/// API request for creating a user profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateUserApiRequest {
    /// The actor uid performing this action.
    actor_uid: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The new user's identity provider uid.
    uid: String,
    /// The new user's email address.
    email: String,
    /// The new user's display name.
    name: String,
    /// The new user's role ("admin" or "technician").
    role: String,
}

/// API request for adding a notification recipient.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct AddRecipientApiRequest {
    /// The actor uid performing this action.
    actor_uid: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The recipient email address.
    email: String,
}

/// API request for observation suggestions.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SuggestionApiRequest {
    /// The actor uid performing this action.
    actor_uid: String,
    /// The area the measurement belongs to.
    area_id: String,
    /// Measured crop height in centimeters.
    height_cm: u32,
}

/// API response for area creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CreateAreaApiResponse {
    /// Success indicator.
    success: bool,
    /// The generated area identifier.
    area_id: String,
    /// The sector/lote label.
    sector_lote: String,
    /// The date of the first scheduled inspection.
    next_inspection_date: String,
    /// A success message.
    message: String,
    /// The event ID of the persisted audit event.
    event_id: i64,
}

/// API response for write operations on an existing area.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AreaWriteApiResponse {
    /// Success indicator.
    success: bool,
    /// The area identifier.
    area_id: String,
    /// A success message.
    message: String,
    /// The event ID of the persisted audit event.
    event_id: i64,
}

/// API response for recording an inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecordInspectionApiResponse {
    /// Success indicator.
    success: bool,
    /// The area identifier.
    area_id: String,
    /// The area status after the inspection.
    new_status: AreaStatus,
    /// The next scheduled inspection date, absent once completed.
    next_inspection_date: Option<String>,
    /// A success message.
    message: String,
    /// The event ID of the persisted audit event.
    event_id: i64,
}

/// API response for user creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CreateUserApiResponse {
    /// Success indicator.
    success: bool,
    /// The new user's uid.
    uid: String,
    /// The new user's role.
    role: String,
    /// A success message.
    message: String,
    /// The event ID of the persisted audit event.
    event_id: i64,
}

/// API response for a user profile lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserApiResponse {
    /// The identity provider uid.
    uid: String,
    /// The user's email address.
    email: String,
    /// The user's display name.
    name: String,
    /// The user's role.
    role: String,
}

/// API response for recipient list mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecipientApiResponse {
    /// Success indicator.
    success: bool,
    /// The recipient email address.
    email: String,
    /// A success message.
    message: String,
    /// The event ID of the persisted audit event.
    event_id: i64,
}

/// API response listing notification recipients.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecipientListApiResponse {
    /// The configured recipient addresses, oldest first.
    recipients: Vec<String>,
}

/// API response for observation suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SuggestionApiResponse {
    /// The suggested observations.
    suggestions: Vec<String>,
}

/// Query parameters for the audit timeline endpoint.
#[derive(Debug, Deserialize)]
struct AuditTimelineQuery {
    /// Restrict the timeline to one area.
    area_id: Option<String>,
    /// Maximum number of events to return.
    limit: Option<u32>,
}

/// Serializable representation of an `AuditEvent` for JSON responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AuditEventResponse {
    /// The event ID.
    event_id: Option<i64>,
    /// The actor uid.
    actor_id: String,
    /// The actor type.
    actor_type: String,
    /// The cause ID.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The action name.
    action_name: String,
    /// Optional action details.
    action_details: Option<String>,
    /// State before the transition.
    before_snapshot: String,
    /// State after the transition.
    after_snapshot: String,
    /// The area this event is scoped to, absent for global events.
    area_id: Option<String>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AuthenticationFailed { .. } => Self {
                status: StatusCode::UNAUTHORIZED,
                message: err.to_string(),
            },
            ApiError::Unauthorized { .. } => Self {
                status: StatusCode::FORBIDDEN,
                message: err.to_string(),
            },
            ApiError::DomainRuleViolation { .. } => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: err.to_string(),
            },
            ApiError::InvalidInput { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::AreaNotFound(_)
            | PersistenceError::UserNotFound(_)
            | PersistenceError::EventNotFound(_)
            | PersistenceError::MailNotFound(_)
            | PersistenceError::RecipientNotFound(_) => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            PersistenceError::UserExists(_) | PersistenceError::RecipientExists(_) => Self {
                status: StatusCode::CONFLICT,
                message: err.to_string(),
            },
            _ => {
                error!(error = %err, "Persistence error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: format!("Persistence error: {err}"),
                }
            }
        }
    }
}

/// Resolves the actor's role from the users store.
///
/// The role is never taken from the request; the stored profile is the
/// source of truth. An unknown uid fails authentication.
async fn authenticate(app_state: &AppState, actor_uid: &str) -> Result<AuthenticatedActor, HttpError> {
    let persistence = app_state.persistence.lock().await;
    let profile: UserProfile = match persistence.get_user(actor_uid) {
        Ok(profile) => profile,
        Err(PersistenceError::UserNotFound(_)) => {
            return Err(HttpError {
                status: StatusCode::UNAUTHORIZED,
                message: format!("Authentication failed: unknown actor uid '{actor_uid}'"),
            });
        }
        Err(err) => return Err(err.into()),
    };
    drop(persistence);

    Ok(AuthenticatedActor::from_profile(&profile))
}

/// Converts an `AuditEvent` to an `AuditEventResponse`.
fn audit_event_to_response(event: &AuditEvent) -> AuditEventResponse {
    AuditEventResponse {
        event_id: event.event_id,
        actor_id: event.actor.id.clone(),
        actor_type: event.actor.actor_type.clone(),
        cause_id: event.cause.id.clone(),
        cause_description: event.cause.description.clone(),
        action_name: event.action.name.clone(),
        action_details: event.action.details.clone(),
        before_snapshot: event.before.data.clone(),
        after_snapshot: event.after.data.clone(),
        area_id: event.area_id.as_ref().map(|id| id.value().to_string()),
    }
}

/// Returns today's date as an ISO 8601 date string.
fn today_iso() -> String {
    let date: time::Date = time::OffsetDateTime::now_utc().date();
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Fires the at-most-once, best-effort notifications for a committed mutation.
///
/// The webhook is posted first, then one mail per configured recipient is
/// queued for the external relay. Failures are logged and never surfaced to
/// the caller; the primary write has already committed.
async fn dispatch_notifications(app_state: &AppState, event: NotificationEvent) {
    app_state.notifier.notify(&event).await;

    let persistence = app_state.persistence.lock().await;
    let recipients: Vec<String> = match persistence.list_recipients() {
        Ok(recipients) => recipients,
        Err(err) => {
            warn!(event = event.name(), error = %err, "Failed to load recipient list; skipping mail");
            return;
        }
    };

    let mails: Vec<ComposedMail> = compose_mail(&event, &recipients);
    for mail in mails {
        let outbound: OutboundMail = OutboundMail::new(mail.to, mail.subject, mail.html);
        if let Err(err) = persistence.enqueue_mail(&outbound) {
            warn!(event = event.name(), recipient = %outbound.recipient, error = %err, "Failed to queue notification mail");
        }
    }
    drop(persistence);
}

/// Provisions the initial admin profile on startup.
///
/// Skips silently if a profile with this uid already exists, so restarts
/// with the same flags are harmless.
fn seed_admin(
    persistence: &mut Persistence,
    uid: &str,
    email: &str,
    name: &str,
) -> Result<(), PersistenceError> {
    let profile: UserProfile = UserProfile {
        uid: uid.to_string(),
        email: email.to_string(),
        name: name.to_string(),
        role: UserRole::Admin,
    };

    let action: Action = Action::new(
        String::from("CreateUser"),
        Some(format!("Seeded initial admin '{uid}'")),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        Actor::new(String::from("system"), String::from("system")),
        Cause::new(
            String::from("bootstrap"),
            String::from("Provision initial admin from CLI flags"),
        ),
        action,
        StateSnapshot::new(String::from("absent")),
        StateSnapshot::new(format!("uid={uid},role=admin")),
        None,
    );

    match persistence.create_user(&profile, &audit_event) {
        Ok(event_id) => {
            info!(event_id = event_id, uid = %uid, "Seeded initial admin");
            Ok(())
        }
        Err(PersistenceError::UserExists(_)) => {
            info!(uid = %uid, "Initial admin already provisioned; skipping seed");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

/// Handler for POST `/areas` endpoint.
///
/// Authenticates the actor, authorizes the action, and registers a new
/// growth area with its first inspection scheduled 90 days after planting.
async fn handle_create_area(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateAreaApiRequest>,
) -> Result<Json<CreateAreaApiResponse>, HttpError> {
    info!(
        actor_uid = %req.actor_uid,
        sector_lote = %req.sector_lote,
        "Handling create_area request"
    );

    let actor: AuthenticatedActor = authenticate(&app_state, &req.actor_uid).await?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let create_request: CreateAreaRequest = CreateAreaRequest {
        sector_lote: req.sector_lote,
        plots: req.plots,
        planting_date: req.planting_date,
    };

    let result: ApiResult<CreateAreaResponse, CreationResult> =
        create_area(create_request, &actor, cause)?;

    let mut persistence = app_state.persistence.lock().await;
    let event_id: i64 = persistence.create_area(&result.result)?;
    drop(persistence);

    info!(
        event_id = event_id,
        area_id = %result.response.area_id,
        "Successfully created area"
    );

    dispatch_notifications(
        &app_state,
        NotificationEvent::AreaCreated {
            area: AreaPayload::from(&result.result.area),
        },
    )
    .await;

    Ok(Json(CreateAreaApiResponse {
        success: true,
        area_id: result.response.area_id,
        sector_lote: result.response.sector_lote,
        next_inspection_date: result.response.next_inspection_date,
        message: result.response.message,
        event_id,
    }))
}

/// Handler for GET `/areas` endpoint.
///
/// Lists all areas: scheduled ones first by next inspection date, completed
/// ones last. Each entry carries only its latest inspection.
async fn handle_list_areas(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<AreaInfo>>, HttpError> {
    info!("Handling list_areas request");

    let persistence = app_state.persistence.lock().await;
    let areas: Vec<Area> = persistence.list_areas()?;
    drop(persistence);

    let response: Vec<AreaInfo> = areas.iter().map(AreaInfo::from).collect();

    Ok(Json(response))
}

/// Handler for GET `/areas/{id}` endpoint.
///
/// Returns one area with its full inspection history, newest first.
async fn handle_get_area(
    AxumState(app_state): AxumState<AppState>,
    Path(area_id): Path<String>,
) -> Result<Json<AreaInfo>, HttpError> {
    info!(area_id = %area_id, "Handling get_area request");

    let persistence = app_state.persistence.lock().await;
    let area: Area = persistence.get_area(&AreaId::new(&area_id))?;
    drop(persistence);

    Ok(Json(AreaInfo::from(&area)))
}

/// Handler for PUT `/areas/{id}` endpoint.
///
/// Updates an area's descriptive fields. Omitted fields are left unchanged;
/// the schedule and status are untouched.
async fn handle_update_area(
    AxumState(app_state): AxumState<AppState>,
    Path(area_id): Path<String>,
    Json(req): Json<UpdateAreaApiRequest>,
) -> Result<Json<AreaWriteApiResponse>, HttpError> {
    info!(
        actor_uid = %req.actor_uid,
        area_id = %area_id,
        "Handling update_area request"
    );

    let actor: AuthenticatedActor = authenticate(&app_state, &req.actor_uid).await?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let persistence = app_state.persistence.lock().await;
    let area: Area = persistence.get_area(&AreaId::new(&area_id))?;
    drop(persistence);

    let changes: AreaChangesPayload = AreaChangesPayload {
        sector_lote: req.sector_lote.clone(),
        plots: req.plots.clone(),
        planting_date: req.planting_date.clone(),
    };

    let update_request: UpdateAreaRequest = UpdateAreaRequest {
        sector_lote: req.sector_lote,
        plots: req.plots,
        planting_date: req.planting_date,
    };

    let result: ApiResult<UpdateAreaResponse, TransitionResult> =
        update_area(&area, update_request, &actor, cause)?;

    let mut persistence = app_state.persistence.lock().await;
    let event_id: i64 = persistence.apply_transition(&result.result)?;
    drop(persistence);

    info!(event_id = event_id, area_id = %area_id, "Successfully updated area");

    dispatch_notifications(
        &app_state,
        NotificationEvent::AreaUpdated {
            area_id: area_id.clone(),
            changes,
        },
    )
    .await;

    Ok(Json(AreaWriteApiResponse {
        success: true,
        area_id: result.response.area_id,
        message: result.response.message,
        event_id,
    }))
}

/// Handler for DELETE `/areas/{id}` endpoint.
///
/// Deletes an area and its inspections; the audit trail is retained.
async fn handle_delete_area(
    AxumState(app_state): AxumState<AppState>,
    Path(area_id): Path<String>,
    Json(req): Json<ActorApiRequest>,
) -> Result<Json<AreaWriteApiResponse>, HttpError> {
    info!(
        actor_uid = %req.actor_uid,
        area_id = %area_id,
        "Handling delete_area request"
    );

    let actor: AuthenticatedActor = authenticate(&app_state, &req.actor_uid).await?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let persistence = app_state.persistence.lock().await;
    let area: Area = persistence.get_area(&AreaId::new(&area_id))?;
    drop(persistence);

    let result: ApiResult<DeleteAreaResponse, TransitionResult> =
        delete_area(&area, &actor, cause)?;

    let mut persistence = app_state.persistence.lock().await;
    let event_id: i64 = persistence.apply_transition(&result.result)?;
    drop(persistence);

    info!(event_id = event_id, area_id = %area_id, "Successfully deleted area");

    dispatch_notifications(
        &app_state,
        NotificationEvent::AreaDeleted {
            area_id: area_id.clone(),
        },
    )
    .await;

    Ok(Json(AreaWriteApiResponse {
        success: true,
        area_id: result.response.area_id,
        message: result.response.message,
        event_id,
    }))
}

/// Handler for POST `/areas/{id}/inspections` endpoint.
///
/// Records a height measurement and advances the area's lifecycle: below
/// target height schedules a follow-up in 20 days, at target height
/// completes the area.
async fn handle_record_inspection(
    AxumState(app_state): AxumState<AppState>,
    Path(area_id): Path<String>,
    Json(req): Json<RecordInspectionApiRequest>,
) -> Result<Json<RecordInspectionApiResponse>, HttpError> {
    info!(
        actor_uid = %req.actor_uid,
        area_id = %area_id,
        height_cm = req.height_cm,
        at_size = req.at_size,
        "Handling record_inspection request"
    );

    let actor: AuthenticatedActor = authenticate(&app_state, &req.actor_uid).await?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let persistence = app_state.persistence.lock().await;
    let area: Area = persistence.get_area(&AreaId::new(&area_id))?;
    drop(persistence);

    let inspection_request: RecordInspectionRequest = RecordInspectionRequest {
        date: req.date,
        height_cm: req.height_cm,
        observations: req.observations,
        at_size: req.at_size,
    };

    let result: ApiResult<RecordInspectionResponse, TransitionResult> =
        record_inspection(&area, inspection_request, &actor, cause)?;

    let mut persistence = app_state.persistence.lock().await;
    let event_id: i64 = persistence.apply_transition(&result.result)?;
    drop(persistence);

    info!(
        event_id = event_id,
        area_id = %area_id,
        new_status = %result.response.new_status,
        "Successfully recorded inspection"
    );

    dispatch_notifications(
        &app_state,
        NotificationEvent::StatusUpdated {
            area_id: area_id.clone(),
            new_status: result.response.new_status,
        },
    )
    .await;

    Ok(Json(RecordInspectionApiResponse {
        success: true,
        area_id: result.response.area_id,
        new_status: result.response.new_status,
        next_inspection_date: result.response.next_inspection_date,
        message: result.response.message,
        event_id,
    }))
}

/// Handler for POST `/users` endpoint.
///
/// Creates a user profile; only admins may provision users.
async fn handle_create_user(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateUserApiRequest>,
) -> Result<Json<CreateUserApiResponse>, HttpError> {
    info!(
        actor_uid = %req.actor_uid,
        uid = %req.uid,
        role = %req.role,
        "Handling create_user request"
    );

    let actor: AuthenticatedActor = authenticate(&app_state, &req.actor_uid).await?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let create_request: CreateUserRequest = CreateUserRequest {
        uid: req.uid,
        email: req.email,
        name: req.name,
        role: req.role,
    };

    let result: ApiResult<CreateUserResponse, UserCreation> =
        create_user(create_request, &actor, cause)?;

    let mut persistence = app_state.persistence.lock().await;
    let event_id: i64 =
        persistence.create_user(&result.result.profile, &result.result.audit_event)?;
    drop(persistence);

    info!(
        event_id = event_id,
        uid = %result.response.uid,
        "Successfully created user"
    );

    Ok(Json(CreateUserApiResponse {
        success: true,
        uid: result.response.uid,
        role: result.response.role,
        message: result.response.message,
        event_id,
    }))
}

/// Handler for GET `/users/{uid}` endpoint.
async fn handle_get_user(
    AxumState(app_state): AxumState<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<UserApiResponse>, HttpError> {
    info!(uid = %uid, "Handling get_user request");

    let persistence = app_state.persistence.lock().await;
    let profile: UserProfile = persistence.get_user(&uid)?;
    drop(persistence);

    Ok(Json(UserApiResponse {
        uid: profile.uid,
        email: profile.email,
        name: profile.name,
        role: profile.role.to_string(),
    }))
}

/// Handler for GET `/settings/recipients` endpoint.
async fn handle_list_recipients(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<RecipientListApiResponse>, HttpError> {
    info!("Handling list_recipients request");

    let persistence = app_state.persistence.lock().await;
    let recipients: Vec<String> = persistence.list_recipients()?;
    drop(persistence);

    Ok(Json(RecipientListApiResponse { recipients }))
}

/// Handler for POST `/settings/recipients` endpoint.
///
/// Adds an email address to the notification recipient list.
async fn handle_add_recipient(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AddRecipientApiRequest>,
) -> Result<Json<RecipientApiResponse>, HttpError> {
    info!(
        actor_uid = %req.actor_uid,
        email = %req.email,
        "Handling add_recipient request"
    );

    let actor: AuthenticatedActor = authenticate(&app_state, &req.actor_uid).await?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let result: ApiResult<RecipientResponse, AuditEvent> =
        cana_control_api::add_recipient(req.email, &actor, cause)?;

    let mut persistence = app_state.persistence.lock().await;
    let event_id: i64 = persistence.add_recipient(&result.response.email, &result.result)?;
    drop(persistence);

    info!(
        event_id = event_id,
        email = %result.response.email,
        "Successfully added recipient"
    );

    Ok(Json(RecipientApiResponse {
        success: true,
        email: result.response.email,
        message: result.response.message,
        event_id,
    }))
}

/// Handler for DELETE `/settings/recipients/{email}` endpoint.
async fn handle_remove_recipient(
    AxumState(app_state): AxumState<AppState>,
    Path(email): Path<String>,
    Json(req): Json<ActorApiRequest>,
) -> Result<Json<RecipientApiResponse>, HttpError> {
    info!(
        actor_uid = %req.actor_uid,
        email = %email,
        "Handling remove_recipient request"
    );

    let actor: AuthenticatedActor = authenticate(&app_state, &req.actor_uid).await?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let result: ApiResult<RecipientResponse, AuditEvent> =
        cana_control_api::remove_recipient(email, &actor, cause)?;

    let mut persistence = app_state.persistence.lock().await;
    let event_id: i64 = persistence.remove_recipient(&result.response.email, &result.result)?;
    drop(persistence);

    info!(
        event_id = event_id,
        email = %result.response.email,
        "Successfully removed recipient"
    );

    Ok(Json(RecipientApiResponse {
        success: true,
        email: result.response.email,
        message: result.response.message,
        event_id,
    }))
}

/// Handler for POST `/suggestions` endpoint.
///
/// Builds the agronomy prompt from the area and the measured height, then
/// asks the configured suggestion service. Any failure degrades to the
/// fallback suggestion; this endpoint never errors past the area lookup.
async fn handle_suggestions(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<SuggestionApiRequest>,
) -> Result<Json<SuggestionApiResponse>, HttpError> {
    info!(
        actor_uid = %req.actor_uid,
        area_id = %req.area_id,
        height_cm = req.height_cm,
        "Handling suggestions request"
    );

    authenticate(&app_state, &req.actor_uid).await?;

    let persistence = app_state.persistence.lock().await;
    let area: Area = persistence.get_area(&AreaId::new(&req.area_id))?;
    drop(persistence);

    let input: SuggestionInput = SuggestionInput::from_area(&area, req.height_cm, today_iso());

    let suggestions: Vec<String> = match app_state.suggester.suggest(&input).await {
        Ok(suggestions) => suggestions,
        Err(err) => {
            warn!(area_id = %req.area_id, error = %err, "Suggestion service unavailable; using fallback");
            fallback_suggestions()
        }
    };

    Ok(Json(SuggestionApiResponse { suggestions }))
}

/// Handler for GET `/audit/timeline` endpoint.
///
/// Returns audit events newest first, optionally scoped to one area.
async fn handle_get_audit_timeline(
    AxumState(app_state): AxumState<AppState>,
    Query(params): Query<AuditTimelineQuery>,
) -> Result<Json<Vec<AuditEventResponse>>, HttpError> {
    info!(
        area_id = ?params.area_id,
        limit = ?params.limit,
        "Handling get_audit_timeline request"
    );

    let area_id: Option<AreaId> = params.area_id.as_deref().map(AreaId::new);
    let limit: u32 = params.limit.unwrap_or(100);

    let persistence = app_state.persistence.lock().await;
    let events: Vec<AuditEvent> = persistence.get_audit_timeline(area_id.as_ref(), limit)?;
    drop(persistence);

    let response: Vec<AuditEventResponse> = events.iter().map(audit_event_to_response).collect();

    Ok(Json(response))
}

/// Handler for GET `/audit/event/{event_id}` endpoint.
async fn handle_get_audit_event(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<AuditEventResponse>, HttpError> {
    info!(event_id = event_id, "Handling get_audit_event request");

    let persistence = app_state.persistence.lock().await;
    let event: AuditEvent = persistence.get_audit_event(event_id)?;
    drop(persistence);

    Ok(Json(audit_event_to_response(&event)))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/areas", post(handle_create_area))
        .route("/areas", get(handle_list_areas))
        .route("/areas/{id}", get(handle_get_area))
        .route("/areas/{id}", put(handle_update_area))
        .route("/areas/{id}", delete(handle_delete_area))
        .route("/areas/{id}/inspections", post(handle_record_inspection))
        .route("/users", post(handle_create_user))
        .route("/users/{uid}", get(handle_get_user))
        .route("/settings/recipients", get(handle_list_recipients))
        .route("/settings/recipients", post(handle_add_recipient))
        .route(
            "/settings/recipients/{email}",
            delete(handle_remove_recipient),
        )
        .route("/suggestions", post(handle_suggestions))
        .route("/audit/timeline", get(handle_get_audit_timeline))
        .route("/audit/event/{event_id}", get(handle_get_audit_event))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing CanaControl Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    // Provision the first admin when the seed flags are present
    if let (Some(uid), Some(email), Some(name)) = (
        &args.seed_admin_uid,
        &args.seed_admin_email,
        &args.seed_admin_name,
    ) {
        seed_admin(&mut persistence, uid, email, name)?;
    }

    if args.webhook_url.is_some() {
        info!("Webhook notifications enabled");
    }
    let notifier: WebhookNotifier = WebhookNotifier::new(args.webhook_url);

    let suggester: Arc<dyn SuggestionService> = match args.suggestion_endpoint {
        Some(endpoint) => {
            info!(endpoint = %endpoint, "Suggestion service enabled");
            Arc::new(HttpSuggestionService::new(endpoint))
        }
        None => Arc::new(UnconfiguredSuggestionService),
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        notifier,
        suggester,
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use cana_control_persistence::DeliveryState;
    use cana_control_suggest::FALLBACK_SUGGESTION;
    use tower::ServiceExt;

    /// Helper to create test app state with in-memory persistence and no
    /// configured webhook or suggestion service.
    fn create_test_app_state() -> AppState {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            notifier: WebhookNotifier::new(None),
            suggester: Arc::new(UnconfiguredSuggestionService),
        }
    }

    /// Helper to provision a user profile directly in the store.
    async fn seed_test_user(app_state: &AppState, uid: &str, role: UserRole) {
        let profile: UserProfile = UserProfile {
            uid: uid.to_string(),
            email: format!("{uid}@example.com"),
            name: format!("Test {uid}"),
            role,
        };
        let audit_event: AuditEvent = AuditEvent::new(
            Actor::new(String::from("system"), String::from("system")),
            Cause::new(String::from("seed"), String::from("Test fixture user")),
            Action::new(String::from("CreateUser"), None),
            StateSnapshot::new(String::from("absent")),
            StateSnapshot::new(format!("uid={uid}")),
            None,
        );

        let mut persistence = app_state.persistence.lock().await;
        persistence
            .create_user(&profile, &audit_event)
            .expect("Failed to seed test user");
    }

    /// Helper to create a test create_area request body.
    fn create_test_area_request(actor_uid: &str) -> CreateAreaApiRequest {
        CreateAreaApiRequest {
            actor_uid: actor_uid.to_string(),
            cause_id: String::from("test-cause"),
            cause_description: String::from("Test area creation"),
            sector_lote: String::from("Setor Norte / Lote 5"),
            plots: String::from("T01, T02"),
            planting_date: String::from("2024-05-10"),
        }
    }

    /// Helper to POST a JSON body to a route and return the response.
    async fn post_json<T: Serialize>(
        app: Router,
        uri: &str,
        body: &T,
    ) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    /// Helper to deserialize a response body.
    async fn read_body<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    /// Helper to create an area as the given admin and return its response.
    async fn create_area_as(app: &Router, actor_uid: &str) -> CreateAreaApiResponse {
        let response = post_json(app.clone(), "/areas", &create_test_area_request(actor_uid)).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        read_body(response).await
    }

    #[tokio::test]
    async fn test_create_area_as_admin_succeeds() {
        let app_state: AppState = create_test_app_state();
        seed_test_user(&app_state, "admin1", UserRole::Admin).await;
        let app: Router = build_router(app_state);

        let response = post_json(app, "/areas", &create_test_area_request("admin1")).await;

        assert_eq!(response.status(), HttpStatusCode::OK);

        let api_response: CreateAreaApiResponse = read_body(response).await;

        assert!(api_response.success);
        assert_eq!(api_response.sector_lote, "Setor Norte / Lote 5");
        assert_eq!(api_response.next_inspection_date, "2024-08-08");
        assert!(api_response.event_id > 0);
    }

    #[tokio::test]
    async fn test_create_area_as_technician_is_forbidden() {
        let app_state: AppState = create_test_app_state();
        seed_test_user(&app_state, "tech1", UserRole::Technician).await;
        let app: Router = build_router(app_state);

        let response = post_json(app, "/areas", &create_test_area_request("tech1")).await;

        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);

        let error_response: ErrorResponse = read_body(response).await;

        assert!(error_response.error);
        assert!(error_response.message.contains("Unauthorized"));
    }

    #[tokio::test]
    async fn test_unknown_actor_uid_fails_authentication() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = post_json(app, "/areas", &create_test_area_request("ghost")).await;

        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);

        let error_response: ErrorResponse = read_body(response).await;

        assert!(error_response.message.contains("unknown actor uid"));
    }

    #[tokio::test]
    async fn test_rejected_mutation_leaves_no_trace() {
        let app_state: AppState = create_test_app_state();
        seed_test_user(&app_state, "tech1", UserRole::Technician).await;
        let app: Router = build_router(app_state);

        let response = post_json(
            app.clone(),
            "/areas",
            &create_test_area_request("tech1"),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);

        let list_response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/areas")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let areas: Vec<AreaInfo> = read_body(list_response).await;
        assert!(areas.is_empty(), "No area should have been created");

        // Only the fixture's own seed event may appear in the timeline
        let timeline_response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/audit/timeline")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let events: Vec<AuditEventResponse> = read_body(timeline_response).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action_name, "CreateUser");
    }

    #[tokio::test]
    async fn test_technician_records_inspection_below_target() {
        let app_state: AppState = create_test_app_state();
        seed_test_user(&app_state, "admin1", UserRole::Admin).await;
        seed_test_user(&app_state, "tech1", UserRole::Technician).await;
        let app: Router = build_router(app_state);

        let created: CreateAreaApiResponse = create_area_as(&app, "admin1").await;

        let inspection_req: RecordInspectionApiRequest = RecordInspectionApiRequest {
            actor_uid: String::from("tech1"),
            cause_id: String::from("test-cause"),
            cause_description: String::from("Scheduled field visit"),
            date: String::from("2024-08-08"),
            height_cm: 150,
            observations: String::from("Crescimento abaixo do esperado"),
            at_size: false,
        };
        let response = post_json(
            app,
            &format!("/areas/{}/inspections", created.area_id),
            &inspection_req,
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::OK);

        let api_response: RecordInspectionApiResponse = read_body(response).await;

        assert!(api_response.success);
        assert_eq!(api_response.new_status, AreaStatus::Pendente);
        assert_eq!(
            api_response.next_inspection_date,
            Some(String::from("2024-08-28"))
        );
    }

    #[tokio::test]
    async fn test_at_size_inspection_completes_area() {
        let app_state: AppState = create_test_app_state();
        seed_test_user(&app_state, "admin1", UserRole::Admin).await;
        let app: Router = build_router(app_state);

        let created: CreateAreaApiResponse = create_area_as(&app, "admin1").await;

        let inspection_req: RecordInspectionApiRequest = RecordInspectionApiRequest {
            actor_uid: String::from("admin1"),
            cause_id: String::from("test-cause"),
            cause_description: String::from("Final field visit"),
            date: String::from("2024-08-08"),
            height_cm: 230,
            observations: String::from("Altura de corte atingida"),
            at_size: true,
        };
        let uri: String = format!("/areas/{}/inspections", created.area_id);
        let response = post_json(app.clone(), &uri, &inspection_req).await;

        assert_eq!(response.status(), HttpStatusCode::OK);

        let api_response: RecordInspectionApiResponse = read_body(response).await;
        assert_eq!(api_response.new_status, AreaStatus::Concluida);
        assert_eq!(api_response.next_inspection_date, None);

        // A completed area accepts no further inspections
        let followup = post_json(app, &uri, &inspection_req).await;
        assert_eq!(followup.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_get_area_returns_inspection_history() {
        let app_state: AppState = create_test_app_state();
        seed_test_user(&app_state, "admin1", UserRole::Admin).await;
        let app: Router = build_router(app_state);

        let created: CreateAreaApiResponse = create_area_as(&app, "admin1").await;

        let inspection_req: RecordInspectionApiRequest = RecordInspectionApiRequest {
            actor_uid: String::from("admin1"),
            cause_id: String::from("test-cause"),
            cause_description: String::from("Scheduled field visit"),
            date: String::from("2024-08-08"),
            height_cm: 150,
            observations: String::from("Folhas saudáveis"),
            at_size: false,
        };
        post_json(
            app.clone(),
            &format!("/areas/{}/inspections", created.area_id),
            &inspection_req,
        )
        .await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/areas/{}", created.area_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);

        let area: AreaInfo = read_body(response).await;
        assert_eq!(area.id, created.area_id);
        assert_eq!(area.status, AreaStatus::Pendente);
        assert_eq!(area.inspections.len(), 1);
        assert_eq!(area.inspections[0].height_cm, 150);
        assert_eq!(area.inspections[0].observations, "Folhas saudáveis");
    }

    #[tokio::test]
    async fn test_delete_area_removes_it() {
        let app_state: AppState = create_test_app_state();
        seed_test_user(&app_state, "admin1", UserRole::Admin).await;
        let app: Router = build_router(app_state);

        let created: CreateAreaApiResponse = create_area_as(&app, "admin1").await;

        let delete_req: ActorApiRequest = ActorApiRequest {
            actor_uid: String::from("admin1"),
            cause_id: String::from("test-cause"),
            cause_description: String::from("Area retired"),
        };
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/areas/{}", created.area_id))
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&delete_req).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);

        let lookup = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/areas/{}", created.area_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(lookup.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_user_and_lookup() {
        let app_state: AppState = create_test_app_state();
        seed_test_user(&app_state, "admin1", UserRole::Admin).await;
        let app: Router = build_router(app_state);

        let create_req: CreateUserApiRequest = CreateUserApiRequest {
            actor_uid: String::from("admin1"),
            cause_id: String::from("test-cause"),
            cause_description: String::from("Onboard field technician"),
            uid: String::from("tech-new"),
            email: String::from("tech-new@example.com"),
            name: String::from("Nova Técnica"),
            role: String::from("technician"),
        };
        let response = post_json(app.clone(), "/users", &create_req).await;

        assert_eq!(response.status(), HttpStatusCode::OK);

        let api_response: CreateUserApiResponse = read_body(response).await;
        assert!(api_response.success);
        assert_eq!(api_response.uid, "tech-new");
        assert_eq!(api_response.role, "technician");

        let lookup = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/users/tech-new")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(lookup.status(), HttpStatusCode::OK);

        let profile: UserApiResponse = read_body(lookup).await;
        assert_eq!(profile.email, "tech-new@example.com");
        assert_eq!(profile.role, "technician");
    }

    #[tokio::test]
    async fn test_duplicate_user_is_a_conflict() {
        let app_state: AppState = create_test_app_state();
        seed_test_user(&app_state, "admin1", UserRole::Admin).await;
        let app: Router = build_router(app_state);

        let create_req: CreateUserApiRequest = CreateUserApiRequest {
            actor_uid: String::from("admin1"),
            cause_id: String::from("test-cause"),
            cause_description: String::from("Onboard field technician"),
            uid: String::from("tech-new"),
            email: String::from("tech-new@example.com"),
            name: String::from("Nova Técnica"),
            role: String::from("technician"),
        };
        let first = post_json(app.clone(), "/users", &create_req).await;
        assert_eq!(first.status(), HttpStatusCode::OK);

        let second = post_json(app, "/users", &create_req).await;
        assert_eq!(second.status(), HttpStatusCode::CONFLICT);

        let error_response: ErrorResponse = read_body(second).await;
        assert!(error_response.message.contains("already exists"));
    }

    #[test]
    fn test_seed_admin_is_idempotent() {
        let mut persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");

        seed_admin(&mut persistence, "admin1", "admin@example.com", "Admin")
            .expect("First seed provisions the admin");
        seed_admin(&mut persistence, "admin1", "admin@example.com", "Admin")
            .expect("Repeat seed with the same uid is a no-op");

        let profile: UserProfile = persistence
            .get_user("admin1")
            .expect("Seeded profile exists");
        assert_eq!(profile.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_recipient_roundtrip() {
        let app_state: AppState = create_test_app_state();
        seed_test_user(&app_state, "admin1", UserRole::Admin).await;
        let app: Router = build_router(app_state);

        let add_req: AddRecipientApiRequest = AddRecipientApiRequest {
            actor_uid: String::from("admin1"),
            cause_id: String::from("test-cause"),
            cause_description: String::from("Subscribe field manager"),
            email: String::from("gestor@example.com"),
        };
        let response = post_json(app.clone(), "/settings/recipients", &add_req).await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let list = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/settings/recipients")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let listed: RecipientListApiResponse = read_body(list).await;
        assert_eq!(listed.recipients, vec!["gestor@example.com"]);

        let remove_req: ActorApiRequest = ActorApiRequest {
            actor_uid: String::from("admin1"),
            cause_id: String::from("test-cause"),
            cause_description: String::from("Unsubscribe field manager"),
        };
        let removed = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/settings/recipients/gestor@example.com")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&remove_req).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(removed.status(), HttpStatusCode::OK);

        let list_after = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/settings/recipients")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let listed_after: RecipientListApiResponse = read_body(list_after).await;
        assert!(listed_after.recipients.is_empty());
    }

    #[tokio::test]
    async fn test_mutation_queues_mail_per_recipient() {
        let app_state: AppState = create_test_app_state();
        seed_test_user(&app_state, "admin1", UserRole::Admin).await;
        let app: Router = build_router(app_state.clone());

        let add_req: AddRecipientApiRequest = AddRecipientApiRequest {
            actor_uid: String::from("admin1"),
            cause_id: String::from("test-cause"),
            cause_description: String::from("Subscribe field manager"),
            email: String::from("gestor@example.com"),
        };
        post_json(app.clone(), "/settings/recipients", &add_req).await;

        create_area_as(&app, "admin1").await;

        let persistence = app_state.persistence.lock().await;
        let queued: Vec<OutboundMail> = persistence
            .list_queued_mail()
            .expect("Failed to list queued mail");
        drop(persistence);

        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].recipient, "gestor@example.com");
        assert_eq!(queued[0].delivery_state, DeliveryState::Queued);
    }

    #[tokio::test]
    async fn test_suggestions_fall_back_when_unconfigured() {
        let app_state: AppState = create_test_app_state();
        seed_test_user(&app_state, "admin1", UserRole::Admin).await;
        seed_test_user(&app_state, "tech1", UserRole::Technician).await;
        let app: Router = build_router(app_state);

        let created: CreateAreaApiResponse = create_area_as(&app, "admin1").await;

        let suggestion_req: SuggestionApiRequest = SuggestionApiRequest {
            actor_uid: String::from("tech1"),
            area_id: created.area_id,
            height_cm: 150,
        };
        let response = post_json(app, "/suggestions", &suggestion_req).await;

        assert_eq!(response.status(), HttpStatusCode::OK);

        let api_response: SuggestionApiResponse = read_body(response).await;
        assert_eq!(api_response.suggestions, vec![FALLBACK_SUGGESTION]);
    }

    #[tokio::test]
    async fn test_audit_event_lookup() {
        let app_state: AppState = create_test_app_state();
        seed_test_user(&app_state, "admin1", UserRole::Admin).await;
        let app: Router = build_router(app_state);

        let created: CreateAreaApiResponse = create_area_as(&app, "admin1").await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/audit/event/{}", created.event_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);

        let event: AuditEventResponse = read_body(response).await;
        assert_eq!(event.event_id, Some(created.event_id));
        assert_eq!(event.action_name, "CreateArea");
        assert_eq!(event.actor_id, "admin1");
        assert_eq!(event.area_id, Some(created.area_id));
    }

    #[tokio::test]
    async fn test_timeline_filters_by_area() {
        let app_state: AppState = create_test_app_state();
        seed_test_user(&app_state, "admin1", UserRole::Admin).await;
        let app: Router = build_router(app_state);

        let first: CreateAreaApiResponse = create_area_as(&app, "admin1").await;
        let second_req: CreateAreaApiRequest = CreateAreaApiRequest {
            sector_lote: String::from("Setor Sul / Lote 2"),
            ..create_test_area_request("admin1")
        };
        let second_response = post_json(app.clone(), "/areas", &second_req).await;
        assert_eq!(second_response.status(), HttpStatusCode::OK);

        let timeline_response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/audit/timeline?area_id={}", first.area_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(timeline_response.status(), HttpStatusCode::OK);

        let events: Vec<AuditEventResponse> = read_body(timeline_response).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].area_id, Some(first.area_id));
        assert_eq!(events[0].action_name, "CreateArea");
    }
}
