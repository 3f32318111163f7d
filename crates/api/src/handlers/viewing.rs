//! Handlers for viewing scheduling and its state machine.
//!
//! A tenant requests a viewing; the property's owner or dalali confirms,
//! completes, or marks it a no-show; either party may cancel. Every state
//! change publishes a domain event so the counterparty gets notified.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use nyumba_core::error::CoreError;
use nyumba_core::roles::{ROLE_ADMIN, ROLE_TENANT};
use nyumba_core::types::DbId;
use nyumba_core::viewing::ViewingStatus;
use nyumba_db::models::property::Property;
use nyumba_db::models::viewing::{ScheduleOutcome, ScheduleViewing, Viewing};
use nyumba_db::repositories::{PropertyRepo, ViewingRepo};
use nyumba_events::{kinds, DomainEvent};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// How far ahead the upcoming-viewings endpoint looks, in days.
const UPCOMING_HORIZON_DAYS: i64 = 7;

fn viewing_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Viewing",
        id,
    })
}

/// Whether `user` manages `property` (owner, assigned dalali, or admin).
fn manages_property(user: &AuthUser, property: &Property) -> bool {
    user.role == ROLE_ADMIN
        || property.owner_id == user.user_id
        || property.dalali_id == Some(user.user_id)
}

/// POST /api/v1/properties/{id}/viewings
///
/// Tenants only. The slot must be in the future and at least the minimum
/// duration; a confirmed viewing inside the conflict window is a 409.
pub async fn schedule(
    State(state): State<AppState>,
    user: AuthUser,
    Path(property_id): Path<DbId>,
    Json(mut input): Json<ScheduleViewing>,
) -> AppResult<(StatusCode, Json<Viewing>)> {
    if user.role != ROLE_TENANT {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only tenants may request viewings".into(),
        )));
    }

    input.property_id = property_id;
    input.validate()?;
    if input.scheduled_at <= chrono::Utc::now() {
        return Err(AppError::Core(CoreError::Validation(
            "scheduled_at must be in the future".into(),
        )));
    }

    let property = PropertyRepo::find_by_id(&state.pool, property_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Property",
            id: property_id,
        }))?;

    let viewing = match ViewingRepo::schedule(&state.pool, user.user_id, &input).await? {
        ScheduleOutcome::Scheduled(viewing) => viewing,
        ScheduleOutcome::Conflict => {
            return Err(AppError::Core(CoreError::Conflict(
                "Requested slot conflicts with a confirmed viewing".into(),
            )))
        }
    };

    state.event_bus.publish(
        DomainEvent::new(kinds::VIEWING_REQUESTED)
            .with_source("viewing", viewing.id)
            .with_actor(user.user_id)
            .with_payload(json!({
                "notify_user_id": property.owner_id,
                "property_id": property.id,
                "property_title": property.title,
                "scheduled_at": viewing.scheduled_at,
            })),
    );

    Ok((StatusCode::CREATED, Json(viewing)))
}

/// GET /api/v1/properties/{id}/viewings
///
/// Managers of the property see every viewing; other callers only their
/// own requests.
pub async fn list_by_property(
    State(state): State<AppState>,
    user: AuthUser,
    Path(property_id): Path<DbId>,
) -> AppResult<Json<Vec<Viewing>>> {
    let property = PropertyRepo::find_by_id(&state.pool, property_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Property",
            id: property_id,
        }))?;

    let mut viewings = ViewingRepo::list_by_property(&state.pool, property_id).await?;
    if !manages_property(&user, &property) {
        viewings.retain(|v| v.tenant_id == user.user_id);
    }
    Ok(Json(viewings))
}

/// GET /api/v1/viewings/upcoming
///
/// Confirmed viewings in the next seven days where the caller is the
/// tenant, the property owner, or its dalali.
pub async fn upcoming(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Viewing>>> {
    let viewings = ViewingRepo::upcoming_for_user(
        &state.pool,
        user.user_id,
        chrono::Utc::now(),
        UPCOMING_HORIZON_DAYS,
    )
    .await?;
    Ok(Json(viewings))
}

// ---------------------------------------------------------------------------
// State transitions
// ---------------------------------------------------------------------------

/// Cancellation request payload.
#[derive(Debug, Default, Deserialize)]
pub struct CancelRequest {
    pub reason: Option<String>,
}

/// Who may apply a given transition.
enum TransitionAuthz {
    /// Property owner, assigned dalali, or admin.
    Manager,
    /// The requesting tenant or a manager.
    EitherParty,
}

/// Load, authorize, validate, and apply a viewing state transition.
///
/// The status check and update are a single compare-and-set, so of two
/// concurrent transitions exactly one wins; the loser gets a 409.
async fn apply_transition(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
    to: ViewingStatus,
    reason: Option<&str>,
    authz: TransitionAuthz,
    event_kind: &'static str,
) -> AppResult<Viewing> {
    let viewing = ViewingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| viewing_not_found(id))?;

    let property = PropertyRepo::find_by_id(&state.pool, viewing.property_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Property",
            id: viewing.property_id,
        }))?;

    let is_manager = manages_property(user, &property);
    let allowed = match authz {
        TransitionAuthz::Manager => is_manager,
        TransitionAuthz::EitherParty => is_manager || viewing.tenant_id == user.user_id,
    };
    if !allowed {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not a party to this viewing".into(),
        )));
    }

    viewing.status.validate_transition(to).map_err(AppError::Core)?;

    let updated = ViewingRepo::transition(&state.pool, id, viewing.status, to, reason)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Viewing was modified concurrently".into(),
            ))
        })?;

    // Notify whoever did not perform the action.
    let notify_user_id = if user.user_id == updated.tenant_id {
        property.owner_id
    } else {
        updated.tenant_id
    };

    state.event_bus.publish(
        DomainEvent::new(event_kind)
            .with_source("viewing", updated.id)
            .with_actor(user.user_id)
            .with_payload(json!({
                "notify_user_id": notify_user_id,
                "property_id": property.id,
                "property_title": property.title,
                "scheduled_at": updated.scheduled_at,
                "reason": reason,
            })),
    );

    Ok(updated)
}

/// PATCH /api/v1/viewings/{id}/confirm
pub async fn confirm(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Viewing>> {
    let viewing = apply_transition(
        &state,
        &user,
        id,
        ViewingStatus::Confirmed,
        None,
        TransitionAuthz::Manager,
        kinds::VIEWING_CONFIRMED,
    )
    .await?;
    Ok(Json(viewing))
}

/// PATCH /api/v1/viewings/{id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CancelRequest>,
) -> AppResult<Json<Viewing>> {
    let viewing = apply_transition(
        &state,
        &user,
        id,
        ViewingStatus::Cancelled,
        input.reason.as_deref(),
        TransitionAuthz::EitherParty,
        kinds::VIEWING_CANCELLED,
    )
    .await?;
    Ok(Json(viewing))
}

/// PATCH /api/v1/viewings/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Viewing>> {
    let viewing = apply_transition(
        &state,
        &user,
        id,
        ViewingStatus::Completed,
        None,
        TransitionAuthz::Manager,
        kinds::VIEWING_COMPLETED,
    )
    .await?;
    Ok(Json(viewing))
}

/// PATCH /api/v1/viewings/{id}/no-show
pub async fn no_show(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Viewing>> {
    let viewing = apply_transition(
        &state,
        &user,
        id,
        ViewingStatus::NoShow,
        None,
        TransitionAuthz::Manager,
        kinds::VIEWING_NO_SHOW,
    )
    .await?;
    Ok(Json(viewing))
}
