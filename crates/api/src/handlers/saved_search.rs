//! Handlers for the `/saved-searches` resource.
//!
//! Saved searches are private: every operation is scoped to the caller,
//! and another user's saved search behaves exactly like a missing one.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use validator::Validate;

use nyumba_core::error::CoreError;
use nyumba_core::types::DbId;
use nyumba_db::models::saved_search::{CreateSavedSearch, SavedSearch, UpdateSavedSearch};
use nyumba_db::repositories::SavedSearchRepo;
use nyumba_events::{kinds, DomainEvent};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn saved_search_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "SavedSearch",
        id,
    })
}

/// POST /api/v1/saved-searches
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateSavedSearch>,
) -> AppResult<(StatusCode, Json<SavedSearch>)> {
    input.validate()?;

    let snapshot = serde_json::to_value(&input.criteria)
        .map_err(|e| AppError::InternalError(format!("Criteria serialization failed: {e}")))?;

    let saved = SavedSearchRepo::create(
        &state.pool,
        user.user_id,
        &input.name,
        &snapshot,
        input.notify_on_new_match,
    )
    .await?;

    state.event_bus.publish(
        DomainEvent::new(kinds::SAVED_SEARCH_CREATED)
            .with_source("saved_search", saved.id)
            .with_actor(user.user_id)
            .with_payload(json!({ "name": saved.name })),
    );

    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /api/v1/saved-searches
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<SavedSearch>>> {
    let searches = SavedSearchRepo::list_by_user(&state.pool, user.user_id).await?;
    Ok(Json(searches))
}

/// PATCH /api/v1/saved-searches/{id}
///
/// Criteria in the patch are merged field-by-field onto the stored
/// snapshot; fields the patch omits keep their saved values. A fresh
/// snapshot value is written, never an in-place mutation.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSavedSearch>,
) -> AppResult<Json<SavedSearch>> {
    let existing = SavedSearchRepo::find_by_id_for_user(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| saved_search_not_found(id))?;

    let merged = match input.criteria {
        Some(patch) => {
            let current = existing.criteria().map_err(|e| {
                AppError::InternalError(format!("Stored criteria are unreadable: {e}"))
            })?;
            current.merged_with(patch)
        }
        None => existing.criteria().map_err(|e| {
            AppError::InternalError(format!("Stored criteria are unreadable: {e}"))
        })?,
    };
    let snapshot = serde_json::to_value(&merged)
        .map_err(|e| AppError::InternalError(format!("Criteria serialization failed: {e}")))?;

    let name = input.name.unwrap_or(existing.name);
    let notify = input
        .notify_on_new_match
        .unwrap_or(existing.notify_on_new_match);

    let updated = SavedSearchRepo::update(&state.pool, id, user.user_id, &name, &snapshot, notify)
        .await?
        .ok_or_else(|| saved_search_not_found(id))?;

    Ok(Json(updated))
}

/// DELETE /api/v1/saved-searches/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = SavedSearchRepo::delete_for_user(&state.pool, id, user.user_id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(saved_search_not_found(id))
    }
}
