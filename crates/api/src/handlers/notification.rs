//! Handlers for the `/notifications` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use nyumba_core::error::CoreError;
use nyumba_core::types::DbId;
use nyumba_db::models::notification::Notification;
use nyumba_db::repositories::NotificationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// How many notifications a single listing returns.
const LIST_LIMIT: i64 = 50;

/// GET /api/v1/notifications
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications =
        NotificationRepo::list_for_user(&state.pool, user.user_id, LIST_LIMIT).await?;
    Ok(Json(notifications))
}

/// Unread-count response payload.
#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub unread: i64,
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<UnreadCount>> {
    let unread = NotificationRepo::unread_count(&state.pool, user.user_id).await?;
    Ok(Json(UnreadCount { unread }))
}

/// POST /api/v1/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let updated = NotificationRepo::mark_read(&state.pool, id, user.user_id).await?;
    if updated {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id,
        }))
    }
}

/// Read-all response payload.
#[derive(Debug, Serialize)]
pub struct ReadAll {
    pub marked: u64,
}

/// POST /api/v1/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ReadAll>> {
    let marked = NotificationRepo::mark_all_read(&state.pool, user.user_id).await?;
    Ok(Json(ReadAll { marked }))
}
