//! Notification entity model and DTOs.

use nyumba_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub kind: String,
    pub title: String,
    pub message: String,
    /// Structured context (entity ids etc.) for client deep-links.
    pub data: serde_json::Value,
    pub is_read: bool,
    pub created_at: Timestamp,
}

/// Insert payload produced by the event dispatcher.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: DbId,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub data: serde_json::Value,
}
