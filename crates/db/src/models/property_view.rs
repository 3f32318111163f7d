//! Property view tracking model and aggregates.

use nyumba_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `property_views` table; one record per page view.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PropertyView {
    pub id: DbId,
    pub property_id: DbId,
    pub user_id: Option<DbId>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for recording a view; all fields beyond the property are optional
/// because anonymous traffic carries no user id.
#[derive(Debug, Default, Deserialize)]
pub struct TrackView {
    pub user_id: Option<DbId>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// View counters for a single property.
///
/// Unique viewers are counted by user id when present, falling back to
/// the source IP for anonymous views.
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct ViewStats {
    pub total_views: i64,
    pub unique_viewers: i64,
}
