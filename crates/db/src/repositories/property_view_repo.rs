//! Repository for the `property_views` table.

use sqlx::PgPool;

use nyumba_core::types::{DbId, Timestamp};

use crate::models::property_view::{PropertyView, TrackView, ViewStats};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, property_id, user_id, ip_address, user_agent, created_at";

/// Records and aggregates property page views.
pub struct PropertyViewRepo;

impl PropertyViewRepo {
    /// Record one page view.
    pub async fn track(
        pool: &PgPool,
        property_id: DbId,
        input: &TrackView,
    ) -> Result<PropertyView, sqlx::Error> {
        let query = format!(
            "INSERT INTO property_views (property_id, user_id, ip_address, user_agent)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PropertyView>(&query)
            .bind(property_id)
            .bind(input.user_id)
            .bind(input.ip_address.as_deref())
            .bind(input.user_agent.as_deref())
            .fetch_one(pool)
            .await
    }

    /// View counters for one property.
    ///
    /// Unique viewers are keyed by user ID when present, by source IP for
    /// anonymous views.
    pub async fn stats(pool: &PgPool, property_id: DbId) -> Result<ViewStats, sqlx::Error> {
        sqlx::query_as::<_, ViewStats>(
            "SELECT COUNT(*) AS total_views,
                    COUNT(DISTINCT COALESCE(user_id::TEXT, ip_address)) AS unique_viewers
             FROM property_views
             WHERE property_id = $1",
        )
        .bind(property_id)
        .fetch_one(pool)
        .await
    }

    /// View timestamps for one property inside `[start, end)`, ascending.
    /// Feeds the per-property trend bucketing.
    pub async fn viewed_between(
        pool: &PgPool,
        property_id: DbId,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<Timestamp>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT created_at FROM property_views
             WHERE property_id = $1 AND created_at >= $2 AND created_at < $3
             ORDER BY created_at ASC",
        )
        .bind(property_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    /// Total views across all of an owner's properties.
    pub async fn total_for_owner(pool: &PgPool, owner_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM property_views pv
             JOIN properties p ON p.id = pv.property_id
             WHERE p.owner_id = $1",
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await
    }
}
