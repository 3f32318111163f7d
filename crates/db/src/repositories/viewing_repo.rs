//! Repository for the `property_viewings` table.

use sqlx::PgPool;

use nyumba_core::types::{DbId, Timestamp};
use nyumba_core::viewing::{self, ViewingStatus};

use crate::models::viewing::{ScheduleOutcome, ScheduleViewing, Viewing};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, property_id, tenant_id, status, scheduled_at, \
    duration_mins, notes, cancellation_reason, created_at, updated_at";

/// The same columns qualified for joins against `properties`.
const JOINED_COLUMNS: &str = "v.id, v.property_id, v.tenant_id, v.status, \
    v.scheduled_at, v.duration_mins, v.notes, v.cancellation_reason, \
    v.created_at, v.updated_at";

/// Provides scheduling and state-transition operations for viewings.
pub struct ViewingRepo;

impl ViewingRepo {
    /// Schedule a viewing, checking for conflicts atomically.
    ///
    /// The conflict check and the insert run inside one transaction holding
    /// a per-property advisory lock, so two concurrent requests for
    /// overlapping slots serialize and the loser sees the winner's row.
    /// Only confirmed viewings inside the symmetric conflict window block.
    pub async fn schedule(
        pool: &PgPool,
        tenant_id: DbId,
        input: &ScheduleViewing,
    ) -> Result<ScheduleOutcome, sqlx::Error> {
        let (window_start, window_end) =
            viewing::conflict_window(input.scheduled_at, input.duration_mins);

        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(input.property_id)
            .execute(&mut *tx)
            .await?;

        let blocked: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM property_viewings
                WHERE property_id = $1
                  AND status = 'confirmed'
                  AND scheduled_at >= $2
                  AND scheduled_at <= $3
             )",
        )
        .bind(input.property_id)
        .bind(window_start)
        .bind(window_end)
        .fetch_one(&mut *tx)
        .await?;

        if blocked {
            tx.rollback().await?;
            return Ok(ScheduleOutcome::Conflict);
        }

        let query = format!(
            "INSERT INTO property_viewings
                (property_id, tenant_id, scheduled_at, duration_mins, notes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let viewing = sqlx::query_as::<_, Viewing>(&query)
            .bind(input.property_id)
            .bind(tenant_id)
            .bind(input.scheduled_at)
            .bind(input.duration_mins)
            .bind(input.notes.as_deref())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(ScheduleOutcome::Scheduled(viewing))
    }

    /// Find a viewing by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Viewing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM property_viewings WHERE id = $1");
        sqlx::query_as::<_, Viewing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all viewings for a property, soonest first.
    pub async fn list_by_property(
        pool: &PgPool,
        property_id: DbId,
    ) -> Result<Vec<Viewing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM property_viewings
             WHERE property_id = $1
             ORDER BY scheduled_at ASC, id ASC"
        );
        sqlx::query_as::<_, Viewing>(&query)
            .bind(property_id)
            .fetch_all(pool)
            .await
    }

    /// Confirmed viewings involving `user_id` in `[now, now + horizon)`.
    ///
    /// A user is involved as the requesting tenant, the property's owner,
    /// or its dalali.
    pub async fn upcoming_for_user(
        pool: &PgPool,
        user_id: DbId,
        now: Timestamp,
        horizon_days: i64,
    ) -> Result<Vec<Viewing>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM property_viewings v
             JOIN properties p ON p.id = v.property_id
             WHERE (v.tenant_id = $1 OR p.owner_id = $1 OR p.dalali_id = $1)
               AND v.status = 'confirmed'
               AND v.scheduled_at >= $2
               AND v.scheduled_at < $2 + make_interval(days => $3::INT)
             ORDER BY v.scheduled_at ASC, v.id ASC"
        );
        sqlx::query_as::<_, Viewing>(&query)
            .bind(user_id)
            .bind(now)
            .bind(horizon_days)
            .fetch_all(pool)
            .await
    }

    /// Atomically move a viewing from `from` to `to`.
    ///
    /// Compare-and-set on the current status: returns `None` when the row
    /// is missing or no longer in `from`, so a concurrent transition loses
    /// cleanly instead of double-applying. `reason` is recorded only when
    /// given (cancellations).
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        from: ViewingStatus,
        to: ViewingStatus,
        reason: Option<&str>,
    ) -> Result<Option<Viewing>, sqlx::Error> {
        let query = format!(
            "UPDATE property_viewings
             SET status = $3,
                 cancellation_reason = COALESCE($4, cancellation_reason),
                 updated_at = NOW()
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Viewing>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .bind(reason)
            .fetch_optional(pool)
            .await
    }

    /// Count of pending viewing requests across an owner's properties.
    pub async fn count_pending_for_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM property_viewings v
             JOIN properties p ON p.id = v.property_id
             WHERE p.owner_id = $1 AND v.status = 'pending'",
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await
    }
}
