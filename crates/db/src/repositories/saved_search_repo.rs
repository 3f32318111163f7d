//! Repository for the `saved_searches` table.

use sqlx::PgPool;

use nyumba_core::types::DbId;

use crate::models::saved_search::SavedSearch;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, criteria, notify_on_new_match, \
    last_notified_at, created_at, updated_at";

/// Provides CRUD operations for saved searches.
///
/// Every lookup is scoped by `user_id`: another user's saved search is
/// indistinguishable from a missing one.
pub struct SavedSearchRepo;

impl SavedSearchRepo {
    /// Insert a saved search with its criteria snapshot.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        name: &str,
        criteria: &serde_json::Value,
        notify_on_new_match: bool,
    ) -> Result<SavedSearch, sqlx::Error> {
        let query = format!(
            "INSERT INTO saved_searches (user_id, name, criteria, notify_on_new_match)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SavedSearch>(&query)
            .bind(user_id)
            .bind(name)
            .bind(criteria)
            .bind(notify_on_new_match)
            .fetch_one(pool)
            .await
    }

    /// List a user's saved searches, newest first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<SavedSearch>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM saved_searches
             WHERE user_id = $1
             ORDER BY created_at DESC, id ASC"
        );
        sqlx::query_as::<_, SavedSearch>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Find one of a user's saved searches by ID.
    pub async fn find_by_id_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<SavedSearch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM saved_searches WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, SavedSearch>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Replace a saved search's name, criteria snapshot and notify flag.
    ///
    /// The caller merges the criteria before storing; this method writes
    /// the already-merged snapshot verbatim.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        name: &str,
        criteria: &serde_json::Value,
        notify_on_new_match: bool,
    ) -> Result<Option<SavedSearch>, sqlx::Error> {
        let query = format!(
            "UPDATE saved_searches
             SET name = $3, criteria = $4, notify_on_new_match = $5, updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SavedSearch>(&query)
            .bind(id)
            .bind(user_id)
            .bind(name)
            .bind(criteria)
            .bind(notify_on_new_match)
            .fetch_optional(pool)
            .await
    }

    /// Delete one of a user's saved searches. Returns `true` if a row was
    /// removed.
    pub async fn delete_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM saved_searches WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
