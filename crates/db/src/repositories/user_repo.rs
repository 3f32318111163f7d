//! Repository for the `users` table.

use sqlx::PgPool;

use crate::models::user::User;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, first_name, last_name, password_hash, role, \
    phone_number, is_active, created_at, updated_at";

/// Provides account lookup and registration.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new account with an already-hashed password.
    ///
    /// A duplicate email violates `uq_users_email` and surfaces as a
    /// database error for the API layer to classify.
    pub async fn create(
        pool: &PgPool,
        email: &str,
        first_name: &str,
        last_name: &str,
        password_hash: &str,
        role: &str,
        phone_number: Option<&str>,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, first_name, last_name, password_hash, role, phone_number)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .bind(first_name)
            .bind(last_name)
            .bind(password_hash)
            .bind(role)
            .bind(phone_number)
            .fetch_one(pool)
            .await
    }

    /// Find an active account by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE LOWER(email) = LOWER($1) AND is_active = TRUE"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

}
