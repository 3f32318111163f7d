//! Handlers for the `/auth` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use nyumba_core::error::CoreError;
use nyumba_core::roles::{ROLE_DALALI, ROLE_OWNER, ROLE_TENANT};
use nyumba_db::models::user::{CreateUser, User};
use nyumba_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Login request payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token plus the authenticated user, returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/v1/auth/register
///
/// Self-registration; the requested role defaults to `tenant` and may be
/// `owner` or `dalali`, never `admin`. A duplicate email is a 409.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    input.validate()?;

    let role = input.role.as_deref().unwrap_or(ROLE_TENANT);
    if !matches!(role, ROLE_OWNER | ROLE_DALALI | ROLE_TENANT) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "role must be one of owner, dalali, tenant; got {role}"
        ))));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &input.email,
        &input.first_name,
        &input.last_name,
        &password_hash,
        role,
        input.phone_number.as_deref(),
    )
    .await?;

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// POST /api/v1/auth/login
///
/// The same 401 is returned for an unknown email and a wrong password so
/// the endpoint does not leak which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid =
        || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(invalid)?;

    let verified = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !verified {
        return Err(invalid());
    }

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    Ok(Json(AuthResponse { token, user }))
}
