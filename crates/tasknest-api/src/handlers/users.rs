//! Account handlers mounted under `/users`.
//!
//! Every body is checked against its schema by [`ValidatedJson`] before the
//! handler runs. Password hashing and verification are CPU-heavy and run on
//! the blocking pool, never while a store lock is held.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::{debug, info};

use tasknest_core::password::PasswordHasher;
use tasknest_core::types::User;
use tasknest_core::validation::{self, Schema};
use tasknest_storage::WriteOutcome;

use super::{message, MessageResponse};
use crate::error::ApiError;
use crate::extract::{RequestSchema, ValidatedJson};
use crate::state::AppState;

const USER_NOT_FOUND: &str = "User not found";
const INCORRECT_PASSWORD: &str = "Incorrect password";
const EMAIL_REGISTERED: &str = "Email is already registered";
const EMAIL_IN_USE: &str = "Email already in use";
const EMAIL_UNCHANGED: &str = "New email is the same as the current email";

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub user_name: String,
    pub password: String,
    pub email: String,
}

impl RequestSchema for SignupRequest {
    fn schema() -> Schema {
        validation::signup_schema()
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl RequestSchema for LoginRequest {
    fn schema() -> Schema {
        validation::login_schema()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub email: String,
    pub password: String,
    pub new_password: Option<String>,
}

impl RequestSchema for ChangePasswordRequest {
    fn schema() -> Schema {
        validation::change_password_schema()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEmailRequest {
    pub email: String,
    pub password: String,
    pub new_email: Option<String>,
}

impl RequestSchema for ChangeEmailRequest {
    fn schema() -> Schema {
        validation::change_email_schema()
    }
}

// =============================================================================
// Hashing helpers
// =============================================================================

async fn hash_password(hasher: &PasswordHasher, password: String) -> Result<String, ApiError> {
    let hasher = hasher.clone();
    let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("Hashing task failed: {}", e)))??;
    Ok(hash)
}

async fn verify_password(
    hasher: &PasswordHasher,
    password: String,
    hash: String,
) -> Result<bool, ApiError> {
    let hasher = hasher.clone();
    let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
        .await
        .map_err(|e| ApiError::Internal(format!("Verification task failed: {}", e)))??;
    Ok(matches)
}

fn find_by_email(state: &AppState, email: &str) -> Result<User, ApiError> {
    state
        .users
        .find(&|u| u.email == email)?
        .ok_or_else(|| ApiError::NotFound(USER_NOT_FOUND.to_string()))
}

async fn check_password(state: &AppState, user: &User, password: String) -> Result<(), ApiError> {
    if verify_password(&state.hasher, password, user.password.clone()).await? {
        Ok(())
    } else {
        debug!(user_id = %user.id, "Password mismatch");
        Err(ApiError::BadRequest(INCORRECT_PASSWORD.to_string()))
    }
}

// =============================================================================
// Handler functions
// =============================================================================

/// GET /users - every account, hashes included.
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.users.list()?;
    if users.is_empty() {
        return Err(ApiError::NotFound("No users found".to_string()));
    }
    Ok(Json(users))
}

/// POST /users/signup - register a new account.
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    // Pick up edits made to the file since startup.
    state.users.reload()?;

    if state.users.find(&|u| u.email == body.email)?.is_some() {
        return Err(ApiError::BadRequest(EMAIL_REGISTERED.to_string()));
    }

    let hash = hash_password(&state.hasher, body.password).await?;
    let user = User::new(body.user_name, body.email, hash);
    let email = user.email.clone();

    match state.users.insert_unique(user, &|u| u.email == email)? {
        WriteOutcome::Written(user) => {
            info!(user_id = %user.id, "User signed up");
            Ok((StatusCode::CREATED, message("New user created")))
        }
        // Lost a race with a concurrent signup for the same email.
        WriteOutcome::Conflict | WriteOutcome::Missing => {
            Err(ApiError::BadRequest(EMAIL_REGISTERED.to_string()))
        }
    }
}

/// POST /users/login - one-shot credential check; issues no token.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = find_by_email(&state, &body.email)?;
    check_password(&state, &user, body.password).await?;

    debug!(user_id = %user.id, "Login succeeded");
    Ok(message("Successful login"))
}

/// PUT /users/changePassword - replace the stored hash.
pub async fn change_password(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = find_by_email(&state, &body.email)?;
    check_password(&state, &user, body.password).await?;

    let new_password = body
        .new_password
        .ok_or_else(|| ApiError::Internal("newPassword is required".to_string()))?;
    let hash = hash_password(&state.hasher, new_password).await?;

    state
        .users
        .update(&user.id, &mut |u| u.password = hash.clone())?
        .ok_or_else(|| ApiError::NotFound(USER_NOT_FOUND.to_string()))?;

    info!(user_id = %user.id, "Password changed");
    Ok(message("Password updated successfully"))
}

/// PUT /users/changeEmail - move an account to a new, unused email.
pub async fn change_email(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<ChangeEmailRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = find_by_email(&state, &body.email)?;

    if let Some(new_email) = &body.new_email {
        let taken = state
            .users
            .find(&|u| &u.email == new_email && u.id != user.id)?
            .is_some();
        if taken {
            return Err(ApiError::BadRequest(EMAIL_IN_USE.to_string()));
        }
    }

    check_password(&state, &user, body.password).await?;

    let new_email = body
        .new_email
        .ok_or_else(|| ApiError::Internal("newEmail is required".to_string()))?;

    if user.email == new_email {
        return Err(ApiError::BadRequest(EMAIL_UNCHANGED.to_string()));
    }

    let outcome = state.users.update_unique(
        &user.id,
        &|u| u.email == new_email,
        &mut |u| u.email = new_email.clone(),
    )?;

    match outcome {
        WriteOutcome::Written(_) => {
            info!(user_id = %user.id, "Email changed");
            Ok(message("Email updated successfully"))
        }
        WriteOutcome::Missing => Err(ApiError::NotFound(USER_NOT_FOUND.to_string())),
        WriteOutcome::Conflict => Err(ApiError::BadRequest(EMAIL_IN_USE.to_string())),
    }
}
