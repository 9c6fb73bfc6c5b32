use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::db::{NewUser, UserProfile};
use crate::error::OrreryError;
use crate::middleware::ApiJson;
use crate::router::OrreryState;
use crate::service::password;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    message: String,
    token: String,
    user: UserProfile,
}

#[derive(Debug, Deserialize)]
pub struct ResetConfirmRequest {
    pub token: String,
    pub new_password: String,
}

/// POST /register -> 200, or 409 when the email is already taken.
pub async fn register(
    State(state): State<OrreryState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, OrreryError> {
    if body.email.trim().is_empty() || !body.email.contains('@') {
        return Err(OrreryError::Validation(
            "a valid email address is required".to_string(),
        ));
    }
    if body.password.is_empty() {
        return Err(OrreryError::Validation(
            "password must not be empty".to_string(),
        ));
    }

    if state.storage.user_by_email(&body.email).await?.is_some() {
        return Err(OrreryError::Conflict(format!(
            "email '{}' already registered",
            body.email
        )));
    }

    let user = NewUser {
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email,
        password_hash: password::hash_password(&body.password)?,
    };
    state.storage.insert_user(&user).await?;
    info!(email = %user.email, "user registered");

    Ok(Json(json!({ "message": "user created successfully" })))
}

/// POST /login -> 200 with a bearer token, or 401. Wrong email and wrong
/// password are indistinguishable to the caller.
pub async fn login(
    State(state): State<OrreryState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, OrreryError> {
    let bad_credentials = || OrreryError::Unauthorized("bad email or password".to_string());

    let user = state
        .storage
        .user_by_email(&body.email)
        .await?
        .ok_or_else(bad_credentials)?;

    if !password::verify_password(&body.password, &user.password_hash)? {
        return Err(bad_credentials());
    }

    let token = state.tokens.issue(&user.email)?;
    info!(email = %user.email, "login succeeded");

    Ok(Json(LoginResponse {
        message: "login succeeded".to_string(),
        token,
        user: user.into(),
    }))
}

/// GET /reset_password/{email} -> dispatch a single-use reset token by mail.
/// Unknown email is 401, matching the login behavior for absent accounts.
pub async fn request_password_reset(
    State(state): State<OrreryState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, OrreryError> {
    let user = state
        .storage
        .user_by_email(&email)
        .await?
        .ok_or_else(|| OrreryError::Unauthorized(format!("no account for '{email}'")))?;

    let (raw_token, token_hash) = password::generate_reset_token();
    let expires_at = Utc::now().timestamp() + state.reset_ttl_minutes * 60;
    state
        .storage
        .create_password_reset(user.id, &token_hash, expires_at)
        .await?;

    // transport failure surfaces as 502; the stored reset row is harmless
    state
        .mailer
        .send_password_reset(&user.email, &raw_token)
        .await?;
    info!(email = %user.email, "password reset requested");

    Ok(Json(json!({
        "message": format!("password reset mail sent to '{email}'")
    })))
}

/// POST /reset_password -> consume a reset token and set a new password.
pub async fn confirm_password_reset(
    State(state): State<OrreryState>,
    ApiJson(body): ApiJson<ResetConfirmRequest>,
) -> Result<impl IntoResponse, OrreryError> {
    if body.new_password.is_empty() {
        return Err(OrreryError::Validation(
            "new_password must not be empty".to_string(),
        ));
    }

    let token_hash = password::hash_reset_token(&body.token);
    let user_id = state
        .storage
        .take_password_reset(&token_hash, Utc::now().timestamp())
        .await?
        .ok_or_else(|| {
            OrreryError::Unauthorized("invalid, expired, or already used reset token".to_string())
        })?;

    let new_hash = password::hash_password(&body.new_password)?;
    state.storage.update_user_password(user_id, &new_hash).await?;
    info!(user_id, "password reset completed");

    Ok(Json(json!({ "message": "password updated successfully" })))
}
