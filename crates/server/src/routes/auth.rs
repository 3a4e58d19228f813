//! Account lifecycle: signup, OTP verification, login, password reset.
//!
//! Signup creates an unverified account and emails a one-time code; login
//! is refused until the code has been confirmed. Bearer tokens are opaque
//! and stored server-side, so logout is an actual revocation.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use mirakle_core::{Email, OtpPurpose};

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::auth::bearer_token_from_headers;
use crate::models::user::User;
use crate::services::auth::{
    AuthError, generate_token, hash_password, token_ttl, validate_password, verify_password,
};
use crate::services::otp::OtpOutcome;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyBody {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailBody {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordBody {
    pub email: String,
    pub code: String,
    pub password: String,
}

/// Response for a successful login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

fn parse_email(raw: &str) -> Result<Email> {
    Email::parse(raw).map_err(|e| AppError::Validation(e.to_string()))
}

/// Create an account and send a signup verification code.
///
/// `POST /auth/register`
#[instrument(skip(state, body))]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<Json<Value>> {
    let email = parse_email(&body.email)?;
    if body.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    validate_password(&body.password).map_err(AppError::Auth)?;

    let repo = UserRepository::new(state.pool());
    let hash = hash_password(&body.password).map_err(AppError::Auth)?;
    let user = repo
        .create(&email, body.name.trim(), &hash)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::Conflict(_) => AppError::Auth(AuthError::UserAlreadyExists),
            other => AppError::Database(other),
        })?;

    let code = state.otp().issue(&email, OtpPurpose::Signup).await;
    state.mailer().send_otp(&email, OtpPurpose::Signup, &code).await?;

    tracing::info!(user_id = %user.id, "Account created, verification code sent");
    Ok(Json(json!({ "message": "Verification code sent" })))
}

/// Confirm a signup verification code.
///
/// `POST /auth/verify`
#[instrument(skip(state, body))]
pub async fn verify(
    State(state): State<AppState>,
    Json(body): Json<VerifyBody>,
) -> Result<Json<Value>> {
    let email = parse_email(&body.email)?;

    match state
        .otp()
        .verify(&email, OtpPurpose::Signup, body.code.trim())
        .await
    {
        OtpOutcome::Verified => {}
        OtpOutcome::Mismatch | OtpOutcome::Expired => {
            return Err(AppError::Auth(AuthError::OtpInvalid));
        }
    }

    let repo = UserRepository::new(state.pool());
    let user = repo
        .get_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("account not found".to_string()))?;
    repo.verify_email(user.id).await?;

    Ok(Json(json!({ "message": "Email verified" })))
}

/// Re-send a signup verification code.
///
/// `POST /auth/resend`
///
/// Responds identically whether or not the account exists, so the endpoint
/// cannot be used to probe for registered emails.
#[instrument(skip(state, body))]
pub async fn resend(
    State(state): State<AppState>,
    Json(body): Json<EmailBody>,
) -> Result<Json<Value>> {
    let email = parse_email(&body.email)?;

    let repo = UserRepository::new(state.pool());
    if let Some(user) = repo.get_by_email(&email).await?
        && !user.email_verified
    {
        let code = state.otp().issue(&email, OtpPurpose::Signup).await;
        state.mailer().send_otp(&email, OtpPurpose::Signup, &code).await?;
    }

    Ok(Json(json!({ "message": "If the account exists, a code was sent" })))
}

/// Exchange credentials for a bearer token.
///
/// `POST /auth/login`
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>> {
    let email = parse_email(&body.email)?;
    let repo = UserRepository::new(state.pool());

    let (user, stored_hash) = repo
        .get_password_hash(&email)
        .await?
        .ok_or(AppError::Auth(AuthError::InvalidCredentials))?;

    if !verify_password(&body.password, &stored_hash).map_err(AppError::Auth)? {
        return Err(AppError::Auth(AuthError::InvalidCredentials));
    }
    if !user.email_verified {
        return Err(AppError::Auth(AuthError::EmailNotVerified));
    }

    let token = generate_token();
    let expires_at = chrono::Utc::now() + token_ttl();
    repo.create_token(user.id, &token, expires_at).await?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(LoginResponse { token, user }))
}

/// Revoke the presented bearer token.
///
/// `POST /auth/logout`
///
/// Idempotent: revoking an unknown token still succeeds.
#[instrument(skip(state, headers))]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>> {
    if let Some(token) = bearer_token_from_headers(&headers) {
        UserRepository::new(state.pool()).delete_token(token).await?;
    }

    Ok(Json(json!({ "message": "Logged out" })))
}

/// Send a password reset code.
///
/// `POST /auth/forgot-password`
///
/// Same non-disclosure shape as `resend`.
#[instrument(skip(state, body))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<EmailBody>,
) -> Result<Json<Value>> {
    let email = parse_email(&body.email)?;

    if UserRepository::new(state.pool())
        .get_by_email(&email)
        .await?
        .is_some()
    {
        let code = state.otp().issue(&email, OtpPurpose::PasswordReset).await;
        state
            .mailer()
            .send_otp(&email, OtpPurpose::PasswordReset, &code)
            .await?;
    }

    Ok(Json(json!({ "message": "If the account exists, a code was sent" })))
}

/// Set a new password after confirming a reset code.
///
/// `POST /auth/reset-password`
#[instrument(skip(state, body))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordBody>,
) -> Result<Json<Value>> {
    let email = parse_email(&body.email)?;
    validate_password(&body.password).map_err(AppError::Auth)?;

    match state
        .otp()
        .verify(&email, OtpPurpose::PasswordReset, body.code.trim())
        .await
    {
        OtpOutcome::Verified => {}
        OtpOutcome::Mismatch | OtpOutcome::Expired => {
            return Err(AppError::Auth(AuthError::OtpInvalid));
        }
    }

    let repo = UserRepository::new(state.pool());
    let user = repo
        .get_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("account not found".to_string()))?;

    let hash = hash_password(&body.password).map_err(AppError::Auth)?;
    repo.update_password(user.id, &hash).await?;

    tracing::info!(user_id = %user.id, "Password reset");
    Ok(Json(json!({ "message": "Password updated" })))
}
