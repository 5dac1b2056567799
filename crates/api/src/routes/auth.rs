//! Registration and login handlers.
//!
//! Signup never creates a user directly: it parks the registration in
//! `pending_registrations` behind a 6-digit emailed OTP, and only a correct,
//! in-window code moves it into `users`. The OTP email is the one side effect
//! whose failure does not fail the request - the client is told to check
//! their inbox either way, and the failure is logged.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;

use techhub_core::Email;

use crate::db::UserRepository;
use crate::error::Result;
use crate::services::auth::{self, AuthError, OTP_TTL_MINUTES};
use crate::state::AppState;

/// Signup request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// OTP verification request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Handle `POST /auth/signup`.
///
/// Validates the email, rejects already-registered addresses, then upserts a
/// pending registration keyed by email: signing up twice before verifying
/// simply replaces the previous attempt with a fresh OTP.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse> {
    let email = Email::parse(&req.email).map_err(AuthError::InvalidEmail)?;

    let users = UserRepository::new(state.pool());
    if users.get_by_email(&email).await?.is_some() {
        return Err(AuthError::AlreadyRegistered.into());
    }

    let password_hash = auth::hash_password(&req.password)?;
    let otp = auth::generate_otp();
    let otp_expires = Utc::now() + Duration::minutes(OTP_TTL_MINUTES);

    users
        .upsert_pending(&req.name, &email, &password_hash, &otp, otp_expires)
        .await?;

    // Delivery failure must not fail the signup; the pending row stands and
    // the user can re-request a code by signing up again.
    if let Err(e) = state.email().send_otp(&email, &otp).await {
        tracing::warn!(recipient = %email, error = %e, "failed to send signup OTP");
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "OTP sent to email for verification" })),
    ))
}

/// Handle `POST /auth/verify-otp`.
///
/// A matching, unexpired code converts the pending registration into a user,
/// deletes the pending row, and logs the new user straight in.
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<impl IntoResponse> {
    let email = Email::parse(&req.email).map_err(AuthError::InvalidEmail)?;

    let users = UserRepository::new(state.pool());
    let pending = users
        .get_pending(&email)
        .await?
        .ok_or(AuthError::RegistrationNotFound)?;

    if !pending.accepts_otp(&req.otp, Utc::now()) {
        return Err(AuthError::OtpInvalidOrExpired.into());
    }

    let user = users.create_from_pending(&pending).await?;
    users.delete_pending(&email).await?;

    let token = state.tokens().issue(&user)?;

    tracing::info!(user_id = %user.id, "user verified and registered");

    Ok(Json(json!({
        "message": "User verified and registered successfully",
        "token": token,
    })))
}

/// Handle `POST /auth/login`.
///
/// The response never says whether the email or the password was wrong.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    // A malformed email can't belong to an account; same generic rejection
    let email = Email::parse(&req.email).map_err(|_| AuthError::InvalidCredentials)?;

    let users = UserRepository::new(state.pool());
    let user = users
        .get_by_email(&email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !auth::verify_password(&req.password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.tokens().issue(&user)?;

    Ok(Json(json!({
        "message": "User logged in successfully",
        "token": token,
        "user": user.profile(),
    })))
}
