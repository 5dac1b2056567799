//! Password reset and change handlers.
//!
//! The forgot-password flow mirrors signup: a 6-digit code is emailed and
//! must come back within ten minutes. `sendotp` succeeds whether or not the
//! email belongs to an account, so the endpoint cannot be used to probe for
//! registered addresses.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use techhub_core::Email;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::services::auth::{self, AuthError};
use crate::state::AppState;

/// Forgot-password request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
    pub email: String,
}

/// Password reset request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub password: String,
}

/// Authenticated password change request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

/// Handle `POST /sendotp`.
///
/// Upserts the reset code for the email (a new request replaces any earlier
/// code) and emails it. Succeeds regardless of whether an account exists.
pub async fn send_otp(
    State(state): State<AppState>,
    Json(req): Json<SendOtpRequest>,
) -> Result<impl IntoResponse> {
    let email = Email::parse(&req.email).map_err(AuthError::InvalidEmail)?;

    let otp = auth::generate_otp();
    UserRepository::new(state.pool())
        .upsert_reset_otp(&email, &otp)
        .await?;

    if let Err(e) = state.email().send_otp(&email, &otp).await {
        tracing::warn!(recipient = %email, error = %e, "failed to send reset OTP");
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "OTP sent to email for verification" })),
    ))
}

/// Handle `PUT /resetpassword`.
///
/// The stored code must match exactly and still be inside its ten-minute
/// window; it is deleted once the new password is in place.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse> {
    let email = Email::parse(&req.email).map_err(AuthError::InvalidEmail)?;

    let users = UserRepository::new(state.pool());
    let entry = users
        .get_reset_otp(&email, &req.otp)
        .await?
        .ok_or(AuthError::OtpInvalidOrExpired)?;

    if entry.is_expired(Utc::now()) {
        return Err(AuthError::OtpInvalidOrExpired.into());
    }

    let password_hash = auth::hash_password(&req.password)?;
    users
        .set_password_hash(&email, &password_hash)
        .await
        .map_err(|e| AppError::not_found_as(e, "User not found"))?;

    users.delete_reset_otp(&email).await?;

    tracing::info!(%email, "password reset completed");

    Ok(Json(json!({ "message": "Password reset successfully" })))
}

/// Handle `PUT /changepassword` (authenticated).
pub async fn change_password(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse> {
    let (Some(old_password), Some(new_password)) = (req.old_password, req.new_password) else {
        return Err(AppError::BadRequest(
            "Please provide old and new passwords".to_string(),
        ));
    };

    let users = UserRepository::new(state.pool());
    let record = users
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    if !auth::verify_password(&old_password, &record.password_hash)? {
        return Err(AuthError::OldPasswordMismatch.into());
    }

    let password_hash = auth::hash_password(&new_password)?;
    users.set_password_hash(&record.email, &password_hash).await?;

    Ok(Json(json!({ "message": "Password changed successfully" })))
}
