//! User management handlers.
//!
//! Profile updates are owner-only: the authenticated email must match the
//! path email. Listing users and promoting admins are admin operations.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use techhub_core::policy::Operation;
use techhub_core::{Email, Role};

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::{CurrentUser, authorize};
use crate::models::UserUpdate;
use crate::services::auth::AuthError;
use crate::state::AppState;

/// Admin promotion request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeAdminRequest {
    pub email: String,
}

/// Handle `GET /customers` (admin).
pub async fn list_customers(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse> {
    authorize(&user, Operation::ViewAllCustomers)?;

    let users = UserRepository::new(state.pool()).list().await?;
    if users.is_empty() {
        return Err(AppError::NotFound("No users found".to_string()));
    }

    Ok(Json(users))
}

/// Handle `GET /customer/{email}` (authenticated).
pub async fn get_customer(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(email): Path<String>,
) -> Result<impl IntoResponse> {
    let email = Email::parse(email.trim()).map_err(AuthError::InvalidEmail)?;

    let customer = UserRepository::new(state.pool())
        .get_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(customer))
}

/// Handle `PUT /user/{email}` (authenticated, owner-only).
pub async fn update_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(email): Path<String>,
    Json(update): Json<UserUpdate>,
) -> Result<impl IntoResponse> {
    let email = Email::parse(email.trim()).map_err(AuthError::InvalidEmail)?;

    if user.email != email {
        return Err(AppError::Forbidden(
            "You are not authorized to update this user".to_string(),
        ));
    }

    let updated = UserRepository::new(state.pool())
        .update_profile(&email, &update)
        .await
        .map_err(|e| AppError::not_found_as(e, "User not found"))?;

    Ok(Json(updated))
}

/// Handle `PUT /make-admin` (admin).
pub async fn make_admin(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<MakeAdminRequest>,
) -> Result<impl IntoResponse> {
    authorize(&user, Operation::PromoteUser)?;

    let email = Email::parse(req.email.trim()).map_err(AuthError::InvalidEmail)?;

    let users = UserRepository::new(state.pool());
    let target = users
        .get_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if target.role == Role::Admin {
        return Err(AppError::BadRequest(
            "User is already an Admin".to_string(),
        ));
    }

    users.set_role(&email, Role::Admin).await?;

    tracing::info!(promoted = %email, by = %user.id, "user promoted to admin");

    Ok(Json(json!({ "message": "User promoted to Admin successfully" })))
}
