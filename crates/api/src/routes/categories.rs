//! Category handlers. Reads are public; writes are admin-only.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use techhub_core::CategoryId;
use techhub_core::policy::Operation;

use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::middleware::{CurrentUser, authorize};
use crate::models::CategoryInput;
use crate::state::AppState;

/// Handle `POST /category` (admin).
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<CategoryInput>,
) -> Result<impl IntoResponse> {
    authorize(&user, Operation::ManageCatalog)?;

    let category = CatalogRepository::new(state.pool())
        .create_category(&input)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Category created successfully",
            "category": category,
        })),
    ))
}

/// Handle `GET /categories` (public).
///
/// Each category carries its live product count for the storefront's
/// navigation tiles.
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let categories = CatalogRepository::new(state.pool()).list_categories().await?;
    Ok(Json(categories))
}

/// Handle `GET /category/{id}` (public).
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<impl IntoResponse> {
    let category = CatalogRepository::new(state.pool())
        .get_category(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    Ok(Json(category))
}

/// Handle `PUT /category/{id}` (admin).
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<CategoryId>,
    Json(input): Json<CategoryInput>,
) -> Result<impl IntoResponse> {
    authorize(&user, Operation::ManageCatalog)?;

    let category = CatalogRepository::new(state.pool())
        .update_category(id, &input)
        .await
        .map_err(|e| AppError::not_found_as(e, "Category not found"))?;

    Ok(Json(json!({
        "message": "Category updated",
        "category": category,
    })))
}

/// Handle `DELETE /category/{id}` (admin).
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<CategoryId>,
) -> Result<impl IntoResponse> {
    authorize(&user, Operation::ManageCatalog)?;

    CatalogRepository::new(state.pool())
        .delete_category(id)
        .await
        .map_err(|e| AppError::not_found_as(e, "Category not found"))?;

    Ok(Json(json!({ "message": "Category deleted successfully" })))
}
