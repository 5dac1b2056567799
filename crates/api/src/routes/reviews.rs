//! Review handlers (authenticated except the per-product listing).
//!
//! Update and delete are scoped to `(review, owner)` in one query, so "not
//! yours" and "does not exist" are the same 404 and the endpoint leaks
//! nothing about other users' reviews.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use techhub_core::{ProductId, ReviewId};

use crate::db::{CatalogRepository, ReviewRepository};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Review create/update request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub rating: i32,
    pub review_text: String,
}

/// Review create request body (names the product).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddReviewRequest {
    pub product_id: ProductId,
    pub rating: i32,
    pub review_text: String,
}

fn validate_rating(rating: i32) -> Result<()> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::BadRequest(
            "Rating must be between 1 and 5".to_string(),
        ));
    }
    Ok(())
}

/// Handle `POST /reviews/add`.
pub async fn add(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<AddReviewRequest>,
) -> Result<impl IntoResponse> {
    validate_rating(req.rating)?;

    if CatalogRepository::new(state.pool())
        .get_product(req.product_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    let review = ReviewRepository::new(state.pool())
        .add(user.id, req.product_id, req.rating, &req.review_text)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Review added successfully",
            "review": review,
        })),
    ))
}

/// Handle `GET /reviews/product/{productId}` (public).
pub async fn for_product(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let reviews = ReviewRepository::new(state.pool())
        .for_product(product_id)
        .await?;

    Ok(Json(json!({ "reviews": reviews })))
}

/// Handle `GET /reviews/myreviews`.
pub async fn mine(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse> {
    let reviews = ReviewRepository::new(state.pool()).for_user(user.id).await?;

    Ok(Json(json!({ "reviews": reviews })))
}

/// Handle `PUT /reviews/{reviewId}`.
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(review_id): Path<ReviewId>,
    Json(req): Json<ReviewRequest>,
) -> Result<impl IntoResponse> {
    validate_rating(req.rating)?;

    let review = ReviewRepository::new(state.pool())
        .update(review_id, user.id, req.rating, &req.review_text)
        .await
        .map_err(|e| AppError::not_found_as(e, "Review not found or unauthorized"))?;

    Ok(Json(json!({
        "message": "Review updated successfully",
        "review": review,
    })))
}

/// Handle `DELETE /reviews/{reviewId}`.
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(review_id): Path<ReviewId>,
) -> Result<impl IntoResponse> {
    ReviewRepository::new(state.pool())
        .delete(review_id, user.id)
        .await
        .map_err(|e| AppError::not_found_as(e, "Review not found or unauthorized"))?;

    Ok(Json(json!({ "message": "Review deleted successfully" })))
}
