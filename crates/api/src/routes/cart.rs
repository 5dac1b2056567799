//! Cart and checkout handlers (all authenticated).
//!
//! Adding a product puts it in the cart at quantity 1 and is a no-op if the
//! line already exists; quantity only ever changes through the explicit
//! update endpoint. Checkout converts the *selected* cart lines into an
//! order; unselected lines stay in the cart.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use techhub_core::{PaymentMethod, ProductId};

use crate::db::{CartRepository, CatalogRepository, OrderRepository};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{CartView, SelectedLine};
use crate::state::AppState;

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
}

/// Quantity update request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityRequest {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Checkout request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub selected_products: Vec<SelectedLine>,
    pub address: String,
    pub phone_number: String,
    pub payment_method: PaymentMethod,
}

/// Handle `POST /cart/add`.
pub async fn add(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<AddToCartRequest>,
) -> Result<impl IntoResponse> {
    if CatalogRepository::new(state.pool())
        .get_product(req.product_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    CartRepository::new(state.pool())
        .add_item(user.id, req.product_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Product added to cart" })),
    ))
}

/// Handle `PUT /cart/updatecart`.
pub async fn update_quantity(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<UpdateQuantityRequest>,
) -> Result<impl IntoResponse> {
    if req.quantity < 1 {
        return Err(AppError::BadRequest(
            "Quantity must be at least 1".to_string(),
        ));
    }

    CartRepository::new(state.pool())
        .update_quantity(user.id, req.product_id, req.quantity)
        .await
        .map_err(|e| AppError::not_found_as(e, "Cart item not found"))?;

    Ok(Json(json!({ "message": "Cart updated successfully" })))
}

/// Handle `DELETE /cart/remove/{productId}`.
pub async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(product_id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    CartRepository::new(state.pool())
        .remove_item(user.id, product_id)
        .await
        .map_err(|e| AppError::not_found_as(e, "Item not found in cart"))?;

    Ok(Json(json!({ "message": "Item removed from cart" })))
}

/// Handle `GET /cart/getcart`.
///
/// A user with no cart gets the empty shape, not a 404.
pub async fn get(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse> {
    let cart_items = CartRepository::new(state.pool())
        .lines_for_user(user.id)
        .await?;

    Ok(Json(json!({ "cart": CartView { cart_items } })))
}

/// Handle `POST /cart/placeorder`.
///
/// Converts the selected cart lines into an order (see
/// [`OrderRepository::place_order`] for the transaction). The response tells
/// cash buyers to pay on delivery; QR buyers get remittance instructions
/// naming the total and asking for their email in the remarks.
pub async fn place_order(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<impl IntoResponse> {
    if req.address.trim().is_empty() || req.phone_number.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Address and phone number are required".to_string(),
        ));
    }

    let order = OrderRepository::new(state.pool())
        .place_order(
            user.id,
            &req.selected_products,
            req.address.trim(),
            req.phone_number.trim(),
            req.payment_method,
        )
        .await?;

    tracing::info!(order_id = %order.id, user_id = %user.id, total = %order.total_amount, "order placed");

    let response = match req.payment_method {
        PaymentMethod::Cash => json!({
            "message": "Order placed successfully. Pay in cash upon delivery.",
            "orderId": order.id,
            "totalAmount": order.total_amount,
        }),
        PaymentMethod::Qr => json!({
            "message": "Order placed successfully. Awaiting QR payment confirmation.",
            "orderId": order.id,
            "totalAmount": order.total_amount,
            "instructions": format!(
                "Please scan the QR code and send the payment of {} {}. \
                 Add your email in the remarks for confirmation.",
                order.currency,
                order.total_amount.round_dp(2),
            ),
        }),
    };

    Ok(Json(response))
}
