//! Order lifecycle handlers.
//!
//! Customers see and cancel their own orders; admins list everything and move
//! orders between statuses. `Cancelled` is terminal either way.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use techhub_core::{OrderId, OrderStatus};
use techhub_core::policy::Operation;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::{CurrentUser, authorize};
use crate::state::AppState;

/// Status change request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusRequest {
    pub status: String,
}

/// Handle `GET /orders/myorders`.
///
/// 404 when the user has never ordered, matching the SPA's empty-state
/// handling.
pub async fn my_orders(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool())
        .orders_for_user(user.id)
        .await?;

    if orders.is_empty() {
        return Err(AppError::NotFound("No orders found".to_string()));
    }

    Ok(Json(json!({ "success": true, "orders": orders })))
}

/// Handle `GET /orders/getallorder` (admin).
pub async fn all_orders(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse> {
    authorize(&user, Operation::ViewAllOrders)?;

    let orders = OrderRepository::new(state.pool()).all_orders().await?;

    Ok(Json(json!({
        "message": "Orders fetched successfully",
        "orders": orders,
    })))
}

/// Handle `PUT /orders/change-status/{orderId}` (admin).
///
/// The submitted status must be one of the five lifecycle values; the parse
/// failure is the caller's 400, not a 422 from the deserializer, so the SPA
/// sees the same message shape as every other validation error.
pub async fn change_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(order_id): Path<OrderId>,
    Json(req): Json<ChangeStatusRequest>,
) -> Result<impl IntoResponse> {
    authorize(&user, Operation::ChangeOrderStatus)?;

    let status: OrderStatus = req
        .status
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid status update".to_string()))?;

    let order = OrderRepository::new(state.pool())
        .set_status(order_id, status)
        .await?;

    tracing::info!(order_id = %order.id, %status, "order status changed");

    Ok(Json(json!({
        "message": format!("Order status updated to {status}"),
        "order": order,
    })))
}

/// Handle `DELETE /orders/cancel/{orderId}`.
///
/// Only `Pending` orders qualify; cancellation returns each line's quantity
/// to the product's stock.
pub async fn cancel(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(order_id): Path<OrderId>,
) -> Result<impl IntoResponse> {
    let order = OrderRepository::new(state.pool()).cancel(order_id).await?;

    tracing::info!(order_id = %order.id, cancelled_by = %user.id, "order cancelled");

    Ok(Json(json!({
        "message": "Order cancelled successfully",
        "order": order,
    })))
}
