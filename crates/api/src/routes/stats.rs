//! Dashboard statistics handlers.

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use techhub_core::OrderStatus;
use techhub_core::policy::Operation;

use crate::db::{CartRepository, CatalogRepository, OrderRepository, UserRepository};
use crate::error::Result;
use crate::middleware::{CurrentUser, authorize};
use crate::state::AppState;

/// Handle `GET /stats/adminstats` (admin).
///
/// Store-wide headline numbers plus an order count per lifecycle status,
/// shaped as label/value pairs the dashboard renders directly.
pub async fn admin_stats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse> {
    authorize(&user, Operation::ViewAdminStats)?;

    let pool = state.pool();
    let orders = OrderRepository::new(pool);

    let total_users = UserRepository::new(pool).count().await?;
    let catalog = CatalogRepository::new(pool);
    let total_products = catalog.count_products().await?;
    let total_categories = catalog.count_categories().await?;
    let total_orders = orders.count().await?;
    let total_earnings = orders.total_earnings().await?;

    let mut stats = vec![
        json!({ "label": "Total Users", "value": total_users }),
        json!({ "label": "Total Products", "value": total_products }),
        json!({ "label": "Total Categories", "value": total_categories }),
        json!({ "label": "Total Orders", "value": total_orders }),
        json!({ "label": "Total Earnings (NPR)", "value": total_earnings.round_dp(2) }),
    ];

    for status in OrderStatus::ALL {
        let count = orders.count_with_status(status).await?;
        stats.push(json!({ "label": format!("{status} Orders"), "value": count }));
    }

    Ok(Json(json!({ "stats": stats })))
}

/// Handle `GET /stats/customerstats` (authenticated).
pub async fn customer_stats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse> {
    let pool = state.pool();
    let orders = OrderRepository::new(pool);

    let total_orders = orders.count_for_user(user.id, None).await?;
    let pending_orders = orders
        .count_for_user(user.id, Some(OrderStatus::Pending))
        .await?;
    let total_spend = orders.paid_total_for_user(user.id).await?;
    let cart_items = CartRepository::new(pool).count_lines(user.id).await?;

    Ok(Json(json!({
        "stats": {
            "totalOrders": total_orders,
            "pendingOrders": pending_orders,
            "totalSpend": total_spend.round_dp(2),
            "cartItems": cart_items,
        }
    })))
}
