//! Order repository: checkout, cancellation, status changes, listings.
//!
//! Checkout is the one multi-entity transition in the system. Everything from
//! validating the cart through deleting the ordered cart lines happens inside
//! a single transaction, so a failure part-way (unknown product, insufficient
//! stock) leaves no partial order behind and the cart untouched.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use techhub_core::{OrderId, OrderStatus, PaymentMethod, ProductId, UserId, line_total};

use super::RepositoryError;
use crate::error::AppError;
use crate::models::{
    AdminOrderView, Order, OrderCustomer, OrderItemView, OrderView, SelectedLine,
};

const ORDER_COLUMNS: &str = "id, user_id, total_amount, address, phone_number, status, \
     payment_method, payment_status, currency, created_at, updated_at";

/// Failures of the order workflows, mapped onto the API error taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum OrderWorkflowError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Checkout called with an empty selection.
    #[error("no products selected")]
    EmptySelection,

    /// The user has no cart, or it holds no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// A selected product id does not exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// A selected product has fewer units in stock than ordered.
    #[error("insufficient stock for product {0}")]
    InsufficientStock(ProductId),

    /// The order exists but is past the point of customer cancellation.
    #[error("order is not pending")]
    NotCancellable,

    /// The order was cancelled; its status can no longer change.
    #[error("order is cancelled")]
    CancelledLocked,

    /// No such order.
    #[error("order not found")]
    NotFound,
}

impl From<OrderWorkflowError> for AppError {
    fn from(err: OrderWorkflowError) -> Self {
        match err {
            OrderWorkflowError::Repository(e) => Self::Database(e),
            OrderWorkflowError::Database(e) => Self::Database(e.into()),
            OrderWorkflowError::EmptySelection => {
                Self::BadRequest("No products selected for order".to_string())
            }
            OrderWorkflowError::EmptyCart => Self::BadRequest("Cart is empty".to_string()),
            OrderWorkflowError::ProductNotFound(id) => {
                Self::BadRequest(format!("Product with ID {id} not found"))
            }
            OrderWorkflowError::InsufficientStock(id) => {
                Self::BadRequest(format!("Insufficient stock for product {id}"))
            }
            OrderWorkflowError::NotCancellable => {
                Self::BadRequest("Order can only be cancelled if it's pending".to_string())
            }
            OrderWorkflowError::CancelledLocked => {
                Self::BadRequest("Cannot update a cancelled order".to_string())
            }
            OrderWorkflowError::NotFound => Self::NotFound("Order not found".to_string()),
        }
    }
}

/// Repository for order records and the checkout workflow.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Convert the selected cart lines into an order.
    ///
    /// Inside one transaction: verifies the cart is non-empty, snapshots each
    /// selected product's price into an order line, decrements stock (guarded,
    /// so overselling aborts the whole checkout), accumulates the total,
    /// writes the order with the payment-method-dependent initial state, and
    /// deletes exactly the ordered lines from the cart. Unselected lines stay.
    ///
    /// # Errors
    ///
    /// See [`OrderWorkflowError`] for the failure cases; any error rolls the
    /// transaction back.
    pub async fn place_order(
        &self,
        user_id: UserId,
        selection: &[SelectedLine],
        address: &str,
        phone_number: &str,
        payment_method: PaymentMethod,
    ) -> Result<Order, OrderWorkflowError> {
        if selection.is_empty() {
            return Err(OrderWorkflowError::EmptySelection);
        }

        let mut tx = self.pool.begin().await?;

        let cart_id = sqlx::query_scalar::<_, i32>(
            "SELECT c.id FROM carts c
             WHERE c.user_id = $1
               AND EXISTS (SELECT 1 FROM cart_items ci WHERE ci.cart_id = c.id)",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(OrderWorkflowError::EmptyCart)?;

        let mut total_amount = Decimal::ZERO;
        let mut lines: Vec<(ProductId, i32, Decimal, Decimal)> = Vec::with_capacity(selection.len());

        for selected in selection {
            let unit_price = sqlx::query_scalar::<_, Decimal>(
                "SELECT price FROM products WHERE id = $1 FOR UPDATE",
            )
            .bind(selected.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(OrderWorkflowError::ProductNotFound(selected.product_id))?;

            let quantity = i32::try_from(selected.quantity)
                .map_err(|_| OrderWorkflowError::InsufficientStock(selected.product_id))?;

            let updated = sqlx::query(
                "UPDATE products
                 SET in_stock = in_stock - $2, total_sold = total_sold + $2
                 WHERE id = $1 AND in_stock >= $2",
            )
            .bind(selected.product_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                return Err(OrderWorkflowError::InsufficientStock(selected.product_id));
            }

            let total_price = line_total(unit_price, selected.quantity);
            total_amount += total_price;
            lines.push((selected.product_id, quantity, unit_price, total_price));
        }

        let (status, payment_status) = payment_method.initial_order_state();

        let order = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders (user_id, total_amount, address, phone_number, status,
                 payment_method, payment_status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(total_amount)
        .bind(address)
        .bind(phone_number)
        .bind(status)
        .bind(payment_method)
        .bind(payment_status)
        .fetch_one(&mut *tx)
        .await?;

        for (product_id, quantity, price, total_price) in &lines {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity, price, total_price)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(order.id)
            .bind(product_id)
            .bind(quantity)
            .bind(price)
            .bind(total_price)
            .execute(&mut *tx)
            .await?;
        }

        let ordered_ids: Vec<i32> = selection.iter().map(|s| s.product_id.as_i32()).collect();
        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = ANY($2)")
            .bind(cart_id)
            .bind(&ordered_ids)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(order)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Cancel a pending order, restoring the stock it reserved.
    ///
    /// # Errors
    ///
    /// Returns `OrderWorkflowError::NotFound` if no such order exists and
    /// `OrderWorkflowError::NotCancellable` unless the order is `Pending`.
    pub async fn cancel(&self, order_id: OrderId) -> Result<Order, OrderWorkflowError> {
        let mut tx = self.pool.begin().await?;

        let order = lock_order(&mut tx, order_id).await?;

        if !order.status.is_cancellable() {
            return Err(OrderWorkflowError::NotCancellable);
        }

        sqlx::query(
            "UPDATE products p
             SET in_stock = p.in_stock + oi.quantity,
                 total_sold = p.total_sold - oi.quantity
             FROM order_items oi
             WHERE oi.order_id = $1 AND oi.product_id = p.id",
        )
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order_id)
        .bind(OrderStatus::Cancelled)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(order)
    }

    /// Overwrite an order's status (admin operation).
    ///
    /// Any transition between non-terminal states is allowed, in either
    /// direction. Cancelled orders are locked.
    ///
    /// # Errors
    ///
    /// Returns `OrderWorkflowError::NotFound` if no such order exists and
    /// `OrderWorkflowError::CancelledLocked` if it was cancelled.
    pub async fn set_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, OrderWorkflowError> {
        let mut tx = self.pool.begin().await?;

        let order = lock_order(&mut tx, order_id).await?;

        if !order.status.accepts_status_change() {
            return Err(OrderWorkflowError::CancelledLocked);
        }

        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order_id)
        .bind(status)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(order)
    }

    // =========================================================================
    // Listings
    // =========================================================================

    /// A user's orders with resolved lines, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn orders_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderView>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let mut items = self.items_by_order(&orders).await?;

        Ok(orders
            .into_iter()
            .map(|order| {
                let order_items = items.remove(&order.id).unwrap_or_default();
                OrderView { order, order_items }
            })
            .collect())
    }

    /// Every order in the store with buyer and lines resolved, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn all_orders(&self) -> Result<Vec<AdminOrderView>, RepositoryError> {
        let rows = sqlx::query_as::<_, AdminOrderRow>(
            "SELECT o.id, o.user_id, o.total_amount, o.address, o.phone_number, o.status,
                    o.payment_method, o.payment_status, o.currency, o.created_at, o.updated_at,
                    u.name, u.email
             FROM orders o
             JOIN users u ON u.id = o.user_id
             ORDER BY o.created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        let orders: Vec<Order> = rows.iter().map(|r| r.order.clone()).collect();
        let mut items = self.items_by_order(&orders).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let order_items = items.remove(&row.order.id).unwrap_or_default();
                AdminOrderView {
                    order: row.order,
                    user: row.user,
                    order_items,
                }
            })
            .collect())
    }

    /// Resolved line views for a set of orders, grouped by order id.
    async fn items_by_order(
        &self,
        orders: &[Order],
    ) -> Result<HashMap<OrderId, Vec<OrderItemView>>, RepositoryError> {
        let order_ids: Vec<i32> = orders.iter().map(|o| o.id.as_i32()).collect();

        let rows = sqlx::query_as::<_, ItemViewRow>(
            "SELECT oi.order_id, oi.product_id, p.product_name, p.images, oi.quantity,
                    oi.price, oi.total_price
             FROM order_items oi
             JOIN products p ON p.id = oi.product_id
             WHERE oi.order_id = ANY($1)
             ORDER BY oi.id ASC",
        )
        .bind(&order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut grouped: HashMap<OrderId, Vec<OrderItemView>> = HashMap::new();
        for row in rows {
            grouped.entry(row.order_id).or_default().push(row.item);
        }

        Ok(grouped)
    }

    // =========================================================================
    // Stats
    // =========================================================================

    /// Count all orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Count orders in a given status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_with_status(&self, status: OrderStatus) -> Result<i64, RepositoryError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE status = $1")
                .bind(status)
                .fetch_one(self.pool)
                .await?;

        Ok(count)
    }

    /// Sum of `total_amount` across all orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn total_earnings(&self) -> Result<Decimal, RepositoryError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(total_amount), 0) FROM orders",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(total)
    }

    /// Count a user's orders, optionally restricted to one status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for_user(
        &self,
        user_id: UserId,
        status: Option<OrderStatus>,
    ) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders
             WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)",
        )
        .bind(user_id)
        .bind(status.map(|s| s.to_string()))
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Sum of a user's paid order totals.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn paid_total_for_user(&self, user_id: UserId) -> Result<Decimal, RepositoryError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(total_amount), 0) FROM orders
             WHERE user_id = $1 AND payment_status = 'Paid'",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(total)
    }
}

/// Lock an order row for the duration of a transaction.
async fn lock_order(
    tx: &mut Transaction<'_, Postgres>,
    order_id: OrderId,
) -> Result<Order, OrderWorkflowError> {
    sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
    ))
    .bind(order_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(OrderWorkflowError::NotFound)
}

/// Row shape for the admin listing join.
#[derive(sqlx::FromRow)]
struct AdminOrderRow {
    #[sqlx(flatten)]
    order: Order,
    #[sqlx(flatten)]
    user: OrderCustomer,
}

/// Row shape for grouping item views by order.
#[derive(sqlx::FromRow)]
struct ItemViewRow {
    order_id: OrderId,
    #[sqlx(flatten)]
    item: OrderItemView,
}
