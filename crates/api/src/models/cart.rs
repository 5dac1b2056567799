//! Cart models.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use techhub_core::{CartId, ProductId, UserId};

/// A user's cart. At most one row per user.
///
/// Lines live in `cart_items`, one row per (cart, product); the API only
/// ever surfaces them resolved as [`CartLineView`]s.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
}

/// A cart line with its product resolved for display.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub images: Vec<String>,
    pub in_stock: i32,
    pub quantity: i32,
}

/// The cart as returned by `GET /cart/getcart`.
///
/// A user with no cart (or an empty one) gets the empty shape, not a 404 -
/// "no cart yet" is a normal state, not an error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub cart_items: Vec<CartLineView>,
}

impl CartView {
    /// The empty-cart shape.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            cart_items: Vec::new(),
        }
    }
}
