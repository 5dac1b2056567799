//! Domain models and API payloads.
//!
//! Row structs derive `sqlx::FromRow` and map 1:1 onto tables; view structs
//! are the projections the API returns (with related entities resolved);
//! `*Input`/`*Update` structs are the explicit allow-lists of fields a client
//! may set. Request/response JSON is camelCase throughout.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod review;
pub mod user;

pub use cart::{Cart, CartLineView, CartView};
pub use catalog::{
    Category, CategoryInput, CategoryWithCount, Product, ProductInput, Specifications,
};
pub use order::{AdminOrderView, Order, OrderCustomer, OrderItemView, OrderView, SelectedLine};
pub use review::{MyReviewView, Review, ReviewView};
pub use user::{PasswordResetOtp, PendingRegistration, User, UserProfile, UserUpdate};
