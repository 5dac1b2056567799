//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                        - Liveness check
//! GET    /health/ready                  - Readiness check (database ping)
//!
//! # Auth (public)
//! POST   /auth/signup                   - Start registration, email an OTP
//! POST   /auth/verify-otp               - Verify OTP, create the user, log in
//! POST   /auth/login                    - Credential login
//!
//! # Passwords
//! POST   /sendotp                       - Email a password-reset OTP (public)
//! PUT    /resetpassword                 - Reset password with OTP (public)
//! PUT    /changepassword                - Change password (authenticated)
//!
//! # Catalog (public reads, admin writes)
//! POST   /product                       - Create product
//! GET    /products                      - List products (paginated, filtered)
//! GET    /product/{id}                  - Product detail
//! PUT    /product/{id}                  - Update product
//! DELETE /product/{id}                  - Delete product
//! POST   /category                      - Create category
//! GET    /categories                    - List categories with product counts
//! GET    /category/{id}                 - Category detail
//! PUT    /category/{id}                 - Update category
//! DELETE /category/{id}                 - Delete category
//!
//! # Cart (authenticated)
//! POST   /cart/add                      - Add product (quantity 1, idempotent)
//! PUT    /cart/updatecart               - Overwrite a line's quantity
//! DELETE /cart/remove/{productId}       - Remove a line
//! GET    /cart/getcart                  - Cart with resolved products
//! POST   /cart/placeorder               - Checkout selected lines
//!
//! # Orders
//! GET    /orders/myorders               - Own orders (authenticated)
//! GET    /orders/getallorder            - All orders (admin)
//! PUT    /orders/change-status/{orderId} - Change status (admin)
//! DELETE /orders/cancel/{orderId}       - Cancel a pending order (authenticated)
//!
//! # Reviews
//! POST   /reviews/add                   - Add review (authenticated)
//! GET    /reviews/product/{productId}   - Reviews for a product (public)
//! GET    /reviews/myreviews             - Own reviews (authenticated)
//! PUT    /reviews/{reviewId}            - Update own review
//! DELETE /reviews/{reviewId}            - Delete own review
//!
//! # Users
//! GET    /customers                     - List users (admin)
//! GET    /customer/{email}              - User by email (authenticated)
//! PUT    /user/{email}                  - Update own profile (owner-only)
//! PUT    /make-admin                    - Promote to admin (admin)
//!
//! # Stats
//! GET    /stats/adminstats              - Store dashboard (admin)
//! GET    /stats/customerstats           - Personal dashboard (authenticated)
//! ```

pub mod auth;
pub mod cart;
pub mod categories;
pub mod orders;
pub mod password;
pub mod products;
pub mod reviews;
pub mod stats;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/verify-otp", post(auth::verify_otp))
        .route("/login", post(auth::login))
}

/// Create the password routes router (mounted at the root).
pub fn password_routes() -> Router<AppState> {
    Router::new()
        .route("/sendotp", post(password::send_otp))
        .route("/resetpassword", put(password::reset_password))
        .route("/changepassword", put(password::change_password))
}

/// Create the catalog routes router (mounted at the root).
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/product", post(products::create))
        .route("/products", get(products::list))
        .route(
            "/product/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/category", post(categories::create))
        .route("/categories", get(categories::list))
        .route(
            "/category/{id}",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/updatecart", put(cart::update_quantity))
        .route("/remove/{productId}", delete(cart::remove))
        .route("/getcart", get(cart::get))
        .route("/placeorder", post(cart::place_order))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/myorders", get(orders::my_orders))
        .route("/getallorder", get(orders::all_orders))
        .route("/change-status/{orderId}", put(orders::change_status))
        .route("/cancel/{orderId}", delete(orders::cancel))
}

/// Create the review routes router.
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(reviews::add))
        .route("/product/{productId}", get(reviews::for_product))
        .route("/myreviews", get(reviews::mine))
        .route(
            "/{reviewId}",
            put(reviews::update).delete(reviews::delete),
        )
}

/// Create the user routes router (mounted at the root).
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(users::list_customers))
        .route("/customer/{email}", get(users::get_customer))
        .route("/user/{email}", put(users::update_user))
        .route("/make-admin", put(users::make_admin))
}

/// Create the stats routes router.
pub fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/adminstats", get(stats::admin_stats))
        .route("/customerstats", get(stats::customer_stats))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .merge(password_routes())
        .merge(catalog_routes())
        .merge(user_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
        .nest("/reviews", review_routes())
        .nest("/stats", stats_routes())
}
