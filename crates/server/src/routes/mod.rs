//! HTTP route handlers for the Mirakle API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database)
//!
//! # Catalog (public reads)
//! GET    /products             - Product listing
//! GET    /products/search      - Substring search
//! GET    /products/{id}        - Product detail
//! POST   /products             - Create product (auth)
//! PUT    /products/{id}        - Update product (auth)
//! DELETE /products/{id}        - Delete product (auth)
//!
//! # Cart (auth)
//! GET    /cart                 - Fetch cart contents
//! POST   /cart                 - Reconcile items into the cart
//! PUT    /cart                 - Replace cart contents
//! DELETE /cart                 - Clear the cart
//!
//! # Auth
//! POST /auth/register          - Create account, send OTP
//! POST /auth/verify            - Confirm signup OTP
//! POST /auth/resend            - Re-send signup OTP
//! POST /auth/login             - Exchange credentials for a token
//! POST /auth/logout            - Revoke the presented token
//! POST /auth/forgot-password   - Send password reset OTP
//! POST /auth/reset-password    - Set new password with OTP
//!
//! # Account (auth)
//! GET    /account              - Profile
//! GET    /account/addresses    - Address list
//! POST   /account/addresses    - Add address
//! PUT    /account/addresses/{id}    - Update address
//! DELETE /account/addresses/{id}    - Delete address
//! GET    /account/locate       - Reverse-geocode coordinates
//!
//! # Banners
//! GET    /banners              - Active banners (public)
//! POST   /banners              - Upload banner (auth, multipart)
//! DELETE /banners/{id}         - Delete banner (auth)
//!
//! # Contact
//! POST /contact                - Submit contact form (public)
//! GET  /contact                - List submissions (auth)
//!
//! # Orders (auth)
//! POST /orders                 - Create payment order from cart
//! GET  /orders                 - Order history
//! ```

pub mod account;
pub mod auth;
pub mod banners;
pub mod cart;
pub mod contact;
pub mod orders;
pub mod products;

use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/search", get(products::search))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(cart::show)
            .post(cart::reconcile)
            .put(cart::replace)
            .delete(cart::clear),
    )
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/verify", post(auth::verify))
        .route("/resend", post(auth::resend))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::profile))
        .route(
            "/addresses",
            get(account::list_addresses).post(account::create_address),
        )
        .route(
            "/addresses/{id}",
            axum::routing::put(account::update_address).delete(account::delete_address),
        )
        .route("/locate", get(account::locate))
}

/// Create the banner routes router.
pub fn banner_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(banners::index).post(banners::create))
        .route("/{id}", axum::routing::delete(banners::destroy))
}

/// Create the contact routes router.
pub fn contact_routes() -> Router<AppState> {
    Router::new().route("/", post(contact::submit).get(contact::index))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new().route("/", post(orders::create).get(orders::index))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/auth", auth_routes())
        .nest("/account", account_routes())
        .nest("/banners", banner_routes())
        .nest("/contact", contact_routes())
        .nest("/orders", order_routes())
}
