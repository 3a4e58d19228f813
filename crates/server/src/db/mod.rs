//! Database operations for the Mirakle `PostgreSQL` database.
//!
//! One repository per table, in the style of a thin data-access layer over
//! `sqlx`. Queries use the runtime-checked API so the workspace builds
//! without a live database.
//!
//! ## Tables
//!
//! - `users` - Accounts (argon2 password hash, OTP-verified email flag)
//! - `auth_token` - Server-side bearer tokens
//! - `product` - Catalog entries (variants and image URLs as JSONB)
//! - `cart` - One cart document per user (items as JSONB)
//! - `address` - User shipping addresses
//! - `banner` - Promotional banners (hosted image URLs)
//! - `contact_message` - Contact form submissions
//! - `payment_order` - Orders created at the payment gateway
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p mirakle-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod addresses;
pub mod banners;
pub mod carts;
pub mod messages;
pub mod orders;
pub mod products;
pub mod users;

pub use addresses::AddressRepository;
pub use banners::BannerRepository;
pub use carts::CartRepository;
pub use messages::MessageRepository;
pub use orders::PaymentOrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
