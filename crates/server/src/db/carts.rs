//! Cart repository: fetch, save, clear.
//!
//! The cart is one row per user with the line items as a JSONB document, so
//! a save replaces the whole item list atomically. There is deliberately no
//! cross-request concurrency control: two racing reconciles for the same
//! user each read, merge, and write back, and the second write wins (an
//! accepted lost-update, see DESIGN.md).

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use mirakle_core::{CartId, UserId};

use super::RepositoryError;
use crate::models::cart::{Cart, CartLineItem};

#[derive(sqlx::FromRow)]
struct CartRow {
    id: CartId,
    user_id: UserId,
    items: Json<Vec<CartLineItem>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            items: row.items.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the stored cart for a user.
    ///
    /// Absence is a normal state, not an error: a user who has never
    /// reconciled simply has no row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn fetch(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            SELECT id, user_id, items, created_at, updated_at
            FROM cart
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Cart::from))
    }

    /// Persist an item list as the user's cart (insert if new, update if
    /// existing) and return the stored cart.
    ///
    /// Both reconcile and replace end here; the difference between them is
    /// entirely in how the caller computed `items`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails (including
    /// persistence-layer rejections of the document).
    pub async fn save(
        &self,
        user_id: UserId,
        items: &[CartLineItem],
    ) -> Result<Cart, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            INSERT INTO cart (user_id, items)
            VALUES ($1, $2)
            ON CONFLICT (user_id)
            DO UPDATE SET items = EXCLUDED.items, updated_at = NOW()
            RETURNING id, user_id, items, created_at, updated_at
            ",
        )
        .bind(user_id)
        .bind(Json(items))
        .fetch_one(self.pool)
        .await?;

        Ok(Cart::from(row))
    }

    /// Delete the user's cart row entirely.
    ///
    /// Idempotent: returns `false` (not an error) when there was nothing to
    /// delete.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, user_id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
