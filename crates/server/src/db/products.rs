//! Product repository for catalog operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use mirakle_core::{CurrencyCode, Price, ProductId};

use super::RepositoryError;
use crate::models::product::{Product, ProductVariant};

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    title: String,
    description: String,
    price: Decimal,
    currency: String,
    category: String,
    images: Json<Vec<String>>,
    variants: Json<Vec<ProductVariant>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let currency = CurrencyCode::parse(&row.currency).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("unknown currency code: {}", row.currency))
        })?;

        Ok(Self {
            id: row.id,
            title: row.title,
            description: row.description,
            price: Price::new(row.price, currency),
            category: row.category,
            images: row.images.0,
            variants: row.variants.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Fields for creating or replacing a product.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub images: Vec<String>,
    pub variants: Vec<ProductVariant>,
}

const PRODUCT_COLUMNS: &str =
    "id, title, description, price, currency, category, images, variants, created_at, updated_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM product
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Case-insensitive substring search on title and category.
    ///
    /// Matching is delegated to the database via ILIKE; the query string is
    /// a bound parameter, never interpolated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, RepositoryError> {
        let pattern = like_pattern(query);

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM product
            WHERE title ILIKE $1 OR category ILIKE $1
            ORDER BY created_at DESC
            "
        ))
        .bind(pattern)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            INSERT INTO product (title, description, price, currency, category, images, variants)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.price.amount)
        .bind(input.price.currency_code.code())
        .bind(&input.category)
        .bind(Json(&input.images))
        .bind(Json(&input.variants))
        .fetch_one(self.pool)
        .await?;

        Product::try_from(row)
    }

    /// Replace a product's fields wholesale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            UPDATE product
            SET title = $2, description = $3, price = $4, currency = $5,
                category = $6, images = $7, variants = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.price.amount)
        .bind(input.price.currency_code.code())
        .bind(&input.category)
        .bind(Json(&input.images))
        .bind(Json(&input.variants))
        .fetch_optional(self.pool)
        .await?;

        row.map_or(Err(RepositoryError::NotFound), Product::try_from)
    }

    /// Delete a product.
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Escape LIKE metacharacters and wrap the query in wildcards.
///
/// Backslash is the escape character, so it must be doubled before `%` and
/// `_` are escaped.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn test_like_pattern_wraps_in_wildcards() {
        assert_eq!(like_pattern("hammer"), "%hammer%");
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_like_pattern_escapes_backslash_first() {
        // A literal backslash must not turn the following escape into a
        // doubled backslash plus live wildcard.
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
        assert_eq!(like_pattern("\\%"), "%\\\\\\%%");
    }
}
