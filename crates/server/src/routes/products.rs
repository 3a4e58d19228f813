//! Catalog route handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use mirakle_core::{CurrencyCode, Price, ProductId};

use crate::db::ProductRepository;
use crate::db::products::ProductInput;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::product::{Product, ProductVariant};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 24;
const MAX_PAGE_SIZE: i64 = 100;

/// Upper bound for a unit price; the column is NUMERIC(12,2).
fn max_price() -> Decimal {
    Decimal::new(999_999_999_999, 2) // 9,999,999,999.99
}

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// Request body for creating or updating a product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductBody {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub currency: CurrencyCode,
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

impl ProductBody {
    fn into_input(self) -> Result<ProductInput> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title is required".to_string()));
        }
        if self.price.is_sign_negative() {
            return Err(AppError::Validation("price cannot be negative".to_string()));
        }
        if self.price > max_price() {
            return Err(AppError::Validation("price is too large".to_string()));
        }

        Ok(ProductInput {
            title: self.title.trim().to_string(),
            description: self.description,
            price: Price::new(self.price, self.currency),
            category: self.category,
            images: self.images,
            variants: self.variants,
        })
    }
}

/// List products, newest first.
///
/// `GET /products?limit=&offset=`
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);

    let products = ProductRepository::new(state.pool())
        .list(limit, offset)
        .await?;

    Ok(Json(products))
}

/// Case-insensitive substring search.
///
/// `GET /products/search?q=`
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>> {
    let q = query.q.trim();
    if q.is_empty() {
        return Err(AppError::Validation("search query is required".to_string()));
    }

    let products = ProductRepository::new(state.pool()).search(q).await?;

    Ok(Json(products))
}

/// Get a product by ID.
///
/// `GET /products/{id}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id} not found")))?;

    Ok(Json(product))
}

/// Create a product.
///
/// `POST /products`
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<ProductBody>,
) -> Result<Json<Product>> {
    let input = body.into_input()?;
    let product = ProductRepository::new(state.pool()).create(&input).await?;

    tracing::info!(product_id = %product.id, "Product created");
    Ok(Json(product))
}

/// Replace a product's fields.
///
/// `PUT /products/{id}`
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
    Json(body): Json<ProductBody>,
) -> Result<Json<Product>> {
    let input = body.into_input()?;
    let product = ProductRepository::new(state.pool())
        .update(id, &input)
        .await?;

    Ok(Json(product))
}

/// Delete a product.
///
/// `DELETE /products/{id}`
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>> {
    let deleted = ProductRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("product {id} not found")));
    }

    Ok(Json(json!({ "message": "Product deleted" })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn body(title: &str, price: Decimal) -> ProductBody {
        ProductBody {
            title: title.to_string(),
            description: String::new(),
            price,
            currency: CurrencyCode::INR,
            category: "tools".to_string(),
            images: vec![],
            variants: vec![],
        }
    }

    #[test]
    fn test_into_input_trims_title() {
        let input = body("  Hammer  ", Decimal::new(499, 0)).into_input().unwrap();
        assert_eq!(input.title, "Hammer");
    }

    #[test]
    fn test_into_input_rejects_blank_title() {
        assert!(body("   ", Decimal::new(499, 0)).into_input().is_err());
    }

    #[test]
    fn test_into_input_rejects_negative_price() {
        assert!(body("Hammer", Decimal::new(-1, 0)).into_input().is_err());
    }

    #[test]
    fn test_into_input_rejects_oversized_price() {
        // Prices past the column bound fail validation instead of erroring
        // at the database.
        assert!(body("Hammer", Decimal::MAX).into_input().is_err());
        assert!(matches!(
            body("Hammer", max_price() + Decimal::new(1, 2)).into_input(),
            Err(AppError::Validation(_))
        ));
        assert!(body("Hammer", max_price()).into_input().is_ok());
    }
}
