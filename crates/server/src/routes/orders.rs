//! Payment order handlers.
//!
//! Order totals are computed server-side from the stored cart and current
//! catalog prices; client-submitted amounts are never trusted.

use axum::Json;
use axum::extract::State;
use rust_decimal::Decimal;
use tracing::instrument;
use uuid::Uuid;

use mirakle_core::Price;

use crate::db::{CartRepository, PaymentOrderRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::order::PaymentOrder;
use crate::state::AppState;

/// Sum line totals, insisting on a single currency.
///
/// Decimal `*` and `+` panic on overflow, so the checked variants feed the
/// error path instead.
fn total_price(lines: &[(Price, u32)]) -> std::result::Result<Price, String> {
    let overflow = || "cart total is too large".to_string();

    let mut iter = lines.iter();
    let Some((first, qty)) = iter.next() else {
        return Err("cart is empty".to_string());
    };

    let mut total = first
        .amount
        .checked_mul(Decimal::from(*qty))
        .ok_or_else(overflow)?;
    for (price, qty) in iter {
        if price.currency_code != first.currency_code {
            return Err("cart mixes currencies".to_string());
        }
        let line = price
            .amount
            .checked_mul(Decimal::from(*qty))
            .ok_or_else(overflow)?;
        total = total.checked_add(line).ok_or_else(overflow)?;
    }

    Ok(Price::new(total, first.currency_code))
}

/// Create a payment order for the current cart.
///
/// `POST /orders`
///
/// Fetches the cart, prices every line against the catalog, creates an
/// order at the gateway, and records it locally. A cart line whose product
/// no longer exists fails the whole order.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<PaymentOrder>> {
    let items = CartRepository::new(state.pool())
        .fetch(user.id)
        .await?
        .map(|c| c.items)
        .unwrap_or_default();
    if items.is_empty() {
        return Err(AppError::Validation("cart is empty".to_string()));
    }

    let products = ProductRepository::new(state.pool());
    let mut lines = Vec::with_capacity(items.len());
    for item in &items {
        let product = products.get(item.product_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("product {} not found", item.product_id))
        })?;
        lines.push((product.price, item.quantity));
    }

    let amount = total_price(&lines).map_err(AppError::Validation)?;
    let receipt = format!("rcpt_{}", Uuid::new_v4().simple());

    let gateway_order = state.payments().create_order(amount, &receipt).await?;
    let order = PaymentOrderRepository::new(state.pool())
        .create(user.id, &gateway_order.id, amount, &receipt)
        .await?;

    tracing::info!(
        order_id = %order.id,
        gateway_order_id = %order.gateway_order_id,
        "Payment order created"
    );
    Ok(Json(order))
}

/// List the current user's payment orders.
///
/// `GET /orders`
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<PaymentOrder>>> {
    let orders = PaymentOrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(Json(orders))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mirakle_core::CurrencyCode;

    fn inr(units: i64) -> Price {
        Price::new(Decimal::new(units, 0), CurrencyCode::INR)
    }

    #[test]
    fn test_total_price_sums_lines() {
        let total = total_price(&[(inr(499), 2), (inr(1200), 1)]).unwrap();
        assert_eq!(total.amount, Decimal::new(2198, 0));
        assert_eq!(total.currency_code, CurrencyCode::INR);
    }

    #[test]
    fn test_total_price_empty_cart() {
        assert!(total_price(&[]).is_err());
    }

    #[test]
    fn test_total_price_rejects_mixed_currencies() {
        let usd = Price::new(Decimal::new(10, 0), CurrencyCode::USD);
        assert!(total_price(&[(inr(499), 1), (usd, 1)]).is_err());
    }

    #[test]
    fn test_total_price_overflow_is_an_error_not_a_panic() {
        let huge = Price::new(Decimal::MAX, CurrencyCode::INR);
        assert!(total_price(&[(huge, 2)]).is_err());
        assert!(total_price(&[(huge, 1), (huge, 1)]).is_err());
    }
}
