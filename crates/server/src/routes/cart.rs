//! Cart route handlers.
//!
//! The cart store has four operations: fetch, reconcile (merge), replace
//! (overwrite), and clear. Reconcile and replace intentionally differ --
//! reconcile accumulates quantities into the stored cart, replace discards
//! it -- and callers must know which they need.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use crate::db::CartRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::cart::{self, Cart, CartLineItem, IncomingLineItem};
use crate::state::AppState;

/// Request body for reconcile and replace.
#[derive(Debug, Deserialize)]
pub struct CartItemsBody {
    #[serde(default)]
    pub items: Vec<IncomingLineItem>,
}

/// Response for `GET /cart`.
///
/// A user with no stored cart gets an empty item list, not an error:
/// absence is a normal state.
#[derive(Debug, Serialize)]
pub struct CartContents {
    pub items: Vec<CartLineItem>,
}

/// Map a stored cart (or its absence) to the item list callers see.
///
/// Absent and cleared carts both read back as an empty list.
fn stored_items(cart: Option<Cart>) -> Vec<CartLineItem> {
    cart.map(|c| c.items).unwrap_or_default()
}

/// Confirmation body for a clear, whether or not a cart row existed.
fn clear_confirmation(_removed: bool) -> Value {
    json!({ "message": "Cart cleared" })
}

/// Get the current user's cart.
///
/// `GET /cart`
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CartContents>> {
    let cart = CartRepository::new(state.pool()).fetch(user.id).await?;

    Ok(Json(CartContents {
        items: stored_items(cart),
    }))
}

/// Reconcile incoming items into the stored cart.
///
/// `POST /cart` with body `{ "items": [...] }`
///
/// Loads the existing cart (or starts an empty one), merges each incoming
/// item by `(productId, variantId)` identity, and persists the result.
/// Quantities accumulate on repeated posts of the same line.
#[instrument(skip(state, user, body), fields(user_id = %user.id, incoming = body.items.len()))]
pub async fn reconcile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CartItemsBody>,
) -> Result<Json<Cart>> {
    cart::validate_items(&body.items).map_err(crate::error::AppError::Validation)?;

    let repo = CartRepository::new(state.pool());
    let mut items = stored_items(repo.fetch(user.id).await?);

    cart::merge_items(&mut items, body.items);
    let cart = repo.save(user.id, &items).await?;

    Ok(Json(cart))
}

/// Replace the cart contents wholesale.
///
/// `PUT /cart` with body `{ "items": [...] }`
///
/// The stored cart becomes exactly the given list (quantity defaulted to 1
/// where unspecified); prior contents are discarded. Duplicate identities
/// in the input collapse into one line with the summed quantity so the
/// one-line-per-identity invariant holds.
#[instrument(skip(state, user, body), fields(user_id = %user.id, incoming = body.items.len()))]
pub async fn replace(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CartItemsBody>,
) -> Result<Json<Cart>> {
    cart::validate_items(&body.items).map_err(crate::error::AppError::Validation)?;

    let mut items = Vec::with_capacity(body.items.len());
    cart::merge_items(&mut items, body.items);

    let cart = CartRepository::new(state.pool())
        .save(user.id, &items)
        .await?;

    Ok(Json(cart))
}

/// Delete the current user's cart.
///
/// `DELETE /cart`
///
/// Idempotent: clearing an absent cart succeeds silently.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    let removed = CartRepository::new(state.pool()).clear(user.id).await?;

    Ok(Json(clear_confirmation(removed)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mirakle_core::{CartId, ProductId, UserId, VariantId};

    fn line(product: i32, variant: Option<i32>, quantity: u32) -> CartLineItem {
        CartLineItem {
            product_id: ProductId::from(product),
            variant_id: variant.map(VariantId::from),
            quantity,
        }
    }

    fn stored_cart(items: Vec<CartLineItem>) -> Cart {
        let now = chrono::Utc::now();
        Cart {
            id: CartId::from(1),
            user_id: UserId::from(7),
            items,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_absent_cart_reads_as_empty_list() {
        assert!(stored_items(None).is_empty());
    }

    #[test]
    fn test_present_cart_items_pass_through() {
        let items = vec![line(1, Some(2), 3), line(4, None, 1)];
        assert_eq!(stored_items(Some(stored_cart(items.clone()))), items);
    }

    #[test]
    fn test_reconcile_onto_absent_cart_starts_empty() {
        // First reconcile for a user: merge runs against an empty list, so
        // the result is exactly the incoming items with defaulted quantity.
        let mut items = stored_items(None);
        cart::merge_items(
            &mut items,
            vec![IncomingLineItem {
                product_id: ProductId::from(9),
                variant_id: Some(VariantId::from(2)),
                quantity: None,
            }],
        );
        assert_eq!(items, vec![line(9, Some(2), 1)]);
    }

    #[test]
    fn test_clear_succeeds_without_stored_cart() {
        // Clearing an absent cart deletes zero rows but still confirms.
        assert_eq!(clear_confirmation(false), clear_confirmation(true));
        assert_eq!(
            clear_confirmation(false),
            json!({ "message": "Cart cleared" })
        );
    }
}
