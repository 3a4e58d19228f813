//! Cart domain types and reconcile semantics.
//!
//! A cart is one document per user: an ordered list of line items keyed by
//! `(product_id, variant_id)`. The merge rules here are the heart of the
//! cart store; persistence lives in [`crate::db::carts`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mirakle_core::{CartId, ProductId, UserId, VariantId};

/// One entry in a cart: a product variant and a quantity.
///
/// `variant_id` is `None` for legacy items added before sizes existed; a
/// legacy line only ever merges with another legacy line for the same
/// product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
    pub quantity: u32,
}

impl CartLineItem {
    /// The identity a line is merged on.
    #[must_use]
    pub const fn identity(&self) -> (ProductId, Option<VariantId>) {
        (self.product_id, self.variant_id)
    }
}

/// An incoming line item from a reconcile or replace request.
///
/// Quantity is optional on the wire and defaults to 1.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingLineItem {
    pub product_id: ProductId,
    #[serde(default)]
    pub variant_id: Option<VariantId>,
    #[serde(default)]
    pub quantity: Option<u32>,
}

impl IncomingLineItem {
    /// Effective quantity, defaulting to 1 when unspecified.
    #[must_use]
    pub fn effective_quantity(&self) -> u32 {
        self.quantity.unwrap_or(1)
    }

    /// Convert to a stored line with the quantity default applied.
    #[must_use]
    pub fn into_line(self) -> CartLineItem {
        CartLineItem {
            quantity: self.quantity.unwrap_or(1),
            product_id: self.product_id,
            variant_id: self.variant_id,
        }
    }
}

/// A user's persistent cart (domain type).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub items: Vec<CartLineItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Merge incoming items into an existing item list (reconcile semantics).
///
/// For each incoming item, if a line with the same `(product_id,
/// variant_id)` identity exists its quantity is increased by the incoming
/// quantity (defaulted to 1); otherwise a new line is appended. Quantities
/// only accumulate: two reconciles of the same line yield its summed
/// quantity, so reconcile is deliberately not idempotent. Lines that match
/// nothing incoming are left untouched.
pub fn merge_items(items: &mut Vec<CartLineItem>, incoming: Vec<IncomingLineItem>) {
    for entry in incoming {
        let identity = (entry.product_id, entry.variant_id);
        match items.iter_mut().find(|line| line.identity() == identity) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(entry.effective_quantity());
            }
            None => items.push(entry.into_line()),
        }
    }
}

/// Validate an incoming item list before it touches the stored cart.
///
/// A quantity of zero is rejected rather than treated as a removal: the
/// reconcile path has no decrement operation.
pub fn validate_items(incoming: &[IncomingLineItem]) -> Result<(), String> {
    for entry in incoming {
        if entry.quantity == Some(0) {
            return Err(format!(
                "quantity must be a positive integer for product {}",
                entry.product_id
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn incoming(product: i32, variant: Option<i32>, quantity: Option<u32>) -> IncomingLineItem {
        IncomingLineItem {
            product_id: ProductId::new(product),
            variant_id: variant.map(VariantId::new),
            quantity,
        }
    }

    fn line(product: i32, variant: Option<i32>, quantity: u32) -> CartLineItem {
        CartLineItem {
            product_id: ProductId::new(product),
            variant_id: variant.map(VariantId::new),
            quantity,
        }
    }

    #[test]
    fn test_merge_into_empty_defaults_quantity_to_one() {
        let mut items = Vec::new();
        merge_items(
            &mut items,
            vec![incoming(1, Some(10), None), incoming(2, None, Some(3))],
        );
        assert_eq!(items, vec![line(1, Some(10), 1), line(2, None, 3)]);
    }

    #[test]
    fn test_merge_accumulates_matching_identity() {
        // Reconcile is NOT idempotent by design: applying the same single
        // line twice yields quantity 2, not 1.
        let mut items = Vec::new();
        merge_items(&mut items, vec![incoming(1, Some(10), Some(1))]);
        merge_items(&mut items, vec![incoming(1, Some(10), Some(1))]);
        assert_eq!(items, vec![line(1, Some(10), 2)]);
    }

    #[test]
    fn test_merge_scenario_from_stored_cart() {
        // Stored [{p1,v1,qty:2}] reconciled with [{p1,v1,qty:3},{p2,v2,qty:1}]
        // yields [{p1,v1,qty:5},{p2,v2,qty:1}].
        let mut items = vec![line(1, Some(1), 2)];
        merge_items(
            &mut items,
            vec![incoming(1, Some(1), Some(3)), incoming(2, Some(2), Some(1))],
        );
        assert_eq!(items, vec![line(1, Some(1), 5), line(2, Some(2), 1)]);
    }

    #[test]
    fn test_merge_never_duplicates_identity() {
        let mut items = vec![line(1, Some(1), 1), line(1, Some(2), 1)];
        merge_items(
            &mut items,
            vec![
                incoming(1, Some(1), Some(2)),
                incoming(1, Some(1), Some(2)),
                incoming(1, Some(2), None),
            ],
        );

        let mut identities: Vec<_> = items.iter().map(CartLineItem::identity).collect();
        let before = identities.len();
        identities.dedup();
        assert_eq!(identities.len(), before, "duplicate line identity");
        assert_eq!(items, vec![line(1, Some(1), 5), line(1, Some(2), 2)]);
    }

    #[test]
    fn test_merge_leaves_non_matching_lines_untouched() {
        let mut items = vec![line(7, Some(70), 4), line(8, None, 2)];
        merge_items(&mut items, vec![incoming(9, Some(90), Some(1))]);
        assert_eq!(
            items,
            vec![line(7, Some(70), 4), line(8, None, 2), line(9, Some(90), 1)]
        );
    }

    #[test]
    fn test_legacy_lines_only_merge_with_legacy_lines() {
        let mut items = vec![line(1, None, 1)];
        merge_items(&mut items, vec![incoming(1, Some(5), Some(1))]);
        assert_eq!(items, vec![line(1, None, 1), line(1, Some(5), 1)]);

        merge_items(&mut items, vec![incoming(1, None, Some(2))]);
        assert_eq!(items, vec![line(1, None, 3), line(1, Some(5), 1)]);
    }

    #[test]
    fn test_merge_preserves_insertion_order() {
        let mut items = Vec::new();
        merge_items(
            &mut items,
            vec![
                incoming(3, None, None),
                incoming(1, None, None),
                incoming(2, None, None),
                incoming(1, None, None),
            ],
        );
        let order: Vec<i32> = items.iter().map(|l| l.product_id.as_i32()).collect();
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[test]
    fn test_validate_items_rejects_zero_quantity() {
        assert!(validate_items(&[incoming(1, None, Some(0))]).is_err());
        assert!(validate_items(&[incoming(1, None, None)]).is_ok());
        assert!(validate_items(&[incoming(1, None, Some(1))]).is_ok());
    }

    #[test]
    fn test_line_item_serde_document_shape() {
        let item = line(3, Some(9), 2);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"productId": 3, "variantId": 9, "quantity": 2})
        );

        // Legacy items omit variantId entirely
        let legacy = serde_json::to_value(line(3, None, 2)).unwrap();
        assert_eq!(legacy, serde_json::json!({"productId": 3, "quantity": 2}));
        let parsed: CartLineItem = serde_json::from_value(legacy).unwrap();
        assert_eq!(parsed.variant_id, None);
    }

    #[test]
    fn test_incoming_quantity_omitted_on_wire() {
        let parsed: IncomingLineItem =
            serde_json::from_str(r#"{"productId": 4, "variantId": 2}"#).unwrap();
        assert_eq!(parsed.quantity, None);
        assert_eq!(parsed.effective_quantity(), 1);
    }
}
