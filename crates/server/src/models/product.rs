//! Catalog domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mirakle_core::{Price, ProductId, VariantId};

/// A size/variant of a product with its own stock count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: VariantId,
    /// Display label, e.g. "S", "M", "XL".
    pub size: String,
    pub stock: u32,
}

/// A catalog entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    /// Hosted image URLs in display order.
    pub images: Vec<String>,
    pub variants: Vec<ProductVariant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Look up a variant by ID.
    #[must_use]
    pub fn variant(&self, id: VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_lookup() {
        let product = Product {
            id: ProductId::new(1),
            title: "Tee".into(),
            description: String::new(),
            price: Price::new(rust_decimal::Decimal::new(499, 0), mirakle_core::CurrencyCode::INR),
            category: "tops".into(),
            images: Vec::new(),
            variants: vec![
                ProductVariant {
                    id: VariantId::new(1),
                    size: "S".into(),
                    stock: 3,
                },
                ProductVariant {
                    id: VariantId::new(2),
                    size: "M".into(),
                    stock: 0,
                },
            ],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(product.variant(VariantId::new(2)).unwrap().size, "M");
        assert!(product.variant(VariantId::new(9)).is_none());
    }
}
