//! Product and variant models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use pricewatch_core::{Changeset, PRICE_FIELD, ProductId, VariantId};

/// A product. Read-only from the price-change handler's perspective.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A purchasable configuration of a product, carrying its own price.
///
/// `lowest_price` and `lowest_price_updated_at` are derived fields: the
/// minimum observed price within the trailing 30-day window as of the last
/// price change, written only by the price-change handler.
#[derive(Debug, Clone, Serialize)]
pub struct ProductVariant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub lowest_price: Option<Decimal>,
    pub lowest_price_updated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product with its variants, as rendered on the price list page.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithVariants {
    pub product: Product,
    pub variants: Vec<ProductVariant>,
}

/// Result of persisting a variant price update: the new record state plus
/// the price it replaced.
#[derive(Debug, Clone, Serialize)]
pub struct VariantPriceUpdate {
    pub variant: ProductVariant,
    pub previous_price: Decimal,
}

impl VariantPriceUpdate {
    /// Build the changeset for this update.
    ///
    /// Prices are recorded as decimal strings, the same shape they take on
    /// the wire. When the price did not actually change the changeset comes
    /// back empty and downstream handlers no-op.
    #[must_use]
    pub fn changeset(&self) -> Changeset {
        let mut changes = Changeset::new();
        changes.record(
            PRICE_FIELD,
            Value::String(self.previous_price.to_string()),
            Value::String(self.variant.price.to_string()),
        );
        changes
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn variant(price: &str) -> ProductVariant {
        let now = Utc::now();
        ProductVariant {
            id: VariantId::new(1),
            product_id: ProductId::new(1),
            title: "Default".to_string(),
            price: price.parse().unwrap(),
            lowest_price: None,
            lowest_price_updated_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_changeset_records_price_change() {
        let update = VariantPriceUpdate {
            variant: variant("799.95"),
            previous_price: "789.95".parse().unwrap(),
        };

        let changes = update.changeset();
        assert!(changes.changed(PRICE_FIELD));
        let change = changes.get(PRICE_FIELD).unwrap();
        assert_eq!(change.previous_decimal(), Some("789.95".parse().unwrap()));
        assert_eq!(change.current_decimal(), Some("799.95".parse().unwrap()));
    }

    #[test]
    fn test_changeset_empty_when_price_unchanged() {
        let update = VariantPriceUpdate {
            variant: variant("799.95"),
            previous_price: "799.95".parse().unwrap(),
        };

        assert!(update.changeset().is_empty());
    }
}
