//! Price history model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use pricewatch_core::{PriceHistoryId, VariantId};

/// An immutable timestamped record of a price observed for a variant.
///
/// Rows are append-only: the price-change handler creates one per observed
/// price change and nothing ever mutates or deletes them.
#[derive(Debug, Clone, Serialize)]
pub struct PriceHistoryEntry {
    pub id: PriceHistoryId,
    pub variant_id: VariantId,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
