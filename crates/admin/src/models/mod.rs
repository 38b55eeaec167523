//! Domain models for the admin panel.

pub mod price_history;
pub mod product;

pub use price_history::PriceHistoryEntry;
pub use product::{Product, ProductVariant, ProductWithVariants, VariantPriceUpdate};
