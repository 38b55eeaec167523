//! Database operations for products and variants.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use pricewatch_core::{ProductId, VariantId};

use super::RepositoryError;
use crate::models::{Product, ProductVariant, ProductWithVariants, VariantPriceUpdate};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            title: row.title,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for variant queries.
#[derive(Debug, sqlx::FromRow)]
struct VariantRow {
    id: i32,
    product_id: i32,
    title: String,
    price: Decimal,
    lowest_price: Option<Decimal>,
    lowest_price_updated_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VariantRow> for ProductVariant {
    fn from(row: VariantRow) -> Self {
        Self {
            id: VariantId::new(row.id),
            product_id: ProductId::new(row.product_id),
            title: row.title,
            price: row.price,
            lowest_price: row.lowest_price,
            lowest_price_updated_at: row.lowest_price_updated_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for the price-update query: the updated variant plus
/// the price it replaced.
#[derive(Debug, sqlx::FromRow)]
struct VariantPriceUpdateRow {
    id: i32,
    product_id: i32,
    title: String,
    price: Decimal,
    lowest_price: Option<Decimal>,
    lowest_price_updated_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    previous_price: Decimal,
}

impl From<VariantPriceUpdateRow> for VariantPriceUpdate {
    fn from(row: VariantPriceUpdateRow) -> Self {
        Self {
            variant: ProductVariant {
                id: VariantId::new(row.id),
                product_id: ProductId::new(row.product_id),
                title: row.title,
                price: row.price,
                lowest_price: row.lowest_price,
                lowest_price_updated_at: row.lowest_price_updated_at,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            previous_price: row.previous_price,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product and variant database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products with their variants, oldest product first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_with_variants(&self) -> Result<Vec<ProductWithVariants>, RepositoryError> {
        let product_rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, title, created_at, updated_at
            FROM products
            ORDER BY created_at ASC, id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let variant_rows = sqlx::query_as::<_, VariantRow>(
            r"
            SELECT id, product_id, title, price,
                   lowest_price, lowest_price_updated_at,
                   created_at, updated_at
            FROM product_variants
            ORDER BY product_id ASC, id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let mut variants_by_product: HashMap<i32, Vec<ProductVariant>> = HashMap::new();
        for row in variant_rows {
            variants_by_product
                .entry(row.product_id)
                .or_default()
                .push(ProductVariant::from(row));
        }

        Ok(product_rows
            .into_iter()
            .map(|row| {
                let variants = variants_by_product.remove(&row.id).unwrap_or_default();
                ProductWithVariants {
                    product: Product::from(row),
                    variants,
                }
            })
            .collect())
    }

    /// Fetch a single variant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_variant(
        &self,
        id: VariantId,
    ) -> Result<Option<ProductVariant>, RepositoryError> {
        let row = sqlx::query_as::<_, VariantRow>(
            r"
            SELECT id, product_id, title, price,
                   lowest_price, lowest_price_updated_at,
                   created_at, updated_at
            FROM product_variants
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(ProductVariant::from))
    }

    /// Persist a new price on a variant, returning the updated record and
    /// the price it replaced.
    ///
    /// A single UPDATE with a `FOR UPDATE` self-join captures the previous
    /// price atomically, so the caller's changeset is never built from a
    /// torn read. Returns `None` when the variant does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_variant_price(
        &self,
        id: VariantId,
        price: Decimal,
    ) -> Result<Option<VariantPriceUpdate>, RepositoryError> {
        let row = sqlx::query_as::<_, VariantPriceUpdateRow>(
            r"
            UPDATE product_variants AS v
            SET price = $2, updated_at = now()
            FROM (
                SELECT id, price
                FROM product_variants
                WHERE id = $1
                FOR UPDATE
            ) AS old
            WHERE v.id = old.id
            RETURNING v.id, v.product_id, v.title, v.price,
                      v.lowest_price, v.lowest_price_updated_at,
                      v.created_at, v.updated_at,
                      old.price AS previous_price
            ",
        )
        .bind(id.as_i32())
        .bind(price)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(VariantPriceUpdate::from))
    }

    /// Write the derived lowest-price fields back onto a variant.
    ///
    /// Last write wins: concurrent price changes to the same variant are an
    /// accepted race, matching the event-driven recomputation model.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_lowest_price(
        &self,
        id: VariantId,
        lowest_price: Decimal,
        lowest_price_updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            UPDATE product_variants
            SET lowest_price = $2, lowest_price_updated_at = $3
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .bind(lowest_price)
        .bind(lowest_price_updated_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
