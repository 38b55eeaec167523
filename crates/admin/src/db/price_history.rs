//! Database operations for the append-only price history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use pricewatch_core::{PriceHistoryId, VariantId};

use super::RepositoryError;
use crate::models::PriceHistoryEntry;

/// Internal row type for `PostgreSQL` queries.
#[derive(Debug, sqlx::FromRow)]
struct PriceHistoryRow {
    id: i32,
    variant_id: i32,
    price: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PriceHistoryRow> for PriceHistoryEntry {
    fn from(row: PriceHistoryRow) -> Self {
        Self {
            id: PriceHistoryId::new(row.id),
            variant_id: VariantId::new(row.variant_id),
            price: row.price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for price history database operations.
pub struct PriceHistoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PriceHistoryRepository<'a> {
    /// Create a new price history repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append a history entry for an observed price.
    ///
    /// Entries are never deduplicated: recording the same price twice
    /// appends twice.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        variant_id: VariantId,
        price: Decimal,
    ) -> Result<PriceHistoryEntry, RepositoryError> {
        let row = sqlx::query_as::<_, PriceHistoryRow>(
            r"
            INSERT INTO price_history (variant_id, price)
            VALUES ($1, $2)
            RETURNING id, variant_id, price, created_at, updated_at
            ",
        )
        .bind(variant_id.as_i32())
        .bind(price)
        .fetch_one(self.pool)
        .await?;

        Ok(PriceHistoryEntry::from(row))
    }

    /// The single lowest-priced entry for a variant created at or after
    /// `since`.
    ///
    /// Equal prices tie-break on earliest `created_at` so the result is
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lowest_since(
        &self,
        variant_id: VariantId,
        since: DateTime<Utc>,
    ) -> Result<Option<PriceHistoryEntry>, RepositoryError> {
        let row = sqlx::query_as::<_, PriceHistoryRow>(
            r"
            SELECT id, variant_id, price, created_at, updated_at
            FROM price_history
            WHERE variant_id = $1 AND created_at >= $2
            ORDER BY price ASC, created_at ASC
            LIMIT 1
            ",
        )
        .bind(variant_id.as_i32())
        .bind(since)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(PriceHistoryEntry::from))
    }

    /// All history entries for a variant, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_variant(
        &self,
        variant_id: VariantId,
    ) -> Result<Vec<PriceHistoryEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, PriceHistoryRow>(
            r"
            SELECT id, variant_id, price, created_at, updated_at
            FROM price_history
            WHERE variant_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(variant_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(PriceHistoryEntry::from).collect())
    }
}
