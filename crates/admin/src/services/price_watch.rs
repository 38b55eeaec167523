//! The price-change handler.
//!
//! Invoked once per successfully persisted variant update, with the
//! changeset built from the previous and current field values. When the
//! price changed it appends a [`PriceHistoryEntry`] and recomputes the
//! variant's cached lowest price over a trailing 30-calendar-day window.
//!
//! Data access goes through the narrow [`PriceStore`] trait so the handler
//! is testable without `PostgreSQL`. Store failures propagate to the caller
//! via `?`; there is no retry or compensating action.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use pricewatch_core::{Changeset, PRICE_FIELD, VariantId, trailing_window_start};

use crate::db::{PriceHistoryRepository, ProductRepository, RepositoryError};
use crate::models::PriceHistoryEntry;

/// Trailing lookback, in calendar days, for the lowest-price computation.
pub const LOWEST_PRICE_WINDOW_DAYS: u64 = 30;

/// The data-access capability the price-change handler needs: append a
/// history entry, find the lowest in-window entry, write the derived fields
/// back.
#[allow(async_fn_in_trait)]
pub trait PriceStore {
    /// Append a history entry for an observed price, linked to the variant.
    async fn create_history_entry(
        &self,
        variant_id: VariantId,
        price: Decimal,
    ) -> Result<PriceHistoryEntry, RepositoryError>;

    /// The single lowest-priced entry created at or after `since`.
    ///
    /// Equal prices tie-break on earliest creation time.
    async fn lowest_price_since(
        &self,
        variant_id: VariantId,
        since: DateTime<Utc>,
    ) -> Result<Option<PriceHistoryEntry>, RepositoryError>;

    /// Write `lowest_price` and `lowest_price_updated_at` onto the variant.
    async fn update_lowest_price(
        &self,
        variant_id: VariantId,
        lowest_price: Decimal,
        lowest_price_updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;
}

/// [`PriceStore`] backed by the `PostgreSQL` repositories.
pub struct PgPriceStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgPriceStore<'a> {
    /// Create a store over a connection pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl PriceStore for PgPriceStore<'_> {
    async fn create_history_entry(
        &self,
        variant_id: VariantId,
        price: Decimal,
    ) -> Result<PriceHistoryEntry, RepositoryError> {
        PriceHistoryRepository::new(self.pool)
            .create(variant_id, price)
            .await
    }

    async fn lowest_price_since(
        &self,
        variant_id: VariantId,
        since: DateTime<Utc>,
    ) -> Result<Option<PriceHistoryEntry>, RepositoryError> {
        PriceHistoryRepository::new(self.pool)
            .lowest_since(variant_id, since)
            .await
    }

    async fn update_lowest_price(
        &self,
        variant_id: VariantId,
        lowest_price: Decimal,
        lowest_price_updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        ProductRepository::new(self.pool)
            .update_lowest_price(variant_id, lowest_price, lowest_price_updated_at)
            .await
    }
}

/// Handle a persisted variant update.
///
/// No-op unless the changeset contains a price change. Otherwise, in order:
///
/// 1. Append a history entry with the current price (never deduplicated -
///    replaying the same changeset appends again).
/// 2. Find the lowest-priced entry created within the trailing 30 calendar
///    days. The entry appended in step 1 is part of the candidate pool.
/// 3. Write the lowest price (or the current price when the window is
///    empty) and its timestamp (or `now`) back onto the variant.
///
/// Concurrent invocations for the same variant race on step 3; last write
/// wins, which matches the event-driven recomputation model.
///
/// # Errors
///
/// Returns `RepositoryError` if any store call fails. Nothing is rolled
/// back: a failure after step 1 leaves the appended history entry in place.
#[instrument(skip(store, changes))]
pub async fn handle_variant_update<S: PriceStore>(
    store: &S,
    variant_id: VariantId,
    changes: &Changeset,
    now: DateTime<Utc>,
) -> Result<(), RepositoryError> {
    info!(%variant_id, ?changes, "Product variant updated");

    let Some(change) = changes.get(PRICE_FIELD) else {
        return Ok(());
    };
    let Some(current) = change.current_decimal() else {
        // A price change whose current value is not a decimal is malformed;
        // treat it like the price-absent case.
        warn!(%variant_id, ?change, "Ignoring price change with non-decimal current value");
        return Ok(());
    };

    info!(
        %variant_id,
        previous = ?change.previous_decimal(),
        %current,
        "Price changed for variant"
    );

    store.create_history_entry(variant_id, current).await?;

    let window_start = trailing_window_start(now, LOWEST_PRICE_WINDOW_DAYS);
    let lowest_entry = store.lowest_price_since(variant_id, window_start).await?;
    info!(%variant_id, ?lowest_entry, "Lowest price in last 30 days");

    let (lowest_price, lowest_price_updated_at) = match lowest_entry {
        Some(entry) => (entry.price, entry.updated_at),
        None => (current, now),
    };

    store
        .update_lowest_price(variant_id, lowest_price, lowest_price_updated_at)
        .await?;

    Ok(())
}
