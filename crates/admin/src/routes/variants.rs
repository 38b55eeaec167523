//! Variant detail and price-update route handlers.
//!
//! The price-update endpoint is the event seam: it persists the new price,
//! builds the changeset from the previous and current values, and invokes
//! the price-change handler exactly once per successful persistence.

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    response::{Html, Redirect},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use pricewatch_core::VariantId;

use crate::{
    db::{PriceHistoryRepository, ProductRepository},
    error::AppError,
    filters,
    models::{PriceHistoryEntry, ProductVariant},
    services::price_watch::{self, PgPriceStore},
    state::AppState,
};

/// Variant fields pre-formatted for display.
#[derive(Debug, Clone)]
pub struct VariantView {
    pub id: i32,
    pub title: String,
    pub price: String,
    pub lowest_price: String,
    pub lowest_price_updated_at: String,
    pub updated_at: String,
}

impl From<&ProductVariant> for VariantView {
    fn from(variant: &ProductVariant) -> Self {
        Self {
            id: variant.id.as_i32(),
            title: variant.title.clone(),
            price: filters::money(variant.price),
            lowest_price: variant
                .lowest_price
                .map_or_else(|| "-".to_string(), filters::money),
            lowest_price_updated_at: variant
                .lowest_price_updated_at
                .as_ref()
                .map_or_else(|| "-".to_string(), filters::datetime),
            updated_at: filters::datetime(&variant.updated_at),
        }
    }
}

/// One price-history table row.
#[derive(Debug, Clone)]
pub struct HistoryRowView {
    pub price: String,
    pub created_at: String,
}

impl From<&PriceHistoryEntry> for HistoryRowView {
    fn from(entry: &PriceHistoryEntry) -> Self {
        Self {
            price: filters::money(entry.price),
            created_at: filters::datetime(&entry.created_at),
        }
    }
}

/// Variant detail page template.
#[derive(Template)]
#[template(path = "variants/show.html")]
pub struct VariantShowTemplate {
    pub variant: VariantView,
    pub history: Vec<HistoryRowView>,
}

/// Variant detail page: current price fields plus the append-only history.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown variant, or
/// `AppError::Database`/`AppError::Template` on query and render failures.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let id = VariantId::new(id);

    let variant = ProductRepository::new(state.pool())
        .get_variant(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("variant {id}")))?;

    let history = PriceHistoryRepository::new(state.pool())
        .list_for_variant(id)
        .await?;

    let template = VariantShowTemplate {
        variant: VariantView::from(&variant),
        history: history.iter().map(HistoryRowView::from).collect(),
    };
    Ok(Html(template.render()?))
}

/// Price update form body.
#[derive(Debug, Deserialize)]
pub struct UpdatePriceForm {
    pub price: String,
}

/// Persist a new variant price, then run the price-change handler.
///
/// Handler failures propagate as a 500; the price update itself has already
/// committed at that point, mirroring a platform that persists the record
/// before firing its update effect.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for a non-decimal price,
/// `AppError::NotFound` for an unknown variant, and `AppError::Database`
/// if persistence or the price-change handler fails.
#[instrument(skip(state, form))]
pub async fn update_price(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<UpdatePriceForm>,
) -> Result<Redirect, AppError> {
    let id = VariantId::new(id);
    let price: Decimal = form
        .price
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("price must be a decimal: {}", form.price)))?;

    let update = ProductRepository::new(state.pool())
        .update_variant_price(id, price)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("variant {id}")))?;

    let changes = update.changeset();
    let store = PgPriceStore::new(state.pool());
    price_watch::handle_variant_update(&store, id, &changes, Utc::now()).await?;

    Ok(Redirect::to(&format!("/variants/{id}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, Utc};
    use pricewatch_core::{PriceHistoryId, ProductId};

    use super::*;

    #[test]
    fn test_variant_show_template_renders_history() {
        let now: DateTime<Utc> = "2026-08-29T10:00:00Z".parse().unwrap();
        let variant = ProductVariant {
            id: VariantId::new(11),
            product_id: ProductId::new(1),
            title: "Default".to_string(),
            price: "95".parse().unwrap(),
            lowest_price: Some("90".parse().unwrap()),
            lowest_price_updated_at: Some(now),
            created_at: now,
            updated_at: now,
        };
        let history = vec![
            PriceHistoryEntry {
                id: PriceHistoryId::new(2),
                variant_id: VariantId::new(11),
                price: "95".parse().unwrap(),
                created_at: now,
                updated_at: now,
            },
            PriceHistoryEntry {
                id: PriceHistoryId::new(1),
                variant_id: VariantId::new(11),
                price: "90".parse().unwrap(),
                created_at: now,
                updated_at: now,
            },
        ];

        let template = VariantShowTemplate {
            variant: VariantView::from(&variant),
            history: history.iter().map(HistoryRowView::from).collect(),
        };
        let html = template.render().unwrap();
        assert!(html.contains("£95.00"));
        assert!(html.contains("£90.00"));
    }
}
