//! Product price list route handler.

use askama::Template;
use axum::{extract::State, response::Html};
use tracing::instrument;

use crate::{
    db::ProductRepository, error::AppError, filters, models::ProductWithVariants, state::AppState,
};

/// One table row: a product with its first variant's price fields, all
/// pre-formatted for display.
#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub title: String,
    pub variant_id: Option<i32>,
    pub price: String,
    pub lowest_price: String,
    pub lowest_price_updated_at: String,
    pub updated_at: String,
}

impl From<&ProductWithVariants> for ProductRowView {
    fn from(item: &ProductWithVariants) -> Self {
        let first = item.variants.first();
        Self {
            title: item.product.title.clone(),
            variant_id: first.map(|v| v.id.as_i32()),
            price: first.map_or_else(|| "-".to_string(), |v| filters::money(v.price)),
            lowest_price: first
                .and_then(|v| v.lowest_price)
                .map_or_else(|| "-".to_string(), filters::money),
            lowest_price_updated_at: first
                .and_then(|v| v.lowest_price_updated_at.as_ref())
                .map_or_else(|| "-".to_string(), filters::datetime),
            updated_at: filters::datetime(&item.product.updated_at),
        }
    }
}

/// Product price list page template.
#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub rows: Vec<ProductRowView>,
    pub error: Option<String>,
}

/// Product price list page handler.
///
/// A read failure renders the page in its error state rather than a bare
/// 500, so the Reload control stays available.
///
/// # Errors
///
/// Returns `AppError::Template` if rendering fails.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let repo = ProductRepository::new(state.pool());

    let (rows, error) = match repo.list_with_variants().await {
        Ok(products) => (products.iter().map(ProductRowView::from).collect(), None),
        Err(e) => {
            tracing::error!("Failed to load products: {e}");
            (
                Vec::new(),
                Some("Error: failed to load products. Reload to try again.".to_string()),
            )
        }
    };

    let template = ProductsIndexTemplate { rows, error };
    Ok(Html(template.render()?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, Utc};
    use pricewatch_core::{ProductId, VariantId};

    use crate::models::{Product, ProductVariant};

    use super::*;

    fn product_with_variant(lowest: Option<&str>) -> ProductWithVariants {
        let now: DateTime<Utc> = "2026-08-29T10:00:00Z".parse().unwrap();
        ProductWithVariants {
            product: Product {
                id: ProductId::new(1),
                title: "Keyboard".to_string(),
                created_at: now,
                updated_at: now,
            },
            variants: vec![ProductVariant {
                id: VariantId::new(11),
                product_id: ProductId::new(1),
                title: "Default".to_string(),
                price: "799.95".parse().unwrap(),
                lowest_price: lowest.map(|p| p.parse().unwrap()),
                lowest_price_updated_at: lowest.map(|_| now),
                created_at: now,
                updated_at: now,
            }],
        }
    }

    #[test]
    fn test_row_view_formats_first_variant() {
        let row = ProductRowView::from(&product_with_variant(Some("789.95")));
        assert_eq!(row.title, "Keyboard");
        assert_eq!(row.variant_id, Some(11));
        assert_eq!(row.price, "£799.95");
        assert_eq!(row.lowest_price, "£789.95");
        assert_eq!(row.lowest_price_updated_at, "2026-08-29 10:00:00");
    }

    #[test]
    fn test_row_view_placeholders_before_first_price_change() {
        let row = ProductRowView::from(&product_with_variant(None));
        assert_eq!(row.lowest_price, "-");
        assert_eq!(row.lowest_price_updated_at, "-");
    }

    #[test]
    fn test_row_view_placeholders_without_variants() {
        let mut item = product_with_variant(None);
        item.variants.clear();
        let row = ProductRowView::from(&item);
        assert_eq!(row.variant_id, None);
        assert_eq!(row.price, "-");
    }

    #[test]
    fn test_index_template_renders_error_state() {
        let template = ProductsIndexTemplate {
            rows: Vec::new(),
            error: Some("Error: failed to load products. Reload to try again.".to_string()),
        };
        let html = template.render().unwrap();
        assert!(html.contains("failed to load products"));
    }

    #[test]
    fn test_index_template_renders_rows() {
        let template = ProductsIndexTemplate {
            rows: vec![ProductRowView::from(&product_with_variant(Some("789.95")))],
            error: None,
        };
        let html = template.render().unwrap();
        assert!(html.contains("Keyboard"));
        assert!(html.contains("£799.95"));
        assert!(html.contains("£789.95"));
    }
}
