//! Seed the database with demo products and variants.
//!
//! Plain inserts, suitable for a fresh database: running it twice creates a
//! second set of demo products.

use super::CommandError;

/// Demo catalogue: product title, variant title, starting price.
const DEMO_PRODUCTS: &[(&str, &str, &str)] = &[
    ("Aluminum Keyboard", "Default", "799.95"),
    ("Walnut Desk Lamp", "Default", "49.50"),
    ("Canvas Tote Bag", "Default", "18.00"),
    ("Gift Card", "£25", "25.00"),
];

/// Insert the demo catalogue.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is missing, the connection fails, or
/// an insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    for (product_title, variant_title, price) in DEMO_PRODUCTS {
        let product_id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO products (title)
            VALUES ($1)
            RETURNING id
            ",
        )
        .bind(product_title)
        .fetch_one(&pool)
        .await?;

        let variant_id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO product_variants (product_id, title, price)
            VALUES ($1, $2, $3::numeric)
            RETURNING id
            ",
        )
        .bind(product_id)
        .bind(variant_title)
        .bind(price)
        .fetch_one(&pool)
        .await?;

        tracing::info!(product_id, variant_id, title = product_title, "Seeded product");
    }

    tracing::info!(count = DEMO_PRODUCTS.len(), "Seeding complete");
    Ok(())
}
