//! Route handlers for the admin panel.

pub mod products;
pub mod variants;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// All admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/products", get(products::index))
        .route("/variants/{id}", get(variants::show))
        .route("/variants/{id}/price", post(variants::update_price))
}

/// The product price list is the landing page.
async fn root() -> Redirect {
    Redirect::to("/products")
}
