//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (DB ping)
//!
//! # Catalog
//! GET  /catalog                - Product listing (?q= name search)
//!
//! # Shopping cart
//! POST   /shopping/cart                              - Add to cart (201 {id})
//! GET    /shopping/cart                              - Active cart aggregate or null
//! PUT    /shopping/cart/{cartId}/items/{productId}   - Set line quantity
//! DELETE /shopping/cart/{cartId}/items/{productId}   - Remove line (idempotent)
//! ```

pub mod catalog;
pub mod shopping;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new().route("/", get(catalog::index))
}

/// Create the shopping cart routes router.
pub fn shopping_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", post(shopping::add).get(shopping::show))
        .route(
            "/cart/{cart_id}/items/{product_id}",
            put(shopping::update_item).delete(shopping::remove_item),
        )
}

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/catalog", catalog_routes())
        .nest("/shopping", shopping_routes())
}
