//! Catalog domain types.
//!
//! Products and stores are read-only from the cart's perspective: the
//! catalog owns them, and no in-flight price change is reconciled against an
//! open cart.

use serde::Serialize;

use mercado_core::{Price, ProductId, StoreId};

/// A catalog product (domain type).
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Current unit price.
    pub price: Price,
    /// Store that sells this product.
    pub store: StoreSummary,
}

/// A store descriptor as embedded in products and cart aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct StoreSummary {
    /// Unique store ID.
    pub id: StoreId,
    /// Store display name.
    pub name: String,
}

/// Wire representation of a product for the catalog listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub store: StoreSummary,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            store: product.store,
        }
    }
}
