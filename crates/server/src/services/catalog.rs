//! Catalog collaborator contract.
//!
//! The catalog owns products and stores; the cart engine only ever reads
//! from it. [`crate::db::ProductRepository`] is the production
//! implementation.

use std::sync::Arc;

use async_trait::async_trait;

use mercado_core::ProductId;

use crate::db::RepositoryError;
use crate::models::Product;

/// Read-only product resolution.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Resolve a product to its current name, price, and owning store.
    ///
    /// Returns `Ok(None)` for an unknown product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the catalog backend fails.
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;
}

#[async_trait]
impl<T: Catalog + ?Sized> Catalog for Arc<T> {
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        (**self).get_product(id).await
    }
}
