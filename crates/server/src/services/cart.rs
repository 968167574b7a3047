//! The cart consistency engine.
//!
//! A shopper holds line items from at most one store at a time. Every
//! add-to-cart request lands in one of three states: no active cart, an
//! active cart for the incoming product's store, or an active cart for a
//! different store. The first opens a cart, the second merges the line
//! additively, the third soft-closes the old cart and opens a new one.
//! There is no fourth case.
//!
//! The read-decide-write sequence is racy under concurrent requests for the
//! same shopper: two handlers can both observe "no active cart" and both
//! open one. Serialization is delegated to storage - the partial unique
//! index on `carts (user_id) WHERE active` makes the loser of that race fail
//! with [`RepositoryError::Conflict`], and the engine retries a bounded
//! number of times. Different shoppers never contend.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use mercado_core::{CartId, ProductId, StoreId, UserId};

use super::catalog::Catalog;
use super::presenter;
use crate::db::RepositoryError;
use crate::models::{CartAggregate, CartRecord, CartSnapshot};

/// Attempts before a persistent active-cart conflict is surfaced as a
/// failure.
const MAX_ADD_ATTEMPTS: u32 = 3;

/// Errors from cart engine operations.
#[derive(Debug, thiserror::Error)]
pub enum ShoppingError {
    /// The referenced product does not exist in the catalog.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// Quantity outside the valid range. Lines always hold at least one
    /// unit; deletion is an explicit, separate operation.
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(i32),

    /// Concurrent add-to-cart calls kept invalidating each other past the
    /// retry bound.
    #[error("active cart contention not settled after {MAX_ADD_ATTEMPTS} attempts: {0}")]
    ContentionExhausted(String),

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

/// Storage contract for carts and cart lines.
///
/// Implementations must provide:
/// - at-most-one-active-cart enforcement: `open_cart_with_item` fails with
///   [`RepositoryError::Conflict`] when the shopper already has an active
///   cart at commit time;
/// - atomicity of `open_cart_with_item` - deactivate old cart, create new
///   cart, insert line is one unit with either full effect or none;
/// - outer-join semantics in `load_cart` - a cart row with zero lines is
///   returned with an empty line list, never dropped.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Find the shopper's currently active cart, if any.
    async fn find_active_cart(&self, user_id: UserId)
    -> Result<Option<CartRecord>, RepositoryError>;

    /// Atomically deactivate `close` (when given), create a new active cart
    /// for `(user_id, store_id)`, and insert its first line. Returns the new
    /// cart's id.
    async fn open_cart_with_item(
        &self,
        user_id: UserId,
        store_id: StoreId,
        close: Option<CartId>,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartId, RepositoryError>;

    /// Additive upsert: insert the line, or add `quantity` onto an existing
    /// line for the same product.
    async fn merge_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError>;

    /// Set a line's quantity directly. A missing line is a silent no-op.
    async fn set_item_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError>;

    /// Delete a line. A missing line is a silent no-op.
    async fn delete_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError>;

    /// Load a cart row with its store descriptor and outer-joined lines.
    async fn load_cart(&self, cart_id: CartId) -> Result<Option<CartSnapshot>, RepositoryError>;
}

#[async_trait]
impl<T: CartStore + ?Sized> CartStore for Arc<T> {
    async fn find_active_cart(
        &self,
        user_id: UserId,
    ) -> Result<Option<CartRecord>, RepositoryError> {
        (**self).find_active_cart(user_id).await
    }

    async fn open_cart_with_item(
        &self,
        user_id: UserId,
        store_id: StoreId,
        close: Option<CartId>,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartId, RepositoryError> {
        (**self)
            .open_cart_with_item(user_id, store_id, close, product_id, quantity)
            .await
    }

    async fn merge_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        (**self).merge_item(cart_id, product_id, quantity).await
    }

    async fn set_item_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        (**self)
            .set_item_quantity(cart_id, product_id, quantity)
            .await
    }

    async fn delete_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        (**self).delete_item(cart_id, product_id).await
    }

    async fn load_cart(&self, cart_id: CartId) -> Result<Option<CartSnapshot>, RepositoryError> {
        (**self).load_cart(cart_id).await
    }
}

/// The cart consistency engine.
///
/// Owns the active-cart invariant and the store-exclusivity rule. Generic
/// over the storage contract and the catalog collaborator so the decision
/// logic can be exercised without a database.
pub struct CartService<S, C> {
    store: S,
    catalog: C,
}

impl<S: CartStore, C: Catalog> CartService<S, C> {
    /// Create a new cart service.
    pub const fn new(store: S, catalog: C) -> Self {
        Self { store, catalog }
    }

    /// Add `quantity` units of a product to the shopper's cart.
    ///
    /// Merges into the active cart when it belongs to the product's store;
    /// otherwise soft-closes any active cart for another store and opens a
    /// new one. Returns the id of the cart that received the line.
    ///
    /// # Errors
    ///
    /// Returns `ShoppingError::ProductNotFound` for an unknown product,
    /// `ShoppingError::InvalidQuantity` for `quantity < 1`, and
    /// `ShoppingError::ContentionExhausted` when concurrent adds for the
    /// same shopper keep colliding past the retry bound.
    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartId, ShoppingError> {
        if quantity < 1 {
            return Err(ShoppingError::InvalidQuantity(quantity));
        }

        let product = self
            .catalog
            .get_product(product_id)
            .await?
            .ok_or(ShoppingError::ProductNotFound(product_id))?;

        let mut attempt = 0;
        loop {
            attempt += 1;

            match self.store.find_active_cart(user_id).await? {
                Some(cart) if cart.store_id == product.store.id => {
                    self.store.merge_item(cart.id, product_id, quantity).await?;
                    return Ok(cart.id);
                }
                stale => {
                    let close = stale.map(|cart| cart.id);
                    match self
                        .store
                        .open_cart_with_item(user_id, product.store.id, close, product_id, quantity)
                        .await
                    {
                        Ok(cart_id) => return Ok(cart_id),
                        Err(RepositoryError::Conflict(reason)) if attempt < MAX_ADD_ATTEMPTS => {
                            // A concurrent add for this shopper won the
                            // active-cart index. Re-read and reconcile.
                            tracing::debug!(
                                %user_id,
                                attempt,
                                %reason,
                                "lost active-cart race, retrying"
                            );
                        }
                        Err(RepositoryError::Conflict(reason)) => {
                            return Err(ShoppingError::ContentionExhausted(reason));
                        }
                        Err(err) => return Err(err.into()),
                    }
                }
            }
        }
    }

    /// The shopper's current cart aggregate, or `None` when no cart is
    /// active. `None` is a regular result, not an error.
    #[instrument(skip(self))]
    pub async fn active_cart(
        &self,
        user_id: UserId,
    ) -> Result<Option<CartAggregate>, ShoppingError> {
        let Some(cart) = self.store.find_active_cart(user_id).await? else {
            return Ok(None);
        };

        let snapshot = self.store.load_cart(cart.id).await?.ok_or_else(|| {
            RepositoryError::DataCorruption(format!("active cart {} has no row", cart.id))
        })?;

        Ok(Some(presenter::present(snapshot)))
    }

    /// The aggregate for a specific cart, active or not. Deactivated carts
    /// stay queryable as historical record.
    #[instrument(skip(self))]
    pub async fn cart(&self, cart_id: CartId) -> Result<Option<CartAggregate>, ShoppingError> {
        let snapshot = self.store.load_cart(cart_id).await?;
        Ok(snapshot.map(presenter::present))
    }

    /// Set a line's quantity directly (not additive).
    ///
    /// A missing line succeeds silently. Quantity zero is rejected; deleting
    /// a line is [`Self::remove_item`]'s job.
    ///
    /// # Errors
    ///
    /// Returns `ShoppingError::InvalidQuantity` for `quantity < 1`.
    #[instrument(skip(self))]
    pub async fn update_item_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), ShoppingError> {
        if quantity < 1 {
            return Err(ShoppingError::InvalidQuantity(quantity));
        }

        self.store
            .set_item_quantity(cart_id, product_id, quantity)
            .await?;
        Ok(())
    }

    /// Delete a line unconditionally. Removing a line that does not exist is
    /// not an error.
    #[instrument(skip(self))]
    pub async fn remove_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<(), ShoppingError> {
        self.store.delete_item(cart_id, product_id).await?;
        Ok(())
    }
}
