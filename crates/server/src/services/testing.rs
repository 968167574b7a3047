//! In-memory storage and catalog doubles for engine tests.
//!
//! [`MemoryCartStore`] mirrors the Postgres behavior the engine relies on:
//! the at-most-one-active-cart constraint surfaces as
//! [`RepositoryError::Conflict`], the open sequence is atomic under one
//! lock, and loads have outer-join semantics.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use mercado_core::{CartId, Price, ProductId, StoreId, UserId};

use super::cart::CartStore;
use super::catalog::Catalog;
use crate::db::RepositoryError;
use crate::models::{CartLine, CartRecord, CartSnapshot, Product, StoreSummary};

/// Fixed catalog for tests.
pub struct MemoryCatalog {
    stores: Vec<StoreSummary>,
    products: Vec<Product>,
}

impl MemoryCatalog {
    /// Two stores; products 1 and 2 belong to store 1, product 16 to
    /// store 2. Prices: 4.50, 12.00, 7.25.
    pub fn fixture() -> Arc<Self> {
        let stores = vec![
            StoreSummary {
                id: StoreId::new(1),
                name: "Mercado Central".to_owned(),
            },
            StoreSummary {
                id: StoreId::new(2),
                name: "Emporio Verde".to_owned(),
            },
        ];
        let products = vec![
            Product {
                id: ProductId::new(1),
                name: "Rice 1kg".to_owned(),
                price: Price::new(Decimal::new(450, 2)),
                store: stores[0].clone(),
            },
            Product {
                id: ProductId::new(2),
                name: "Olive Oil 500ml".to_owned(),
                price: Price::new(Decimal::new(1200, 2)),
                store: stores[0].clone(),
            },
            Product {
                id: ProductId::new(16),
                name: "Oat Milk 1l".to_owned(),
                price: Price::new(Decimal::new(725, 2)),
                store: stores[1].clone(),
            },
        ];
        Arc::new(Self { stores, products })
    }

    fn store_summary(&self, id: StoreId) -> Option<StoreSummary> {
        self.stores.iter().find(|store| store.id == id).cloned()
    }

    fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.product(id).cloned())
    }
}

#[derive(Default)]
struct State {
    carts: Vec<CartRecord>,
    // (cart, product) -> quantity; BTreeMap keeps line order deterministic.
    items: BTreeMap<(i32, i32), i32>,
    next_cart_id: i32,
}

/// Mutex-guarded in-memory cart store.
pub struct MemoryCartStore {
    catalog: Arc<MemoryCatalog>,
    state: Mutex<State>,
}

impl MemoryCartStore {
    pub fn new(catalog: Arc<MemoryCatalog>) -> Self {
        Self {
            catalog,
            state: Mutex::new(State {
                next_cart_id: 1,
                ..State::default()
            }),
        }
    }

    /// All cart rows, for invariant assertions.
    pub fn cart_rows(&self) -> Vec<CartRecord> {
        self.state.lock().expect("store lock").carts.clone()
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn find_active_cart(
        &self,
        user_id: UserId,
    ) -> Result<Option<CartRecord>, RepositoryError> {
        let state = self.state.lock().expect("store lock");
        Ok(state
            .carts
            .iter()
            .find(|cart| cart.user_id == user_id && cart.active)
            .cloned())
    }

    async fn open_cart_with_item(
        &self,
        user_id: UserId,
        store_id: StoreId,
        close: Option<CartId>,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartId, RepositoryError> {
        let mut state = self.state.lock().expect("store lock");

        if let Some(stale) = close
            && let Some(cart) = state.carts.iter_mut().find(|cart| cart.id == stale)
        {
            cart.active = false;
        }

        // The partial unique index: a still-active cart for this shopper
        // means someone else committed between our read and this write.
        if state
            .carts
            .iter()
            .any(|cart| cart.user_id == user_id && cart.active)
        {
            return Err(RepositoryError::Conflict(format!(
                "shopper {user_id} already has an active cart"
            )));
        }

        let cart_id = CartId::new(state.next_cart_id);
        state.next_cart_id += 1;
        state.carts.push(CartRecord {
            id: cart_id,
            user_id,
            store_id,
            active: true,
            created_at: Utc::now(),
        });
        state
            .items
            .insert((cart_id.as_i32(), product_id.as_i32()), quantity);
        Ok(cart_id)
    }

    async fn merge_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("store lock");
        *state
            .items
            .entry((cart_id.as_i32(), product_id.as_i32()))
            .or_insert(0) += quantity;
        Ok(())
    }

    async fn set_item_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("store lock");
        if let Some(existing) = state.items.get_mut(&(cart_id.as_i32(), product_id.as_i32())) {
            *existing = quantity;
        }
        Ok(())
    }

    async fn delete_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("store lock");
        state.items.remove(&(cart_id.as_i32(), product_id.as_i32()));
        Ok(())
    }

    async fn load_cart(&self, cart_id: CartId) -> Result<Option<CartSnapshot>, RepositoryError> {
        let state = self.state.lock().expect("store lock");
        let Some(cart) = state.carts.iter().find(|cart| cart.id == cart_id).cloned() else {
            return Ok(None);
        };

        let store = self.catalog.store_summary(cart.store_id).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("unknown store {}", cart.store_id))
        })?;

        let mut lines = Vec::new();
        for (&(cart_key, product_key), &quantity) in &state.items {
            if cart_key != cart_id.as_i32() {
                continue;
            }
            let product = self.catalog.product(ProductId::new(product_key)).ok_or_else(|| {
                RepositoryError::DataCorruption(format!("unknown product {product_key}"))
            })?;
            lines.push(CartLine {
                product_id: product.id,
                name: product.name.clone(),
                price: product.price,
                quantity,
            });
        }

        Ok(Some(CartSnapshot { cart, store, lines }))
    }
}
