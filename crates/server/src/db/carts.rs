//! Postgres implementation of the cart storage contract.
//!
//! Two pieces of schema carry the engine's invariants:
//!
//! - the partial unique index `carts_user_active_idx ON carts (user_id)
//!   WHERE active` serializes concurrent cart opens per shopper; the loser
//!   sees a unique violation, surfaced as [`RepositoryError::Conflict`];
//! - `open_cart_with_item` wraps deactivate + create + first line in one
//!   transaction, so a cancelled or failed call leaves either full effect
//!   or none.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use mercado_core::{CartId, Price, ProductId, StoreId, UserId};

use super::RepositoryError;
use crate::models::{CartLine, CartRecord, CartSnapshot, StoreSummary};
use crate::services::CartStore;

#[derive(sqlx::FromRow)]
struct CartRow {
    id: i32,
    user_id: i32,
    store_id: i32,
    active: bool,
    created_at: DateTime<Utc>,
}

impl From<CartRow> for CartRecord {
    fn from(row: CartRow) -> Self {
        Self {
            id: CartId::new(row.id),
            user_id: UserId::new(row.user_id),
            store_id: StoreId::new(row.store_id),
            active: row.active,
            created_at: row.created_at,
        }
    }
}

/// One row of the outer-joined snapshot query. Line columns are NULL for a
/// cart with no items.
#[derive(sqlx::FromRow)]
struct SnapshotRow {
    id: i32,
    user_id: i32,
    store_id: i32,
    active: bool,
    created_at: DateTime<Utc>,
    store_name: String,
    product_id: Option<i32>,
    quantity: Option<i32>,
    product_name: Option<String>,
    price: Option<Decimal>,
}

/// Cart store backed by `PostgreSQL`.
#[derive(Clone)]
pub struct PgCartStore {
    pool: PgPool,
}

impl PgCartStore {
    /// Create a new cart store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartStore for PgCartStore {
    async fn find_active_cart(
        &self,
        user_id: UserId,
    ) -> Result<Option<CartRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            SELECT id, user_id, store_id, active, created_at
            FROM carts
            WHERE user_id = $1 AND active
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CartRecord::from))
    }

    async fn open_cart_with_item(
        &self,
        user_id: UserId,
        store_id: StoreId,
        close: Option<CartId>,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if let Some(stale) = close {
            sqlx::query("UPDATE carts SET active = FALSE WHERE id = $1")
                .bind(stale)
                .execute(&mut *tx)
                .await?;
        }

        let (cart_id,): (i32,) = sqlx::query_as(
            r"
            INSERT INTO carts (user_id, store_id, active)
            VALUES ($1, $2, TRUE)
            RETURNING id
            ",
        )
        .bind(user_id)
        .bind(store_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(format!(
                    "shopper {user_id} already has an active cart"
                ));
            }
            RepositoryError::Database(e)
        })?;

        sqlx::query(
            r"
            INSERT INTO cart_items (cart_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(CartId::new(cart_id))
    }

    async fn merge_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO cart_items (cart_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (cart_id, product_id) DO UPDATE
            SET quantity = cart_items.quantity + EXCLUDED.quantity
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_item_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        // Zero rows affected means the line does not exist; that is a
        // silent no-op by contract.
        sqlx::query(
            r"
            UPDATE cart_items
            SET quantity = $3
            WHERE cart_id = $1 AND product_id = $2
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            DELETE FROM cart_items
            WHERE cart_id = $1 AND product_id = $2
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn load_cart(&self, cart_id: CartId) -> Result<Option<CartSnapshot>, RepositoryError> {
        // LEFT JOINs so a cart whose items were all removed still comes
        // back, with NULL line columns.
        let rows = sqlx::query_as::<_, SnapshotRow>(
            r"
            SELECT carts.id, carts.user_id, carts.store_id, carts.active,
                   carts.created_at,
                   stores.name AS store_name,
                   cart_items.product_id, cart_items.quantity,
                   products.name AS product_name, products.price
            FROM carts
            JOIN stores ON stores.id = carts.store_id
            LEFT JOIN cart_items ON cart_items.cart_id = carts.id
            LEFT JOIN products ON products.id = cart_items.product_id
            WHERE carts.id = $1
            ORDER BY cart_items.product_id
            ",
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await?;

        let Some(first) = rows.first() else {
            return Ok(None);
        };

        let cart = CartRecord {
            id: CartId::new(first.id),
            user_id: UserId::new(first.user_id),
            store_id: StoreId::new(first.store_id),
            active: first.active,
            created_at: first.created_at,
        };
        let store = StoreSummary {
            id: cart.store_id,
            name: first.store_name.clone(),
        };

        let mut lines = Vec::new();
        for row in &rows {
            let Some(product_id) = row.product_id else {
                continue;
            };
            let (Some(quantity), Some(name), Some(price)) =
                (row.quantity, row.product_name.clone(), row.price)
            else {
                return Err(RepositoryError::DataCorruption(format!(
                    "cart {cart_id} line {product_id} is missing its product"
                )));
            };
            lines.push(CartLine {
                product_id: ProductId::new(product_id),
                name,
                price: Price::new(price),
                quantity,
            });
        }

        Ok(Some(CartSnapshot { cart, store, lines }))
    }
}
