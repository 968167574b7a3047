//! Product repository for catalog reads.
//!
//! The catalog is read-only from the cart's perspective: products and
//! stores are resolved here for store routing and display fields, never
//! mutated.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use mercado_core::{Price, ProductId, StoreId};

use super::RepositoryError;
use crate::models::{Product, StoreSummary};
use crate::services::Catalog;

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    price: Decimal,
    store_id: i32,
    store_name: String,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            price: Price::new(row.price),
            store: StoreSummary {
                id: StoreId::new(row.store_id),
                name: row.store_name,
            },
        }
    }
}

/// Repository for catalog database operations.
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a product with its owning store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT products.id, products.name, products.price,
                   stores.id AS store_id, stores.name AS store_name
            FROM products
            JOIN stores ON stores.id = products.store_id
            WHERE products.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// List products, optionally filtered by a case-insensitive name search.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, query: Option<&str>) -> Result<Vec<Product>, RepositoryError> {
        let rows = match query {
            Some(q) => {
                sqlx::query_as::<_, ProductRow>(
                    r"
                    SELECT products.id, products.name, products.price,
                           stores.id AS store_id, stores.name AS store_name
                    FROM products
                    JOIN stores ON stores.id = products.store_id
                    WHERE products.name ILIKE '%' || $1 || '%'
                    ORDER BY products.id
                    ",
                )
                .bind(q)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ProductRow>(
                    r"
                    SELECT products.id, products.name, products.price,
                           stores.id AS store_id, stores.name AS store_name
                    FROM products
                    JOIN stores ON stores.id = products.store_id
                    ORDER BY products.id
                    ",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Product::from).collect())
    }
}

#[async_trait]
impl Catalog for ProductRepository {
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        self.get(id).await
    }
}
