//! Seed the catalog with demo stores and products.
//!
//! Inserts two grocery stores and a small product range with fixed ids, so
//! the demo frontend and the integration scenarios have a stable catalog to
//! point at. Idempotent: existing rows are left untouched.

use sqlx::PgPool;

use super::migrate::MigrationError;

/// Demo stores, `(id, name)`.
const STORES: &[(i32, &str)] = &[(1, "Mercado Central"), (2, "Emporio Verde")];

/// Demo products, `(id, name, price, store_id)`.
const PRODUCTS: &[(i32, &str, &str, i32)] = &[
    (1, "Rice 1kg", "4.50", 1),
    (2, "Olive Oil 500ml", "12.00", 1),
    (3, "Black Beans 1kg", "5.20", 1),
    (4, "Spaghetti 500g", "2.80", 1),
    (5, "Tomato Sauce 340g", "1.90", 1),
    (6, "Whole Milk 1l", "3.10", 1),
    (7, "Eggs (dozen)", "6.40", 1),
    (8, "Bread Loaf", "4.00", 1),
    (9, "Chicken Breast 1kg", "11.50", 1),
    (10, "Ground Coffee 250g", "8.70", 1),
    (11, "Sugar 1kg", "2.30", 1),
    (12, "Onions 1kg", "2.10", 1),
    (13, "Garlic 200g", "1.60", 1),
    (14, "Bananas 1kg", "2.90", 1),
    (15, "Cheddar 300g", "7.80", 1),
    (16, "Oat Milk 1l", "7.25", 2),
    (17, "Organic Rice 1kg", "9.90", 2),
    (18, "Quinoa 500g", "13.40", 2),
    (19, "Almond Butter 250g", "15.00", 2),
    (20, "Kombucha 500ml", "6.50", 2),
];

/// Seed demo data.
///
/// # Errors
///
/// Returns `MigrationError` if the database URL is missing or an insert
/// fails.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("MERCADO_DATABASE_URL")
        .map_err(|_| MigrationError::MissingEnvVar("MERCADO_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    for &(id, name) in STORES {
        sqlx::query(
            r"
            INSERT INTO stores (id, name)
            VALUES ($1, $2)
            ON CONFLICT (id) DO NOTHING
            ",
        )
        .bind(id)
        .bind(name)
        .execute(&pool)
        .await?;
    }

    for &(id, name, price, store_id) in PRODUCTS {
        sqlx::query(
            r"
            INSERT INTO products (id, name, price, store_id)
            VALUES ($1, $2, $3::numeric, $4)
            ON CONFLICT (id) DO NOTHING
            ",
        )
        .bind(id)
        .bind(name)
        .bind(price)
        .bind(store_id)
        .execute(&pool)
        .await?;
    }

    // Explicit ids bypass the serial sequences; bump them past the seed.
    sqlx::query(
        "SELECT setval(pg_get_serial_sequence('stores', 'id'), (SELECT MAX(id) FROM stores))",
    )
    .execute(&pool)
    .await?;
    sqlx::query(
        "SELECT setval(pg_get_serial_sequence('products', 'id'), (SELECT MAX(id) FROM products))",
    )
    .execute(&pool)
    .await?;

    tracing::info!(
        stores = STORES.len(),
        products = PRODUCTS.len(),
        "Seed complete!"
    );
    Ok(())
}
