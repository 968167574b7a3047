//! Integration tests for Mercado.
//!
//! # Running Tests
//!
//! These tests need a live `PostgreSQL` with the schema and demo catalog in
//! place, and are `#[ignore]`-gated so a plain `cargo test` stays green
//! without one:
//!
//! ```bash
//! export MERCADO_DATABASE_URL=postgres://localhost/mercado_test
//! cargo run -p mercado-cli -- migrate
//! cargo run -p mercado-cli -- seed
//! cargo test -p mercado-integration-tests -- --ignored --test-threads=1
//! ```
//!
//! Single-threaded because the scenarios share the one fixed shopper
//! identity and truncate the cart tables between tests.

use axum::Router;
use secrecy::SecretString;
use sqlx::PgPool;

use mercado_core::UserId;
use mercado_server::app;
use mercado_server::config::ServerConfig;
use mercado_server::state::AppState;

/// Connected router plus pool for direct table access.
pub struct TestContext {
    pub router: Router,
    pub pool: PgPool,
}

impl TestContext {
    /// Connect to the test database and build the app router.
    ///
    /// Truncates `carts` and `cart_items` (not the seeded catalog) so each
    /// scenario starts from an empty shopper state.
    ///
    /// # Panics
    ///
    /// Panics if `MERCADO_DATABASE_URL` is unset or the database is
    /// unreachable - these tests only run when explicitly asked for.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();
        let database_url =
            std::env::var("MERCADO_DATABASE_URL").expect("MERCADO_DATABASE_URL must be set");

        let pool = PgPool::connect(&database_url)
            .await
            .expect("connect to test database");

        sqlx::query("TRUNCATE TABLE carts, cart_items RESTART IDENTITY CASCADE")
            .execute(&pool)
            .await
            .expect("reset cart tables");

        let config = ServerConfig {
            database_url: SecretString::from(database_url),
            host: "127.0.0.1".parse().expect("valid IP"),
            port: 0,
            user_id: UserId::new(1),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let router = app(AppState::new(config, pool.clone()));
        Self { router, pool }
    }
}
